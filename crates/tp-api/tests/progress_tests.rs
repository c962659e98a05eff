use crate::common::test_app;
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn test_flashcard_progress_end_to_end() {
    let client = test_app();
    let category_id = client.create_category("Animals").await;
    let flashcard_id = client
        .create_flashcard(category_id, "What does a cow say?")
        .await;

    let body = json!({
        "userId": "u1",
        "flashcardId": flashcard_id,
        "isCompleted": true,
        "attempts": 1,
        "timeSpent": 10
    });

    let first = client.post_json("/api/progress/flashcards", &body).await;
    first.assert_status(StatusCode::CREATED);
    let second = client.post_json("/api/progress/flashcards", &body).await;
    second.assert_status(StatusCode::CREATED);

    let first: Value = first.json();
    let second: Value = second.json();
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["attempts"], 2);
    assert_eq!(second["timeSpent"], 20);
    assert_eq!(second["isCompleted"], true);
    assert_eq!(second["completedAt"], first["completedAt"]);
    assert_eq!(second["flashcard"]["id"], flashcard_id.to_string());
    assert_eq!(second["flashcard"]["question"], "What does a cow say?");
    assert_eq!(second["flashcard"]["categoryId"], category_id.to_string());

    let summary = client.get("/api/progress/u1").await;
    summary.assert_status(StatusCode::OK);
    let summary: Value = summary.json();
    assert_eq!(summary["flashcardProgress"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fact_progress_defaults_and_monotonic_completion() {
    let client = test_app();
    let category_id = client.create_category("Ocean").await;
    let fact_id = client
        .create_fact(category_id, "Octopuses have three hearts")
        .await;

    // isCompleted defaults to true
    let response = client
        .post_json(
            "/api/progress/facts",
            &json!({ "userId": "kid-1", "factId": fact_id, "timeSpent": 30 }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let progress: Value = response.json();
    assert_eq!(progress["isCompleted"], true);
    assert_eq!(progress["isViewed"], true);
    assert_eq!(progress["fact"]["title"], "Octopuses have three hearts");

    let response = client
        .post_json(
            "/api/progress/facts",
            &json!({ "userId": "kid-1", "factId": fact_id, "isCompleted": false, "timeSpent": 15 }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let progress: Value = response.json();
    assert_eq!(progress["isCompleted"], true);
    assert_eq!(progress["timeSpent"], 45);
}

#[tokio::test]
async fn test_progress_for_missing_item_is_not_found() {
    let client = test_app();
    let missing = Uuid::new_v4();

    let response = client
        .post_json(
            "/api/progress/facts",
            &json!({ "userId": "u1", "factId": missing }),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Fact not found");
    assert_eq!(body["factId"], missing.to_string());

    let response = client
        .post_json(
            "/api/progress/flashcards",
            &json!({ "userId": "u1", "flashcardId": missing }),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Flashcard not found");
    assert_eq!(body["flashcardId"], missing.to_string());
}

#[tokio::test]
async fn test_progress_validation_errors() {
    let client = test_app();
    let category_id = client.create_category("Animals").await;
    let flashcard_id = client.create_flashcard(category_id, "Cow?").await;

    let cases = [
        json!({ "flashcardId": flashcard_id }),
        json!({ "userId": "", "flashcardId": flashcard_id }),
        json!({ "userId": "u1", "flashcardId": "not-a-uuid" }),
        json!({ "userId": "u1", "flashcardId": flashcard_id, "attempts": 0 }),
        json!({ "userId": "u1", "flashcardId": flashcard_id, "timeSpent": -5 }),
        json!({ "userId": "u1", "flashcardId": flashcard_id, "attempts": 1001 }),
        json!({ "userId": "u1", "flashcardId": flashcard_id, "timeSpent": 86_401 }),
        json!({
            "userId": "u1",
            "flashcardId": flashcard_id,
            "attempts": i32::MAX,
            "timeSpent": i64::MAX
        }),
    ];

    for body in cases {
        let response = client.post_json("/api/progress/flashcards", &body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(error["error"], "Validation error", "body: {body}");
        assert!(error["details"].is_string());
    }
}

#[tokio::test]
async fn test_summary_statistics() {
    let client = test_app();
    let category_id = client.create_category("Space").await;

    let mut fact_ids = Vec::new();
    for title in ["Mars is red", "The sun is a star", "Saturn has rings", "The moon orbits us"] {
        fact_ids.push(client.create_fact(category_id, title).await);
    }

    for (i, fact_id) in fact_ids.iter().enumerate() {
        let response = client
            .post_json(
                "/api/progress/facts",
                &json!({ "userId": "u1", "factId": fact_id, "isCompleted": i != 2 }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let response = client.get("/api/progress/u1").await;
    response.assert_status(StatusCode::OK);
    let summary: Value = response.json();

    assert_eq!(summary["userId"], "u1");
    assert_eq!(summary["factProgress"].as_array().unwrap().len(), 4);
    assert_eq!(summary["statistics"]["facts"]["total"], 4);
    assert_eq!(summary["statistics"]["facts"]["completed"], 3);
    assert_eq!(summary["statistics"]["facts"]["completionRate"], 75);
    assert_eq!(summary["statistics"]["flashcards"]["total"], 0);
    assert_eq!(summary["statistics"]["flashcards"]["completionRate"], 0);
}

#[tokio::test]
async fn test_summary_date_filters() {
    let client = test_app();
    let category_id = client.create_category("Space").await;
    let fact_id = client.create_fact(category_id, "Mars is red").await;
    client
        .post_json(
            "/api/progress/facts",
            &json!({ "userId": "u1", "factId": fact_id }),
        )
        .await
        .assert_status(StatusCode::CREATED);

    let response = client
        .get("/api/progress/u1?startDate=2000-01-01&endDate=2000-12-31")
        .await;
    response.assert_status(StatusCode::OK);
    let summary: Value = response.json();
    assert_eq!(summary["statistics"]["facts"]["total"], 0);

    let response = client.get("/api/progress/u1?startDate=2000-01-01").await;
    response.assert_status(StatusCode::OK);
    let summary: Value = response.json();
    assert_eq!(summary["statistics"]["facts"]["total"], 1);

    let response = client
        .get("/api/progress/u1?startDate=2024-02-01&endDate=2024-01-01")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = client.get("/api/progress/u1?startDate=yesterday").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
