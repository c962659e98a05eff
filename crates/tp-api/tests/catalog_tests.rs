use crate::common::test_app;
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn test_root_and_health() {
    let client = test_app();

    let response = client.get("/").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["ok"], true);

    client.get("/health").await.assert_status(StatusCode::OK);
    client.get("/health/ready").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_category_lifecycle() {
    let client = test_app();

    let response = client
        .post_json(
            "/api/categories",
            &json!({ "name": "Animals", "description": "Furry friends", "icon": "🐮" }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let category: Value = response.json();
    assert_eq!(category["name"], "Animals");
    assert_eq!(category["color"], "#3B82F6");
    assert_eq!(category["isActive"], true);
    let id = category["id"].as_str().unwrap().to_string();

    let response = client.get(&format!("/api/categories/{id}")).await;
    response.assert_status(StatusCode::OK);
    let fetched: Value = response.json();
    assert_eq!(fetched["description"], "Furry friends");

    client.create_category("Space").await;
    let response = client.get("/api/categories").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    let names: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Animals", "Space"]);
}

#[tokio::test]
async fn test_duplicate_category_conflicts() {
    let client = test_app();
    client.create_category("Animals").await;

    let response = client
        .post_json("/api/categories", &json!({ "name": "Animals" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Animals"));
}

#[tokio::test]
async fn test_category_validation() {
    let client = test_app();

    let response = client
        .post_json("/api/categories", &json!({ "name": "Animals", "color": "red" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = client.post_json("/api/categories", &json!({ "name": "" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn test_category_stats() {
    let client = test_app();
    let animals = client.create_category("Animals").await;
    client.create_fact(animals, "Cows have four stomach chambers").await;
    client.create_flashcard(animals, "What does a cow say?").await;
    client.create_flashcard(animals, "What does a dog say?").await;

    let response = client.get(&format!("/api/categories/{animals}/stats")).await;
    response.assert_status(StatusCode::OK);
    let stats: Value = response.json();
    assert_eq!(stats["categoryId"], animals.to_string());
    assert_eq!(stats["categoryName"], "Animals");
    assert_eq!(stats["factsCount"], 1);
    assert_eq!(stats["flashcardsCount"], 2);
    assert_eq!(stats["totalContent"], 3);

    let missing = Uuid::new_v4();
    let response = client.get(&format!("/api/categories/{missing}/stats")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Category not found");
    assert_eq!(body["categoryId"], missing.to_string());
}

#[tokio::test]
async fn test_category_content_listing() {
    let client = test_app();
    let animals = client.create_category("Animals").await;
    let space = client.create_category("Space").await;
    client.create_fact(animals, "Cows have four stomach chambers").await;
    client.create_fact(space, "Mars is red").await;
    client.create_flashcard(space, "Which planet is red?").await;

    let response = client.get(&format!("/api/categories/{space}/facts")).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["facts"].as_array().unwrap().len(), 1);
    assert_eq!(body["facts"][0]["title"], "Mars is red");
    assert_eq!(body["pagination"]["total"], 1);

    let response = client
        .get(&format!("/api/categories/{animals}/flashcards"))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body["flashcards"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_fact_listing_and_pagination() {
    let client = test_app();
    let space = client.create_category("Space").await;
    for i in 0..5 {
        client.create_fact(space, &format!("Space fact {i}")).await;
    }

    let response = client.get("/api/facts?limit=2&offset=0").await;
    response.assert_status(StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["facts"].as_array().unwrap().len(), 2);
    assert_eq!(
        page["pagination"],
        json!({ "total": 5, "limit": 2, "offset": 0, "hasMore": true })
    );
    assert_eq!(page["facts"][0]["category"]["name"], "Space");

    let response = client.get("/api/facts?limit=2&offset=4").await;
    let last: Value = response.json();
    assert_eq!(last["facts"].as_array().unwrap().len(), 1);
    assert_eq!(last["pagination"]["hasMore"], false);

    let response = client.get("/api/facts?search=FACT%203").await;
    let found: Value = response.json();
    assert_eq!(found["pagination"]["total"], 1);
    assert_eq!(found["facts"][0]["title"], "Space fact 3");

    client
        .get("/api/facts?limit=0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    client
        .get("/api/facts?limit=101")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    client
        .get("/api/facts?ageGroup=TEENAGER")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fact_view_and_like() {
    let client = test_app();
    let space = client.create_category("Space").await;
    let fact_id = client.create_fact(space, "Mars is red").await;

    client
        .post(&format!("/api/facts/{fact_id}/view"))
        .await
        .assert_status(StatusCode::OK);
    let response = client.post(&format!("/api/facts/{fact_id}/view")).await;
    let fact: Value = response.json();
    assert_eq!(fact["viewCount"], 2);
    assert_eq!(fact["likes"], 0);

    let response = client.post(&format!("/api/facts/{fact_id}/like")).await;
    response.assert_status(StatusCode::OK);
    let fact: Value = response.json();
    assert_eq!(fact["likes"], 1);

    let response = client.get(&format!("/api/facts/{fact_id}")).await;
    let fact: Value = response.json();
    assert_eq!(fact["viewCount"], 2);
    assert_eq!(fact["category"]["name"], "Space");

    let missing = Uuid::new_v4();
    let response = client.post(&format!("/api/facts/{missing}/like")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["factId"], missing.to_string());
}

#[tokio::test]
async fn test_create_content_with_unknown_category() {
    let client = test_app();
    let missing = Uuid::new_v4();

    let response = client
        .post_json(
            "/api/flashcards",
            &json!({
                "question": "Orphan?",
                "answer": "Yes",
                "categoryId": missing,
                "ageGroup": "PRESCHOOL",
            }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Category not found");
    assert_eq!(body["categoryId"], missing.to_string());

    let response = client
        .post_json(
            "/api/facts",
            &json!({
                "title": "Orphan",
                "description": "No category",
                "categoryId": missing,
                "ageGroup": "PRESCHOOL",
            }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_flashcard_get_and_list() {
    let client = test_app();
    let animals = client.create_category("Animals").await;
    let flashcard_id = client.create_flashcard(animals, "What does a cow say?").await;

    let response = client.get(&format!("/api/flashcards/{flashcard_id}")).await;
    response.assert_status(StatusCode::OK);
    let flashcard: Value = response.json();
    assert_eq!(flashcard["answer"], "Moo");
    assert_eq!(flashcard["difficulty"], "EASY");
    assert_eq!(flashcard["category"]["id"], animals.to_string());

    let response = client.get("/api/flashcards?difficulty=EASY").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total"], 1);

    let response = client.get("/api/flashcards?difficulty=HARD").await;
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total"], 0);

    let missing = Uuid::new_v4();
    let response = client.get(&format!("/api/flashcards/{missing}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Flashcard not found");
}
