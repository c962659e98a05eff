#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;
use tp_api::{router, state::ApiState};
use tp_db::{
    ContentStore, MemoryStore, StoreError,
    models::{
        Category, ContentFilter, DateRange, Fact, FactCounter, FactProgress, FactProgressUpdate,
        Flashcard, FlashcardProgress, FlashcardProgressUpdate, NewCategory, NewFact, NewFlashcard,
        Page,
    },
};
use uuid::Uuid;

/// Router over a fresh in-memory store
pub fn test_app() -> TestClient {
    app_with_store(Arc::new(MemoryStore::new()))
}

pub fn app_with_store(store: Arc<dyn ContentStore>) -> TestClient {
    let state = ApiState::new(store);
    TestClient::new(router::router().with_state(state))
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with no body
    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with a raw, possibly malformed, JSON body
    pub async fn post_raw(&self, uri: &str, body: &'static str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Create a category through the API and return its id
    pub async fn create_category(&self, name: &str) -> Uuid {
        let response = self
            .post_json("/api/categories", &json!({ "name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.id()
    }

    /// Create a flashcard through the API and return its id
    pub async fn create_flashcard(&self, category_id: Uuid, question: &str) -> Uuid {
        let response = self
            .post_json(
                "/api/flashcards",
                &json!({
                    "question": question,
                    "answer": "Moo",
                    "categoryId": category_id,
                    "ageGroup": "TODDLER",
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        response.id()
    }

    /// Create a fact through the API and return its id
    pub async fn create_fact(&self, category_id: Uuid, title: &str) -> Uuid {
        let response = self
            .post_json(
                "/api/facts",
                &json!({
                    "title": title,
                    "description": "A fact worth knowing.",
                    "categoryId": category_id,
                    "ageGroup": "ELEMENTARY",
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        response.id()
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// `id` field of a JSON object response
    pub fn id(&self) -> Uuid {
        let body: Value = self.json();
        body["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("Response has no id")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}

/// Store whose every operation fails, for exercising 500 paths
#[derive(Debug, Default)]
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn list_categories(&self, _: bool) -> Result<Vec<Category>, StoreError> {
        Err(unavailable())
    }

    async fn find_category(&self, _: Uuid) -> Result<Option<Category>, StoreError> {
        Err(unavailable())
    }

    async fn create_category(&self, _: NewCategory) -> Result<Category, StoreError> {
        Err(unavailable())
    }

    async fn count_facts(&self, _: &ContentFilter) -> Result<i64, StoreError> {
        Err(unavailable())
    }

    async fn list_facts(&self, _: &ContentFilter, _: Page) -> Result<Vec<Fact>, StoreError> {
        Err(unavailable())
    }

    async fn find_fact(&self, _: Uuid) -> Result<Option<Fact>, StoreError> {
        Err(unavailable())
    }

    async fn create_fact(&self, _: NewFact) -> Result<Fact, StoreError> {
        Err(unavailable())
    }

    async fn bump_fact_counter(&self, _: Uuid, _: FactCounter) -> Result<Option<Fact>, StoreError> {
        Err(unavailable())
    }

    async fn count_flashcards(&self, _: &ContentFilter) -> Result<i64, StoreError> {
        Err(unavailable())
    }

    async fn list_flashcards(
        &self,
        _: &ContentFilter,
        _: Page,
    ) -> Result<Vec<Flashcard>, StoreError> {
        Err(unavailable())
    }

    async fn find_flashcard(&self, _: Uuid) -> Result<Option<Flashcard>, StoreError> {
        Err(unavailable())
    }

    async fn create_flashcard(&self, _: NewFlashcard) -> Result<Flashcard, StoreError> {
        Err(unavailable())
    }

    async fn upsert_fact_progress(
        &self,
        _: &str,
        _: Uuid,
        _: FactProgressUpdate,
    ) -> Result<FactProgress, StoreError> {
        Err(unavailable())
    }

    async fn upsert_flashcard_progress(
        &self,
        _: &str,
        _: Uuid,
        _: FlashcardProgressUpdate,
    ) -> Result<FlashcardProgress, StoreError> {
        Err(unavailable())
    }

    async fn recent_fact_progress(
        &self,
        _: &str,
        _: DateRange,
        _: i64,
    ) -> Result<Vec<FactProgress>, StoreError> {
        Err(unavailable())
    }

    async fn recent_flashcard_progress(
        &self,
        _: &str,
        _: DateRange,
        _: i64,
    ) -> Result<Vec<FlashcardProgress>, StoreError> {
        Err(unavailable())
    }
}
