//! Router harness for route tests.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use kredit_core::CreditService;
use kredit_core::consumer::EligibilityRules;
use kredit_shared::CorsConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

/// The full router over an in-memory service.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(CreditService::in_memory(EligibilityRules::default()));
        Self {
            router: create_router(state, &CorsConfig::default()),
        }
    }

    pub async fn response(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.response(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send_json("POST", uri, body.to_string()).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json("PUT", uri, body.to_string()).await
    }

    async fn send_json(&self, method: &str, uri: &str, body: String) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

/// Registers consumer #1 with NIK 1234567890123456.
pub async fn register_john(app: &TestApp) {
    let (status, _) = app
        .post(
            "/api/consumers",
            &json!({
                "nik": "1234567890123456",
                "full_name": "John Doe",
                "legal_name": "John Doe",
                "salary": "5000000"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
