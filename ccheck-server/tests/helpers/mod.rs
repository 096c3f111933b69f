//! Test Helper Utilities
//!
//! In-process mock services for the fingerprinting and similarity APIs,
//! bound to an ephemeral localhost port.

#![allow(dead_code)]

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Requests received by a mock service
#[derive(Clone, Default)]
pub struct Captured {
    pub forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl Captured {
    pub fn hits(&self) -> usize {
        self.forms.lock().unwrap().len() + self.bodies.lock().unwrap().len()
    }

    pub fn last_form(&self) -> HashMap<String, String> {
        self.forms.lock().unwrap().last().cloned().unwrap()
    }

    pub fn last_body(&self) -> serde_json::Value {
        self.bodies.lock().unwrap().last().cloned().unwrap()
    }
}

#[derive(Clone)]
struct MockReply {
    status: StatusCode,
    body: String,
    delay: Duration,
    captured: Captured,
}

/// Serve `router` on 127.0.0.1 with an ephemeral port, returning its base URL
pub async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn form_handler(
    State(reply): State<MockReply>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    reply.captured.forms.lock().unwrap().push(form);
    tokio::time::sleep(reply.delay).await;
    (
        reply.status,
        [("content-type", "application/json")],
        reply.body.clone(),
    )
}

async fn json_handler(
    State(reply): State<MockReply>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    reply.captured.bodies.lock().unwrap().push(body);
    tokio::time::sleep(reply.delay).await;
    (
        reply.status,
        [("content-type", "application/json")],
        reply.body.clone(),
    )
}

/// Mock fingerprinting service at `POST /`
pub async fn audd_mock(status: StatusCode, body: &str) -> (String, Captured) {
    audd_mock_delayed(status, body, Duration::ZERO).await
}

pub async fn audd_mock_delayed(status: StatusCode, body: &str, delay: Duration) -> (String, Captured) {
    let captured = Captured::default();
    let reply = MockReply {
        status,
        body: body.to_string(),
        delay,
        captured: captured.clone(),
    };
    let router = Router::new().route("/", post(form_handler)).with_state(reply);
    let base = spawn_mock(router).await;
    (format!("{}/", base), captured)
}

/// Mock similarity service at `POST /compare`
pub async fn similarity_mock(status: StatusCode, body: &str) -> (String, Captured) {
    similarity_mock_delayed(status, body, Duration::ZERO).await
}

pub async fn similarity_mock_delayed(
    status: StatusCode,
    body: &str,
    delay: Duration,
) -> (String, Captured) {
    let captured = Captured::default();
    let reply = MockReply {
        status,
        body: body.to_string(),
        delay,
        captured: captured.clone(),
    };
    let router = Router::new()
        .route("/compare", post(json_handler))
        .with_state(reply);
    let base = spawn_mock(router).await;
    (format!("{}/compare", base), captured)
}
