use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::fixtures::{fixture_runtimes, run_response, MockReply, RuntimesBehavior};
use crate::server::MockState;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Compiler service is running",
        "timestamp": "2024-01-01T00:00:00Z"
    }))
}

pub async fn list_runtimes(State(state): State<Arc<MockState>>) -> Response {
    state.runtime_hits.fetch_add(1, Ordering::SeqCst);

    match &state.runtimes {
        RuntimesBehavior::Fixture => {
            Json(json!({"success": true, "data": fixture_runtimes()})).into_response()
        }
        RuntimesBehavior::Serve { runtimes } => {
            Json(json!({"success": true, "data": runtimes})).into_response()
        }
        RuntimesBehavior::Empty => Json(json!({"success": true, "data": []})).into_response(),
        RuntimesBehavior::Fail { status } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({"success": false, "message": "runtimes unavailable"})))
                .into_response()
        }
        RuntimesBehavior::Malformed => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

pub async fn list_languages() -> impl IntoResponse {
    let languages: Vec<Value> = fixture_runtimes()
        .into_iter()
        .filter_map(|runtime| runtime.get("language").cloned())
        .collect();
    Json(json!({"success": true, "data": languages}))
}

pub async fn execute(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    tracing::debug!("Mock compiler received execute request: {}", payload);
    if let Ok(mut auth_headers) = state.auth_headers.lock() {
        auth_headers.push(auth);
    }
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(payload.clone());
    }

    let reply = state.replies.lock().ok().and_then(|mut replies| replies.pop_front());

    match reply {
        Some(MockReply::Respond { response }) => success(response),
        Some(MockReply::Delay { delay_ms, response }) => {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            success(response)
        }
        Some(MockReply::Status { status, message }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = match message {
                Some(message) => json!({"success": false, "message": message}),
                None => json!({"success": false}),
            };
            (status, Json(body)).into_response()
        }
        Some(MockReply::Envelope { body }) => Json(body).into_response(),
        Some(MockReply::Raw { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        None => success(echo(&payload)),
    }
}

fn success(response: Value) -> Response {
    Json(json!({"success": true, "data": response})).into_response()
}

/// Default reply: the program "prints" its stdin.
fn echo(payload: &Value) -> Value {
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    run_response(&field("language"), &field("version"), &field("stdin"), 0)
}
