use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pomodoro_gate::{create_router, AppState, TimerConfig};

fn app(config: TimerConfig) -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), config));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn open(router: &Router, body: Value) -> String {
    let (status, timer) = send(router, Method::POST, "/timers", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    timer["id"].as_str().unwrap().to_string()
}

async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn open_timer_starts_idle_with_full_work_phase() {
    let (_state, router) = app(TimerConfig::default());
    let (status, timer) = send(&router, Method::POST, "/timers", Some(json!({"task": "write tests"}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(timer["task"], "write tests");
    assert_eq!(timer["state"]["phase"], "work");
    assert_eq!(timer["state"]["remaining_seconds"], 1500);
    assert_eq!(timer["state"]["running"], false);
    assert_eq!(timer["state"]["pending_transition"], Value::Null);
    assert_eq!(timer["display"], "25:00");
    assert_eq!(timer["headline"], "Let's start working!");
}

#[tokio::test(start_paused = true)]
async fn full_cycle_over_http() {
    let (_state, router) = app(TimerConfig::default());
    let id = open(&router, json!({"work_seconds": 2, "break_seconds": 1})).await;

    let (status, timer) = send(&router, Method::POST, &format!("/timers/{id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer["state"]["running"], true);
    assert_eq!(timer["headline"], "Working...");

    advance_ms(2500).await;
    let (_, timer) = send(&router, Method::GET, &format!("/timers/{id}"), None).await;
    assert_eq!(timer["state"]["remaining_seconds"], 0);
    assert_eq!(timer["state"]["running"], false);
    assert_eq!(timer["state"]["pending_transition"], "to_break");
    assert_eq!(timer["notification"], "Times up! Take a break");

    let (_, timer) = send(&router, Method::POST, &format!("/timers/{id}/acknowledge"), None).await;
    assert_eq!(timer["state"]["phase"], "break");
    assert_eq!(timer["state"]["remaining_seconds"], 1);
    assert_eq!(timer["state"]["running"], true);
    assert_eq!(timer["headline"], "Break time!");

    advance_ms(1500).await;
    let (_, timer) = send(&router, Method::GET, &format!("/timers/{id}"), None).await;
    assert_eq!(timer["state"]["pending_transition"], "to_work");
    assert_eq!(timer["notification"], "Go back to work!");

    let (_, timer) = send(&router, Method::POST, &format!("/timers/{id}/acknowledge"), None).await;
    assert_eq!(timer["state"]["phase"], "work");
    assert_eq!(timer["state"]["remaining_seconds"], 2);
    assert_eq!(timer["state"]["running"], false);
    assert_eq!(timer["notification"], Value::Null);
}

#[tokio::test(start_paused = true)]
async fn start_with_unset_duration_is_unprocessable() {
    let (_state, router) = app(TimerConfig::default());
    let id = open(&router, json!({"work_seconds": 0})).await;

    let (status, body) = send(&router, Method::POST, &format!("/timers/{id}/start"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");

    let (_, timer) = send(&router, Method::GET, &format!("/timers/{id}"), None).await;
    assert_eq!(timer["state"]["phase"], "work");
    assert_eq!(timer["state"]["running"], false);
    assert_eq!(timer["state"]["pending_transition"], Value::Null);
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_keep_progress() {
    let (_state, router) = app(TimerConfig::new(10, 5));
    let id = open(&router, json!({})).await;

    send(&router, Method::POST, &format!("/timers/{id}/start"), None).await;
    advance_ms(1500).await;
    let (_, timer) = send(&router, Method::POST, &format!("/timers/{id}/pause"), None).await;
    assert_eq!(timer["state"]["remaining_seconds"], 9);
    assert_eq!(timer["state"]["running"], false);

    advance_ms(3000).await;
    let (_, timer) = send(&router, Method::POST, &format!("/timers/{id}/start"), None).await;
    assert_eq!(timer["state"]["remaining_seconds"], 9);

    advance_ms(1500).await;
    let (_, timer) = send(&router, Method::GET, &format!("/timers/{id}"), None).await;
    assert_eq!(timer["state"]["remaining_seconds"], 8);
}

#[tokio::test(start_paused = true)]
async fn config_changes_only_while_idle() {
    let (_state, router) = app(TimerConfig::new(10, 5));
    let id = open(&router, json!({})).await;

    let (status, timer) = send(&router, Method::PUT, &format!("/timers/{id}/config"),
        Some(json!({"work_seconds": 6, "break_seconds": 6}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer["state"]["remaining_seconds"], 6);
    assert_eq!(timer["display"], "00:06");

    send(&router, Method::POST, &format!("/timers/{id}/start"), None).await;
    let (status, _) = send(&router, Method::PUT, &format!("/timers/{id}/config"),
        Some(json!({"work_seconds": 60, "break_seconds": 60}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, timer) = send(&router, Method::POST, &format!("/timers/{id}/reset"), None).await;
    assert_eq!(timer["config"]["work_seconds"], 6);
    assert_eq!(timer["state"]["remaining_seconds"], 6);
}

#[tokio::test(start_paused = true)]
async fn closing_a_timer_removes_it() {
    let (state, router) = app(TimerConfig::new(10, 5));
    let id = open(&router, json!({})).await;
    send(&router, Method::POST, &format!("/timers/{id}/start"), None).await;

    let (status, timer) = send(&router, Method::DELETE, &format!("/timers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer["closed"], true);
    assert_eq!(timer["state"]["running"], false);

    let (status, _) = send(&router, Method::GET, &format!("/timers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.list_timers().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unknown_timer_is_not_found() {
    let (_state, router) = app(TimerConfig::default());
    let (status, body) = send(&router, Method::POST,
        "/timers/00000000-0000-0000-0000-000000000000/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test(start_paused = true)]
async fn status_counts_timers_by_state() {
    let (_state, router) = app(TimerConfig::new(1, 5));
    let pending = open(&router, json!({})).await;
    let running = open(&router, json!({"work_seconds": 60})).await;
    open(&router, json!({})).await;

    send(&router, Method::POST, &format!("/timers/{pending}/start"), None).await;
    send(&router, Method::POST, &format!("/timers/{running}/start"), None).await;
    advance_ms(1500).await;

    let (status, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["open_timers"], 3);
    assert_eq!(body["running_timers"], 1);
    assert_eq!(body["pending_timers"], 1);
    assert_eq!(body["last_action"], "start");

    let (_, list) = send(&router, Method::GET, "/timers", None).await;
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn presets_and_health() {
    let (_state, router) = app(TimerConfig::default());

    let (status, presets) = send(&router, Method::GET, "/presets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(presets["work_seconds"], json!([6, 1500, 2700, 3600]));
    assert_eq!(presets["break_seconds"], json!([6, 300, 600, 900]));
    assert_eq!(presets["default"]["work_seconds"], 1500);

    let (status, health) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}
