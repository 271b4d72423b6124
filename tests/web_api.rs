//! Integration tests for the thermostat HTTP API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hearth_rs::config::ControlConfig;
use hearth_rs::control::Controller;
use hearth_rs::hardware::{RecordingHeater, ScriptedSensor};
use hearth_rs::web::api::create_router;
use http_body_util::BodyExt; // for .collect().await
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

fn test_state(readings: Vec<f64>) -> (Controller, Arc<RecordingHeater>) {
    let config = ControlConfig {
        initial_target: 22.0,
        port_timeout_ms: 100,
        ..Default::default()
    };
    let sensor = Arc::new(ScriptedSensor::new(readings));
    let heater = Arc::new(RecordingHeater::new());
    (Controller::new(&config, sensor, heater.clone()), heater)
}

async fn send(controller: &Controller, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(controller.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_status_before_first_reading() {
    let (controller, _heater) = test_state(vec![]);
    let (status, json) = send(&controller, get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["current_temp"].is_null());
    assert_eq!(json["target_temp"], 22.0);
    assert_eq!(json["heater_on"], false);
    assert_eq!(json["auto_mode"], true);
    assert_eq!(json["temp_history"], json!([]));
}

#[tokio::test]
async fn test_status_reflects_samples() {
    let (controller, _heater) = test_state(vec![20.04, 21.26]);
    controller.run_cycle().await;
    controller.run_cycle().await;
    let (status, json) = send(&controller, get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_temp"], 21.3);
    assert_eq!(json["heater_on"], true);
    let history = json["temp_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["temp"], 20.0);
    assert_eq!(history[1]["temp"], 21.3);
    assert_eq!(history[1]["time"].as_str().unwrap().len(), "HH:MM:SS".len());
}

#[tokio::test]
async fn test_status_history_is_limited() {
    let (controller, _heater) = test_state((0..30).map(|i| 15.0 + i as f64 * 0.1).collect());
    for _ in 0..30 {
        controller.run_cycle().await;
    }
    let (_, json) = send(&controller, get("/api/status")).await;
    let history = json["temp_history"].as_array().unwrap();
    assert_eq!(history.len(), 20);
    assert_eq!(history[19]["temp"], 17.9);

    let (status, json) = send(&controller, get("/api/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["capacity"], 120);
    assert_eq!(json["entries"].as_array().unwrap().len(), 30);
    assert_eq!(json["entries"][0]["temp"], 15.0);
}

#[tokio::test]
async fn test_set_target_clamps() {
    let (controller, _heater) = test_state(vec![]);
    let (status, json) = send(&controller, post("/api/set_target", json!({ "target": 35.0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["target_temp"], 30.0);

    let (_, json) = send(&controller, post("/api/set_target", json!({ "target": -5.0 }))).await;
    assert_eq!(json["target_temp"], 10.0);
    assert_eq!(controller.status().await.target_temperature, 10.0);

    let (_, json) = send(&controller, post("/api/set_target", json!({ "target": 23.5 }))).await;
    assert_eq!(json["target_temp"], 23.5);
}

#[tokio::test]
async fn test_set_target_rejects_bad_body() {
    let (controller, _heater) = test_state(vec![]);
    let (status, json) = send(&controller, post("/api/set_target", json!({ "target": "warm" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());

    let (status, _) = send(&controller, post("/api/set_target", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(controller.status().await.target_temperature, 22.0);
}

#[tokio::test]
async fn test_set_mode() {
    let (controller, _heater) = test_state(vec![]);
    let (status, json) = send(&controller, post("/api/set_mode", json!({ "auto": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "auto_mode": false }));
    assert!(!controller.status().await.auto_mode);
}

#[tokio::test]
async fn test_set_heater_rejected_in_auto_mode() {
    let (controller, heater) = test_state(vec![]);
    let (status, json) = send(&controller, post("/api/set_heater", json!({ "on": true }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("auto mode"));
    assert!(!controller.status().await.heater_on);
    assert!(heater.commands().await.is_empty());
}

#[tokio::test]
async fn test_set_heater_in_manual_mode() {
    let (controller, heater) = test_state(vec![]);
    send(&controller, post("/api/set_mode", json!({ "auto": false }))).await;

    let (status, json) = send(&controller, post("/api/set_heater", json!({ "on": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "heater_on": true }));
    assert!(controller.status().await.heater_on);
    assert_eq!(heater.commands().await, vec![true]);

    heater.set_failing(true);
    let (status, json) = send(&controller, post("/api/set_heater", json!({ "on": false }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["success"], false);
    assert!(controller.status().await.heater_on);
}
