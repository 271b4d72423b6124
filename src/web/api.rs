//! Defines the Axum API routes and handlers.

use crate::control::{ControlError, Controller};
use crate::web::models::{
    HistoryResponse, SetHeaterRequest, SetHeaterResponse, SetModeRequest, SetModeResponse,
    SetTargetRequest, SetTargetResponse, StatusResponse,
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

pub type AppState = Controller;

/// Helper to create a JSON error response with a message and status code
fn json_error(message: &str, status: StatusCode) -> Response {
    (status, Json(serde_json::json!({ "success": false, "error": message }))).into_response()
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        let status = match &self {
            ControlError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ControlError::SensorUnavailable(_) | ControlError::ActuatorCommandFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        json_error(&self.to_string(), status)
    }
}

fn bad_body(rejection: JsonRejection) -> Response {
    json_error(&rejection.body_text(), StatusCode::BAD_REQUEST)
}

/// Creates the Axum router with all the API endpoints.
pub fn create_router(controller: AppState) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/history", get(get_history))
        .route("/api/set_target", post(set_target))
        .route("/api/set_mode", post(set_mode))
        .route("/api/set_heater", post(set_heater))
        .with_state(controller)
}

/// GET /api/status
async fn get_status(State(controller): State<AppState>) -> Json<StatusResponse> {
    Json(controller.status().await.into())
}

/// GET /api/history -- the whole buffer, oldest first
async fn get_history(State(controller): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse::from(&controller.history().await))
}

/// POST /api/set_target
async fn set_target(
    State(controller): State<AppState>,
    payload: Result<Json<SetTargetRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };
    match controller.set_target(payload.target).await {
        Ok(target_temp) => Json(SetTargetResponse { success: true, target_temp }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/set_mode
async fn set_mode(
    State(controller): State<AppState>,
    payload: Result<Json<SetModeRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };
    let auto_mode = controller.set_auto_mode(payload.auto).await;
    Json(SetModeResponse { success: true, auto_mode }).into_response()
}

/// POST /api/set_heater -- manual mode only
async fn set_heater(
    State(controller): State<AppState>,
    payload: Result<Json<SetHeaterRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };
    match controller.set_heater(payload.on).await {
        Ok(heater_on) => Json(SetHeaterResponse { success: true, heater_on }).into_response(),
        Err(e) => {
            tracing::warn!("Rejected manual heater command: {}", e);
            e.into_response()
        }
    }
}
