//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub completion: ServiceStatus,
    pub speech: ServiceStatus,
}

/// Configuration status of one relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceStatus {
    fn from_validation(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                configured: true,
                error: None,
            },
            Err(e) => Self {
                configured: false,
                error: Some(e),
            },
        }
    }
}

/// Readiness check - are both relays fully configured?
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let completion = ServiceStatus::from_validation(state.config.completion.validate());
    let speech = ServiceStatus::from_validation(state.config.speech.validate());

    let ready = completion.configured && speech.configured;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            completion,
            speech,
        }),
    )
}
