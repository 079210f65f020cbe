//! `POST /api/call` request handling.

use crate::AppState;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use callbridge_types::PhoneNumber;
use callbridge_voice::DialOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

fn default_wait_for_answer() -> bool {
    true
}

/// Body of `POST /api/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallRequest {
    pub phone_number: String,
    #[serde(default = "default_wait_for_answer")]
    pub wait_for_answer: bool,
}

/// Result of a call request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResponse {
    pub success: bool,
    pub message: String,
    /// Room the call was placed in. Absent when nothing was dialed.
    pub room_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{1}")]
    Rejected(StatusCode, String),
    #[error("{0}")]
    InternalServerError(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            // Schema violations (missing or mistyped fields) are validation failures.
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            other => other,
        };
        ApiError::Rejected(status, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Rejected(status, msg) => (status, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}

/// Handler for `POST /api/call`.
///
/// The number is validated before anything is sent to LiveKit.
pub async fn make_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> Result<Json<CallResponse>, ApiError> {
    let Json(request) = payload?;

    let phone_number = PhoneNumber::parse(&request.phone_number)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    tracing::info!(
        phone_number = %phone_number,
        wait_for_answer = request.wait_for_answer,
        "received call request"
    );

    match state
        .initiator
        .place_call(&phone_number, request.wait_for_answer)
        .await
    {
        Ok(DialOutcome::Connected { room_name, .. }) => Ok(Json(CallResponse {
            success: true,
            message: format!("Call to {} initiated successfully", phone_number),
            room_name: Some(room_name),
        })),
        Ok(DialOutcome::Failed { reason }) => {
            tracing::warn!(phone_number = %phone_number, %reason, "call was not placed");
            Err(ApiError::InternalServerError(format!(
                "Failed to initiate call to {}",
                phone_number
            )))
        }
        Err(e) => {
            tracing::error!(phone_number = %phone_number, error = %e, "call request failed");
            Err(ApiError::InternalServerError(format!("Error: {}", e)))
        }
    }
}
