//! HTTP handlers.

mod system;
mod todos;


use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

pub use system::*;
pub use todos::*;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "List not found")]
    pub error: String,
}

/// Handler error: status code plus JSON body.
pub type ApiFailure = (StatusCode, Json<ErrorResponse>);

pub(crate) fn failure(status: StatusCode, message: &str) -> ApiFailure {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Unwrap a JSON body, turning axum's rejection into a 400 `{error}` body.
pub(crate) fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiFailure> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected request body");
            Err(failure(StatusCode::BAD_REQUEST, "Invalid request body"))
        }
    }
}
