use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Invocation-level failures: the trigger (webhook or storage event) is
/// rejected because there is no chat to report the problem to.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Rejected trigger: {0}")]
    BadRequest(String),

    #[error("Upstream service failed: {0}")]
    ExternalService(String),

    #[error("Pipeline failure: {0}")]
    Internal(String),
}

/// Body returned to the trigger, read by operators in delivery logs
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // A rejected trigger is redelivered or dropped by its source, ours are 5xx
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Invocation failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Trigger rejected");
        }

        let body = ErrorResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
