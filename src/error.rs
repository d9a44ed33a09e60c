use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gateway error {code}: {text}")]
    Gateway { code: String, text: String },

    // A compensating rollback failed; a local row is now inconsistent with
    // the gateway. Logged at error severity where it happens.
    #[error("Compensation failure: {0}")]
    Compensation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn gateway(code: impl Into<String>, text: impl Into<String>) -> Self {
        AppError::Gateway {
            code: code.into(),
            text: text.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Persistence(_) | AppError::Compensation(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
