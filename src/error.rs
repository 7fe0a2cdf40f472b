use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Terms and conditions must be accepted")]
    TermsNotAccepted,
    #[error("Operation not allowed while request is {0}")]
    InvalidStatus(String),
    #[error("Request has not been paid yet")]
    NotPaid,
    #[error("Table already has a reservation request for this event")]
    TableAlreadyRequested,
    #[error("Table is held by another active request")]
    TableHasActiveRequest,
    #[error("Table is already booked for this event")]
    TableAlreadyBooked,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Stable machine code surfaced next to the human-readable message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION",
            AppError::TermsNotAccepted => "TERMS_NOT_ACCEPTED",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::NotPaid => "NOT_PAID",
            AppError::TableAlreadyRequested => "TABLE_ALREADY_REQUESTED",
            AppError::TableHasActiveRequest => "TABLE_HAS_ACTIVE_REQUEST",
            AppError::TableAlreadyBooked => "TABLE_ALREADY_BOOKED",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Internal | AppError::InternalWithMsg(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({
                                "code": "CONFLICT",
                                "error": "Resource already exists (duplicate entry)"
                            }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::TermsNotAccepted => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidStatus(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::NotPaid => (StatusCode::CONFLICT, self.to_string()),
            AppError::TableAlreadyRequested
            | AppError::TableHasActiveRequest
            | AppError::TableAlreadyBooked => (StatusCode::CONFLICT, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "code": self.code(),
            "error": message
        }));

        (status, body).into_response()
    }
}
