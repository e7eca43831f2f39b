use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Access to a paid resource was refused (e.g. gallery download after the free period).
    #[error("Payment required: {0}")]
    Payment(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    External(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid payout type: {0}")]
    InvalidPayoutType(String),

    #[error("No amount to transfer for {0} payout")]
    NoAmountToTransfer(String),

    #[error("Vendor {0} has no connected payment account")]
    VendorNotOnboarded(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// The transfer went through but recording it did not. Needs an operator.
    #[error("Ledger write failed after transfer {transfer_id}: {message}")]
    LedgerWriteFailed {
        transfer_id: String,
        message: String,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred".to_string())
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Payment(ref msg) => (StatusCode::PAYMENT_REQUIRED, msg.clone()),
            AppError::Validation(ref msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::External(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::ServiceUnavailable(ref msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::InvalidAmount(_) | AppError::InvalidPayoutType(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NoAmountToTransfer(_) | AppError::VendorNotOnboarded(_) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::TransferFailed(ref msg) => {
                tracing::error!("Transfer failed: {}", msg);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::LedgerWriteFailed { ref transfer_id, ref message } => {
                tracing::error!(
                    transfer_id = %transfer_id,
                    "Payout ledger inconsistency: {}",
                    message
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Transfer {} sent but not recorded; operator notified", transfer_id),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
