// credits_checkout/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::response::resp_err;
use stepflow::FlowError;

/// Message returned for every downstream failure of a checkout.
pub const CHECKOUT_FAILED: &str = "checkout failed";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// Collapses store, provider and workflow failures for the caller. The cause is logged, not returned.
  #[error("checkout failed")]
  CheckoutFailed,

  #[error("Payment Provider Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(db_err) => AppError::Sqlx(db_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::CheckoutFailed
      | AppError::Payment(_)
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) => {
        tracing::warn!(application_error = %self, "Responding with client error");
        resp_err(status, m)
      }
      AppError::CheckoutFailed => resp_err(status, CHECKOUT_FAILED),
      _ => {
        tracing::error!(application_error = %self, "Responding with internal error");
        resp_err(status, "internal error")
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
