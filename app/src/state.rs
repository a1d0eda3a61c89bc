// credits_checkout/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{OrderStore, PaymentProvider, UserDirectory};
use std::sync::Arc;

/// Shared, read-only application state handed to every request.
#[derive(Clone)]
pub struct AppState {
  pub flows: Arc<stepflow::Stepflow<AppError>>,
  pub config: Arc<AppConfig>,
  pub users: Arc<dyn UserDirectory>,
  pub orders: Arc<dyn OrderStore>,
  pub payments: Arc<dyn PaymentProvider>,
}
