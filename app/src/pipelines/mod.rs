// credits_checkout/src/pipelines/mod.rs

//! Defines and registers the stepflow pipelines used by the service.

use crate::errors::AppError;
use std::sync::Arc;
use stepflow::Stepflow;

pub mod checkout_pipeline;
pub mod contexts;

/// Registers every pipeline with the registry. Called once at startup.
pub fn register_all_pipelines(flows: &Arc<Stepflow<AppError>>) {
  tracing::info!("Registering pipelines...");
  checkout_pipeline::register_checkout_pipeline(flows);
  tracing::info!("All application pipelines registered.");
}
