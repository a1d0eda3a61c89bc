// credits_checkout/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutRequest};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response::resp_data;
use stepflow::{ContextData, PipelineResult};

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
  pub public_key: String,
  pub order_no: String,
  pub session_id: String,
}

/// `POST /api/v1/checkout`.
///
/// # Arguments
/// * `app_state`: Shared state holding the pipeline registry and config.
/// * `auth_user`: The caller, resolved from the session cookie before this runs.
/// * `body`: Raw JSON body; parsed here so a malformed body maps to `checkout failed`.
///
/// # Returns
/// `{public_key, order_no, session_id}` in the success envelope. Validation
/// errors reach the caller as 400. Every later failure (store, provider,
/// timeout, an unexpected stop) is logged and reported as `checkout failed`.
#[instrument(
    name = "handler::start_checkout",
    skip(app_state, auth_user, body),
    fields(user_uuid = %auth_user.user.uuid)
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let request: CheckoutRequest = serde_json::from_slice(&body).map_err(|e| {
    error!(error = %e, "Checkout body is not a valid request.");
    AppError::CheckoutFailed
  })?;

  let ctx_data = ContextData::new(CheckoutCtxData::new(
    app_state.get_ref().clone(),
    auth_user.user,
    request,
  ));

  // Bounds the whole run, provider call included.
  let timeout = app_state.config.checkout_timeout;
  let outcome = tokio::time::timeout(timeout, app_state.flows.run(ctx_data.clone())).await;

  match outcome {
    Ok(Ok(PipelineResult::Completed)) => {}
    Ok(Ok(PipelineResult::Stopped)) => {
      warn!("Checkout pipeline stopped before completion.");
      return Err(AppError::CheckoutFailed);
    }
    Ok(Err(AppError::Validation(message))) => {
      return Err(AppError::Validation(message));
    }
    Ok(Err(cause)) => {
      let order_no = ctx_data.read().order.as_ref().map(|o| o.order_no.clone());
      error!(error = %cause, ?order_no, "Checkout failed.");
      return Err(AppError::CheckoutFailed);
    }
    Err(_elapsed) => {
      error!(timeout_secs = timeout.as_secs(), "Checkout timed out.");
      return Err(AppError::CheckoutFailed);
    }
  }

  let response = {
    let guard = ctx_data.read();
    match (guard.order.as_ref(), guard.session.as_ref()) {
      (Some(order), Some(session)) => CheckoutResponse {
        public_key: app_state.payments.public_key().to_string(),
        order_no: order.order_no.clone(),
        session_id: session.id.clone(),
      },
      _ => {
        error!("Checkout pipeline completed without an order or session.");
        return Err(AppError::CheckoutFailed);
      }
    }
  };

  info!(order_no = %response.order_no, session_id = %response.session_id, "Checkout started.");
  Ok(resp_data(response))
}
