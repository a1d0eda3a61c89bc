// credits_checkout/src/pipelines/checkout_pipeline.rs

//! The checkout workflow: validate, persist a pending order, open a hosted
//! checkout session with the provider, attach the session id to the order.
//!
//! The order row is written before the provider is contacted, so a failed
//! provider call leaves a pending order behind. Nothing is rolled back or
//! retried here; pending orders are reconciled elsewhere.

use chrono::Utc;
use std::sync::Arc;
use stepflow::{ContextData, Pipeline, PipelineControl, Stepflow};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{Order, Plan};
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutRequest, CheckoutTerms};
use crate::services::payment_provider::build_session_request;

pub const INVALID_PARAMS: &str = "invalid params";
pub const INVALID_PLAN: &str = "invalid plan";

pub const STEP_VALIDATE: &str = "validate_checkout_request";
pub const STEP_CREATE_ORDER: &str = "create_pending_order";
pub const STEP_CREATE_SESSION: &str = "create_provider_session";
pub const STEP_ATTACH_SESSION: &str = "attach_session_to_order";

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    (STEP_VALIDATE, false, None),
    (STEP_CREATE_ORDER, false, None),
    (STEP_CREATE_SESSION, false, None),
    (STEP_ATTACH_SESSION, false, None),
  ]);

  p.on_root(STEP_VALIDATE, validate_checkout_request);
  p.on_root(STEP_CREATE_ORDER, create_pending_order);
  p.on_root(STEP_CREATE_SESSION, create_provider_session);
  p.on_root(STEP_ATTACH_SESSION, attach_session_to_order);

  p.after_root(STEP_ATTACH_SESSION, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      info!(
        order_no = guard.order.as_ref().map(|o| o.order_no.as_str()),
        session_id = guard.session.as_ref().map(|s| s.id.as_str()),
        session_attached = guard.session_attached,
        "Checkout session ready."
      );
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}

/// Builds the checkout pipeline and registers it for `CheckoutCtxData`.
pub fn register_checkout_pipeline(flows: &Arc<Stepflow<AppError>>) {
  flows.register_pipeline(build_checkout_pipeline());
  info!("Checkout pipeline registered.");
}

/// Presence checks on the raw body.
///
/// # Arguments
/// * `req`: The body as deserialized, every field optional.
///
/// # Returns
/// The terms with every value kept exactly as sent, or
/// `AppError::Validation`:
/// * `invalid params` when a field is missing, null, zero or an empty string.
///   Other values (negative numbers, whitespace) pass; the provider judges them.
/// * `invalid plan` when `plan` is neither `monthly` nor `one-time`.
pub fn validate_terms(req: &CheckoutRequest) -> Result<CheckoutTerms, AppError> {
  let credits = req.credits.filter(|c| *c != 0);
  let amount = req.amount.filter(|a| *a != 0);
  let currency = req.currency.as_deref().filter(|c| !c.is_empty());
  let plan = req.plan.as_deref().filter(|p| !p.is_empty());

  let (Some(credits), Some(amount), Some(currency), Some(plan)) = (credits, amount, currency, plan) else {
    return Err(AppError::Validation(INVALID_PARAMS.to_string()));
  };

  let plan = plan
    .parse::<Plan>()
    .map_err(|_| AppError::Validation(INVALID_PLAN.to_string()))?;

  Ok(CheckoutTerms {
    credits,
    currency: currency.to_string(),
    amount,
    plan,
  })
}

async fn validate_checkout_request(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let terms = validate_terms(&ctx_data.read().request)?;
  ctx_data.write().terms = Some(terms);
  Ok(PipelineControl::Continue)
}

async fn create_pending_order(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (orders, order) = {
    let guard = ctx_data.read();
    let terms = guard
      .terms
      .as_ref()
      .ok_or_else(|| AppError::Internal("checkout terms missing before order creation".to_string()))?;
    let order = Order::new_pending(
      &guard.user,
      terms.credits,
      terms.amount,
      &terms.currency,
      terms.plan,
      Utc::now(),
    );
    (guard.app_state.orders.clone(), order)
  };

  orders.insert_order(&order).await?;
  info!(
    order_no = %order.order_no,
    user_uuid = %order.user_uuid,
    amount = order.amount,
    currency = %order.currency,
    credits = order.credits,
    plan = %order.plan,
    "Created pending order."
  );

  ctx_data.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

async fn create_provider_session(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (payments, request) = {
    let guard = ctx_data.read();
    let order = guard
      .order
      .as_ref()
      .ok_or_else(|| AppError::Internal("order missing before session creation".to_string()))?;
    let request = build_session_request(order, &guard.user, &guard.app_state.config);
    (guard.app_state.payments.clone(), request)
  };

  let session = payments.create_checkout_session(&request).await?;
  ctx_data.write().session = Some(session);
  Ok(PipelineControl::Continue)
}

/// Best effort: the provider session already exists, so a failed update is
/// logged for reconciliation and the checkout still succeeds.
async fn attach_session_to_order(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (orders, order_no, session_id) = {
    let guard = ctx_data.read();
    let order_no = guard.order.as_ref().map(|o| o.order_no.clone());
    let session_id = guard.session.as_ref().map(|s| s.id.clone());
    match (order_no, session_id) {
      (Some(order_no), Some(session_id)) => (guard.app_state.orders.clone(), order_no, session_id),
      _ => return Err(AppError::Internal("order or session missing before attach".to_string())),
    }
  };

  match orders.update_order_session(&order_no, &session_id).await {
    Ok(()) => {
      info!(%order_no, %session_id, "Attached provider session to order.");
      let mut guard = ctx_data.write();
      guard.session_attached = true;
      if let Some(order) = guard.order.as_mut() {
        order.session_id = Some(session_id);
      }
    }
    Err(e) => {
      warn!(%order_no, %session_id, error = %e, "Failed to attach provider session to order.");
    }
  }
  Ok(PipelineControl::Continue)
}
