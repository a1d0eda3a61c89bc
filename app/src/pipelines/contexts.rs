// credits_checkout/src/pipelines/contexts.rs

//! Underlying data structs run by the checkout pipelines.
//! Handlers receive these wrapped in `stepflow::ContextData`.

use serde::Deserialize;

use crate::models::{Order, Plan, User};
use crate::services::CheckoutSession;
use crate::state::AppState;

/// Body of `POST /api/v1/checkout`, as sent. Presence and value checks
/// happen in the `validate_checkout_request` step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
  pub credits: Option<i64>,
  pub currency: Option<String>,
  pub amount: Option<i64>,
  pub plan: Option<String>,
}

/// Checked purchase terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTerms {
  pub credits: i64,
  /// ISO currency code exactly as sent.
  pub currency: String,
  pub amount: i64,
  pub plan: Plan,
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub user: User,
  pub request: CheckoutRequest,
  pub terms: Option<CheckoutTerms>,
  /// Set once the pending row is written.
  pub order: Option<Order>,
  pub session: Option<CheckoutSession>,
  pub session_attached: bool,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, user: User, request: CheckoutRequest) -> Self {
    Self {
      app_state,
      user,
      request,
      terms: None,
      order: None,
      session: None,
      session_attached: false,
    }
  }
}
