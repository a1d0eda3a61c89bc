// credits_checkout/src/services/payment_provider.rs

//! Provider-neutral description of a hosted checkout session and the
//! `PaymentProvider` seam the pipeline talks to.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{Order, User};

/// `pay_scene` metadata tag for credit purchases.
pub const PAY_SCENE_BUY_CREDITS: &str = "buy-credits";

/// Orders in exactly this currency code are paid with WeChat Pay instead of
/// cards. The comparison is case-sensitive: `CNY` stays on cards.
pub const WALLET_CURRENCY: &str = "cny";

/// Substituted by the provider with the real session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
  Payment,
  Subscription,
}

impl CheckoutMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      CheckoutMode::Payment => "payment",
      CheckoutMode::Subscription => "subscription",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
  Card,
  WechatPay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringInterval {
  Month,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
  pub product_name: String,
  pub currency: String,
  pub unit_amount: i64,
  pub quantity: u32,
  pub recurring: Option<RecurringInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
  pub mode: CheckoutMode,
  pub line_items: Vec<LineItem>,
  pub metadata: BTreeMap<String, String>,
  pub success_url: String,
  pub cancel_url: String,
  pub allow_promotion_codes: bool,
  pub payment_method_types: Vec<PaymentMethod>,
  /// WeChat Pay client option, only set for wallet payments.
  pub wechat_pay_client: Option<String>,
  pub customer_email: Option<String>,
}

/// What the provider hands back for a created session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
  pub id: String,
  pub url: Option<String>,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
  /// Publishable key the browser uses to redirect into the hosted checkout.
  fn public_key(&self) -> &str;

  /// Opens a hosted checkout session.
  ///
  /// # Arguments
  /// * `request`: The session to create, built by [`build_session_request`].
  ///
  /// # Returns
  /// The provider's session id (and hosted URL, when given), or
  /// `AppError::Payment` when the provider rejects or cannot be reached.

  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession>;
}

/// Builds the session request for a freshly persisted pending order.
///
/// # Arguments
/// * `order`: The pending order; supplies amount, currency, plan and metadata.
/// * `user`: The buyer. Accounts with an external `platform` get no `customer_email`.
/// * `config`: Product name, project tag and the redirect base URL.
///
/// # Returns
/// A single-item request: `subscription` with a monthly recurring price for
/// monthly plans, `payment` otherwise; WeChat Pay for `cny`, cards for
/// everything else.
pub fn build_session_request(order: &Order, user: &User, config: &AppConfig) -> CheckoutSessionRequest {
  let recurring = order.plan.is_recurring().then_some(RecurringInterval::Month);
  let mode = if order.plan.is_recurring() {
    CheckoutMode::Subscription
  } else {
    CheckoutMode::Payment
  };

  let mut metadata = BTreeMap::new();
  metadata.insert("project".to_string(), config.checkout_project.clone());
  metadata.insert("pay_scene".to_string(), PAY_SCENE_BUY_CREDITS.to_string());
  metadata.insert("order_no".to_string(), order.order_no.clone());
  metadata.insert("user_email".to_string(), order.user_email.clone());
  metadata.insert("credits".to_string(), order.credits.to_string());

  let (payment_method_types, wechat_pay_client) = if order.currency == WALLET_CURRENCY {
    (vec![PaymentMethod::WechatPay], Some("web".to_string()))
  } else {
    (vec![PaymentMethod::Card], None)
  };

  CheckoutSessionRequest {
    mode,
    line_items: vec![LineItem {
      product_name: config.checkout_product_name.clone(),
      currency: order.currency.clone(),
      unit_amount: order.amount,
      quantity: 1,
      recurring,
    }],
    metadata,
    success_url: format!("{}/pay-success/{}", config.web_base_url, SESSION_ID_PLACEHOLDER),
    cancel_url: format!("{}/pricing", config.web_base_url),
    allow_promotion_codes: false,
    payment_method_types,
    wechat_pay_client,
    customer_email: (!user.has_external_platform()).then(|| order.user_email.clone()),
  }
}
