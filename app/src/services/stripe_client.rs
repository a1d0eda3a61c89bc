// credits_checkout/src/services/stripe_client.rs

//! `PaymentProvider` backed by Stripe Checkout Sessions through `async-stripe`.

use async_trait::async_trait;
use stripe::{
  CheckoutSessionMode, CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
  CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionLineItemsPriceDataRecurring,
  CreateCheckoutSessionLineItemsPriceDataRecurringInterval, CreateCheckoutSessionPaymentMethodOptions,
  CreateCheckoutSessionPaymentMethodOptionsWechatPay, CreateCheckoutSessionPaymentMethodOptionsWechatPayClient,
  CreateCheckoutSessionPaymentMethodTypes, Currency, StripeError,
};
use tracing::{info, instrument, warn};

use super::payment_provider::{
  CheckoutMode, CheckoutSession, CheckoutSessionRequest, PaymentMethod, PaymentProvider, RecurringInterval,
};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

pub struct StripeCheckoutClient {
  client: stripe::Client,
  public_key: String,
}

impl StripeCheckoutClient {
  /// Creates a client for the API at `config.stripe_api_base`, authenticated
  /// with the secret key.
  ///
  /// # Arguments
  /// * `config`: Loaded application settings. Only the Stripe keys and API base are read.
  ///
  /// # Returns
  /// `AppError::Config` when the API base is not an `http(s)` URL.
  pub fn new(config: &AppConfig) -> Result<Self> {
    let base = config.stripe_api_base.as_str();
    if !(base.starts_with("https://") || base.starts_with("http://")) {
      return Err(AppError::Config(format!("STRIPE_API_BASE must be an http(s) URL, got '{}'", base)));
    }
    Ok(Self {
      client: stripe::Client::from_url(base, config.stripe_private_key.clone()),
      public_key: config.stripe_public_key.clone(),
    })
  }
}

impl std::fmt::Debug for StripeCheckoutClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StripeCheckoutClient")
      .field("public_key", &self.public_key)
      .finish_non_exhaustive()
  }
}

/// Translates the provider-neutral request into the SDK's create parameters.
///
/// The currency code is matched against Stripe's lowercase currency list; a
/// code Stripe does not know is `AppError::Payment` before anything is sent.
pub fn session_params(req: &CheckoutSessionRequest) -> Result<CreateCheckoutSession<'_>> {
  let mut params = CreateCheckoutSession::new();
  params.mode = Some(match req.mode {
    CheckoutMode::Payment => CheckoutSessionMode::Payment,
    CheckoutMode::Subscription => CheckoutSessionMode::Subscription,
  });
  params.success_url = Some(req.success_url.as_str());
  params.cancel_url = Some(req.cancel_url.as_str());
  params.allow_promotion_codes = Some(req.allow_promotion_codes);
  params.customer_email = req.customer_email.as_deref();

  let line_items = req
    .line_items
    .iter()
    .map(|item| {
      let currency = item
        .currency
        .to_ascii_lowercase()
        .parse::<Currency>()
        .map_err(|_| AppError::Payment(format!("unsupported currency '{}'", item.currency)))?;
      Ok(CreateCheckoutSessionLineItems {
        quantity: Some(u64::from(item.quantity)),
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
          currency,
          unit_amount: Some(item.unit_amount),
          product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
            name: item.product_name.clone(),
            ..Default::default()
          }),
          recurring: item.recurring.map(|interval| CreateCheckoutSessionLineItemsPriceDataRecurring {
            interval: match interval {
              RecurringInterval::Month => CreateCheckoutSessionLineItemsPriceDataRecurringInterval::Month,
            },
            interval_count: None,
          }),
          ..Default::default()
        }),
        ..Default::default()
      })
    })
    .collect::<Result<Vec<_>>>()?;
  params.line_items = Some(line_items);

  params.payment_method_types = Some(
    req
      .payment_method_types
      .iter()
      .map(|method| match method {
        PaymentMethod::Card => CreateCheckoutSessionPaymentMethodTypes::Card,
        PaymentMethod::WechatPay => CreateCheckoutSessionPaymentMethodTypes::WechatPay,
      })
      .collect(),
  );

  // Only "web" is ever requested for WeChat Pay.
  if req.wechat_pay_client.is_some() {
    params.payment_method_options = Some(CreateCheckoutSessionPaymentMethodOptions {
      wechat_pay: Some(CreateCheckoutSessionPaymentMethodOptionsWechatPay {
        app_id: None,
        client: CreateCheckoutSessionPaymentMethodOptionsWechatPayClient::Web,
        setup_future_usage: None,
      }),
      ..Default::default()
    });
  }

  params.metadata = Some(req.metadata.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
  Ok(params)
}

/// Folds SDK errors into `AppError::Payment`, keeping status, code and message for the logs.
fn map_stripe_error(error: StripeError) -> AppError {
  match error {
    StripeError::Stripe(request_error) => {
      let message = request_error.message.clone().unwrap_or_else(|| "unknown error".to_string());
      let code = request_error.code.as_ref().map(|c| format!("{:?}", c));
      warn!(status = request_error.http_status, ?code, %message, "Provider rejected checkout session.");
      AppError::Payment(format!(
        "status={} {} ({})",
        request_error.http_status,
        message,
        code.unwrap_or_else(|| "no code".to_string())
      ))
    }
    StripeError::Timeout => AppError::Payment("request to provider timed out".to_string()),
    other => AppError::Payment(format!("request to provider failed: {}", other)),
  }
}

#[async_trait]
impl PaymentProvider for StripeCheckoutClient {
  fn public_key(&self) -> &str {
    &self.public_key
  }

  /// Creates the hosted session. Nothing is retried; a failure is reported once.
  #[instrument(
    name = "stripe::create_checkout_session",
    skip_all,
    fields(mode = request.mode.as_str(), order_no = request.metadata.get("order_no").map(String::as_str)),
    err(Display)
  )]
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession> {
    let params = session_params(request)?;
    let session = stripe::CheckoutSession::create(&self.client, params)
      .await
      .map_err(map_stripe_error)?;

    info!(session_id = %session.id, "Checkout session created.");
    Ok(CheckoutSession {
      id: session.id.to_string(),
      url: session.url,
    })
  }
}
