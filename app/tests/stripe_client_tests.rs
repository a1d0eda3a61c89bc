// tests/stripe_client_tests.rs
//
// Runs StripeCheckoutClient against a local stand-in for the Stripe API.

#![recursion_limit = "256"]
mod common;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use parking_lot::Mutex;
use std::sync::Arc;

use common::*;
use credits_checkout::config::AppConfig;
use credits_checkout::errors::AppError;
use credits_checkout::models::{Order, Plan};
use credits_checkout::services::payment_provider::build_session_request;
use credits_checkout::services::{PaymentProvider, StripeCheckoutClient};

#[derive(Default)]
struct Captured {
  authorization: Option<String>,
  form: Vec<(String, String)>,
}

type Shared = Arc<Mutex<Captured>>;

/// A `checkout.session` object as the API returns it on create.
fn session_object() -> serde_json::Value {
  serde_json::json!({
    "id": "cs_test_local",
    "object": "checkout.session",
    "after_expiration": null,
    "allow_promotion_codes": false,
    "amount_subtotal": 999,
    "amount_total": 999,
    "automatic_tax": { "enabled": false, "liability": null, "status": null },
    "billing_address_collection": null,
    "cancel_url": "https://shop.example.com/pricing",
    "client_reference_id": null,
    "client_secret": null,
    "consent": null,
    "consent_collection": null,
    "created": 1717000000,
    "currency": "usd",
    "currency_conversion": null,
    "custom_fields": [],
    "custom_text": {
      "after_submit": null,
      "shipping_address": null,
      "submit": null,
      "terms_of_service_acceptance": null
    },
    "customer": null,
    "customer_creation": "always",
    "customer_details": null,
    "customer_email": "alice@example.com",
    "expires_at": 1717086400,
    "invoice": null,
    "invoice_creation": null,
    "livemode": false,
    "locale": null,
    "metadata": {},
    "mode": "subscription",
    "payment_intent": null,
    "payment_link": null,
    "payment_method_collection": "always",
    "payment_method_configuration_details": null,
    "payment_method_options": {},
    "payment_method_types": ["card"],
    "payment_status": "unpaid",
    "phone_number_collection": { "enabled": false },
    "recovered_from": null,
    "redirect_on_completion": "always",
    "saved_payment_method_options": null,
    "setup_intent": null,
    "shipping_address_collection": null,
    "shipping_cost": null,
    "shipping_details": null,
    "shipping_options": [],
    "status": "open",
    "submit_type": null,
    "subscription": null,
    "success_url": "https://shop.example.com/pay-success/{CHECKOUT_SESSION_ID}",
    "total_details": { "amount_discount": 0, "amount_shipping": 0, "amount_tax": 0 },
    "ui_mode": "hosted",
    "url": "https://checkout.example.com/c/pay/cs_test_local"
  })
}

async fn accept_session(req: HttpRequest, form: web::Form<Vec<(String, String)>>, seen: web::Data<Shared>) -> HttpResponse {
  let mut captured = seen.lock();
  captured.authorization = req
    .headers()
    .get("authorization")
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);
  captured.form = form.into_inner();
  HttpResponse::Ok().json(session_object())
}

async fn reject_session() -> HttpResponse {
  HttpResponse::PaymentRequired().json(serde_json::json!({
    "error": { "type": "card_error", "code": "card_declined", "message": "Your card was declined." }
  }))
}

/// Starts the stand-in on an ephemeral port and returns a config pointing at it.
fn spawn_provider(accept: bool, seen: Shared) -> AppConfig {
  let server = HttpServer::new(move || {
    let route = if accept {
      web::post().to(accept_session)
    } else {
      web::post().to(reject_session)
    };
    App::new()
      .app_data(web::Data::new(seen.clone()))
      .route("/v1/checkout/sessions", route)
  })
  .workers(1)
  .bind(("127.0.0.1", 0))
  .expect("bind local provider");
  let addr = server.addrs()[0];
  actix_web::rt::spawn(server.run());

  let mut config = test_config();
  config.stripe_api_base = format!("http://{}", addr);
  config
}

fn pending_order() -> Order {
  Order::new_pending(&alice(), 100, 999, "usd", Plan::Monthly, chrono::Utc::now())
}

fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
  form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

#[actix_web::test]
async fn posts_form_encoded_session_with_bearer_key() {
  setup_tracing();
  let seen: Shared = Arc::default();
  let config = spawn_provider(true, seen.clone());
  let client = StripeCheckoutClient::new(&config).expect("client");

  let order = pending_order();
  let request = build_session_request(&order, &alice(), &config);
  let session = client.create_checkout_session(&request).await.expect("session created");

  assert_eq!(session.id, "cs_test_local");
  assert_eq!(session.url.as_deref(), Some("https://checkout.example.com/c/pay/cs_test_local"));
  assert_eq!(client.public_key(), PUBLIC_KEY);

  let captured = seen.lock();
  assert_eq!(captured.authorization.as_deref(), Some("Bearer sk_test_123"));
  let form = &captured.form;
  assert_eq!(value(form, "mode"), Some("subscription"));
  assert_eq!(value(form, "line_items[0][price_data][unit_amount]"), Some("999"));
  assert_eq!(value(form, "line_items[0][price_data][recurring][interval]"), Some("month"));
  assert_eq!(value(form, "metadata[order_no]"), Some(order.order_no.as_str()));
  assert_eq!(
    value(form, "success_url"),
    Some("https://shop.example.com/pay-success/{CHECKOUT_SESSION_ID}")
  );
}

#[actix_web::test]
async fn provider_errors_become_payment_errors() {
  setup_tracing();
  let config = spawn_provider(false, Arc::default());
  let client = StripeCheckoutClient::new(&config).expect("client");

  let request = build_session_request(&pending_order(), &alice(), &config);
  match client.create_checkout_session(&request).await {
    Err(AppError::Payment(detail)) => {
      assert!(detail.contains("402"), "detail: {}", detail);
      assert!(detail.contains("Your card was declined."), "detail: {}", detail);
    }
    other => panic!("Expected payment error, got {:?}", other),
  }
}
