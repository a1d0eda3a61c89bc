// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

use credits_checkout::config::AppConfig;
use credits_checkout::errors::{AppError, Result};
use credits_checkout::models::{Order, User};
use credits_checkout::pipelines::register_all_pipelines;
use credits_checkout::services::{CheckoutSession, CheckoutSessionRequest, OrderStore, PaymentProvider, UserDirectory};
use credits_checkout::state::AppState;

pub const GOOD_TOKEN: &str = "token-alice";
pub const OTHER_TOKEN: &str = "token-bob";
pub const PLATFORM_TOKEN: &str = "token-carol";
pub const PUBLIC_KEY: &str = "pk_test_123";

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn alice() -> User {
  User {
    uuid: "user-alice".to_string(),
    email: "alice@example.com".to_string(),
    platform: None,
  }
}

pub fn bob() -> User {
  User {
    uuid: "user-bob".to_string(),
    email: "bob@example.com".to_string(),
    platform: None,
  }
}

/// Signed in through a third-party platform; no customer email is sent for them.
pub fn carol() -> User {
  User {
    uuid: "user-carol".to_string(),
    email: "carol@example.com".to_string(),
    platform: Some("google".to_string()),
  }
}

pub fn test_config() -> AppConfig {
  let vars: HashMap<&str, &str> = HashMap::from([
    ("DATABASE_URL", "postgres://unused/test"),
    ("WEB_BASE_URL", "https://shop.example.com/"),
    ("STRIPE_PRIVATE_KEY", "sk_test_123"),
    ("STRIPE_PUBLIC_KEY", PUBLIC_KEY),
    ("CHECKOUT_TIMEOUT_SECS", "5"),
  ]);
  AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).expect("test config")
}

#[derive(Default)]
pub struct MemoryUsers {
  by_token: HashMap<String, User>,
}

impl MemoryUsers {
  pub fn seeded() -> Self {
    let mut by_token = HashMap::new();
    by_token.insert(GOOD_TOKEN.to_string(), alice());
    by_token.insert(OTHER_TOKEN.to_string(), bob());
    by_token.insert(PLATFORM_TOKEN.to_string(), carol());
    Self { by_token }
  }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
  async fn find_by_token(&self, token: &str) -> Result<Option<User>> {
    Ok(self.by_token.get(token).cloned())
  }
}

#[derive(Default)]
pub struct MemoryOrders {
  pub rows: Mutex<HashMap<String, Order>>,
  pub fail_inserts: bool,
  pub fail_session_updates: bool,
}

impl MemoryOrders {
  pub fn all(&self) -> Vec<Order> {
    self.rows.lock().values().cloned().collect()
  }

  pub fn count(&self) -> usize {
    self.rows.lock().len()
  }
}

#[async_trait]
impl OrderStore for MemoryOrders {
  async fn insert_order(&self, order: &Order) -> Result<()> {
    if self.fail_inserts {
      return Err(AppError::Internal("insert refused".to_string()));
    }
    self.rows.lock().insert(order.order_no.clone(), order.clone());
    Ok(())
  }

  async fn update_order_session(&self, order_no: &str, session_id: &str) -> Result<()> {
    if self.fail_session_updates {
      return Err(AppError::Internal("update refused".to_string()));
    }
    match self.rows.lock().get_mut(order_no) {
      Some(order) => {
        order.session_id = Some(session_id.to_string());
        Ok(())
      }
      None => Err(AppError::NotFound(format!("order {}", order_no))),
    }
  }

  async fn find_order(&self, order_no: &str) -> Result<Option<Order>> {
    Ok(self.rows.lock().get(order_no).cloned())
  }
}

/// Records every request and answers with `cs_test_<n>`, or fails when `fail` is set.
/// With `delay` set, it sleeps that long before answering.
#[derive(Default)]
pub struct RecordingProvider {
  pub requests: Mutex<Vec<CheckoutSessionRequest>>,
  pub fail: bool,
  pub delay: Option<Duration>,
}

impl RecordingProvider {
  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Default::default()
    }
  }

  pub fn slow(delay: Duration) -> Self {
    Self {
      delay: Some(delay),
      ..Default::default()
    }
  }

  pub fn last_request(&self) -> Option<CheckoutSessionRequest> {
    self.requests.lock().last().cloned()
  }

  pub fn call_count(&self) -> usize {
    self.requests.lock().len()
  }
}

#[async_trait]
impl PaymentProvider for RecordingProvider {
  fn public_key(&self) -> &str {
    PUBLIC_KEY
  }

  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession> {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    let mut requests = self.requests.lock();
    requests.push(request.clone());
    if self.fail {
      return Err(AppError::Payment("status=402 Your card was declined. (card_declined)".to_string()));
    }
    let id = format!("cs_test_{}", requests.len());
    Ok(CheckoutSession {
      url: Some(format!("https://checkout.example.com/pay/{}", id)),
      id,
    })
  }
}

pub struct Harness {
  pub state: AppState,
  pub orders: Arc<MemoryOrders>,
  pub provider: Arc<RecordingProvider>,
}

pub fn harness_with(orders: MemoryOrders, provider: RecordingProvider) -> Harness {
  harness_with_config(test_config(), orders, provider)
}

pub fn harness_with_config(config: AppConfig, orders: MemoryOrders, provider: RecordingProvider) -> Harness {
  setup_tracing();
  let orders = Arc::new(orders);
  let provider = Arc::new(provider);
  let flows = Arc::new(stepflow::Stepflow::<AppError>::new());
  register_all_pipelines(&flows);

  let state = AppState {
    flows,
    config: Arc::new(config),
    users: Arc::new(MemoryUsers::seeded()),
    orders: orders.clone(),
    payments: provider.clone(),
  };
  Harness { state, orders, provider }
}

pub fn harness() -> Harness {
  harness_with(MemoryOrders::default(), RecordingProvider::default())
}
