// credits_checkout/src/models/order.rs

use chrono::{DateTime, Months, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::{Plan, User};

/// Integer order status as stored in `orders.order_status`.
///
/// Only `Created` is written by this service. The remaining codes belong to
/// webhook and reconciliation jobs and appear here so stored rows can be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
  Created,
  Paid,
  Expired,
  Cancelled,
}

impl OrderStatus {
  pub fn code(&self) -> i32 {
    match self {
      OrderStatus::Created => 1,
      OrderStatus::Paid => 2,
      OrderStatus::Expired => 3,
      OrderStatus::Cancelled => 4,
    }
  }

  pub fn from_code(code: i32) -> Option<Self> {
    match code {
      1 => Some(OrderStatus::Created),
      2 => Some(OrderStatus::Paid),
      3 => Some(OrderStatus::Expired),
      4 => Some(OrderStatus::Cancelled),
      _ => None,
    }
  }
}

impl Serialize for OrderStatus {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i32(self.code())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
  pub order_no: String,
  pub created_at: DateTime<Utc>,
  pub user_uuid: String,
  pub user_email: String,
  /// Minor currency units, e.g. cents.
  pub amount: i64,
  pub plan: Plan,
  pub expired_at: DateTime<Utc>,
  pub order_status: OrderStatus,
  pub session_id: Option<String>,
  pub credits: i64,
  pub currency: String,
}

impl Order {
  /// A pending order for `user`, created at `now`, without a provider session.
  pub fn new_pending(user: &User, credits: i64, amount: i64, currency: &str, plan: Plan, now: DateTime<Utc>) -> Self {
    Order {
      order_no: generate_order_no(),
      created_at: now,
      user_uuid: user.uuid.clone(),
      user_email: user.email.clone(),
      amount,
      plan,
      expired_at: one_month_after(now),
      order_status: OrderStatus::Created,
      session_id: None,
      credits,
      currency: currency.to_string(),
    }
  }
}

/// 32 lowercase hex characters, unique per call.
pub fn generate_order_no() -> String {
  Uuid::new_v4().simple().to_string()
}

/// Same day next month; clamped to the last day when the next month is shorter.
pub fn one_month_after(at: DateTime<Utc>) -> DateTime<Utc> {
  at.checked_add_months(Months::new(1)).unwrap_or(at)
}
