// credits_checkout/src/services/order_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderStatus, Plan};

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Persists a freshly created order.
  ///
  /// # Arguments
  /// * `order`: The pending order. Its `order_no` must not exist yet.
  ///
  /// # Returns
  /// `Ok(())` once the row is durable, or an `AppError` (e.g. a unique
  /// violation on `order_no`, or a connection failure).
  async fn insert_order(&self, order: &Order) -> Result<()>;

  /// Attaches the provider session id to an existing order.
  ///
  /// # Arguments
  /// * `order_no`: The order to update.
  /// * `session_id`: Identifier returned by the payment provider.
  ///
  /// # Returns
  /// `Ok(())` on success. Unknown `order_no` is `AppError::NotFound`.
  async fn update_order_session(&self, order_no: &str, session_id: &str) -> Result<()>;

  /// Fetches an order by its number, `Ok(None)` when absent.
  async fn find_order(&self, order_no: &str) -> Result<Option<Order>>;
}

pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(FromRow)]
struct OrderRow {
  order_no: String,
  created_at: DateTime<Utc>,
  user_uuid: String,
  user_email: String,
  amount: i64,
  plan: String,
  expired_at: DateTime<Utc>,
  order_status: i32,
  session_id: Option<String>,
  credits: i64,
  currency: String,
}

impl TryFrom<OrderRow> for Order {
  type Error = AppError;

  fn try_from(row: OrderRow) -> Result<Self> {
    let plan = row
      .plan
      .parse::<Plan>()
      .map_err(|e| AppError::Internal(format!("order {}: {}", row.order_no, e)))?;
    let order_status = OrderStatus::from_code(row.order_status).ok_or_else(|| {
      AppError::Internal(format!("order {}: unknown status code {}", row.order_no, row.order_status))
    })?;
    Ok(Order {
      order_no: row.order_no,
      created_at: row.created_at,
      user_uuid: row.user_uuid,
      user_email: row.user_email,
      amount: row.amount,
      plan,
      expired_at: row.expired_at,
      order_status,
      session_id: row.session_id,
      credits: row.credits,
      currency: row.currency,
    })
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "order_store::insert_order", skip_all, fields(order_no = %order.order_no), err(Display))]
  async fn insert_order(&self, order: &Order) -> Result<()> {
    sqlx::query(
      r#"INSERT INTO orders
           (order_no, created_at, user_uuid, user_email, amount, plan, expired_at, order_status, session_id, credits, currency)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
    )
    .bind(&order.order_no)
    .bind(order.created_at)
    .bind(&order.user_uuid)
    .bind(&order.user_email)
    .bind(order.amount)
    .bind(order.plan.as_str())
    .bind(order.expired_at)
    .bind(order.order_status.code())
    .bind(&order.session_id)
    .bind(order.credits)
    .bind(&order.currency)
    .execute(&self.pool)
    .await?;
    info!("Order row inserted.");
    Ok(())
  }

  #[instrument(name = "order_store::update_order_session", skip(self), err(Display))]
  async fn update_order_session(&self, order_no: &str, session_id: &str) -> Result<()> {
    let result = sqlx::query("UPDATE orders SET session_id = $1 WHERE order_no = $2")
      .bind(session_id)
      .bind(order_no)
      .execute(&self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound(format!("order {}", order_no)));
    }
    Ok(())
  }

  #[instrument(name = "order_store::find_order", skip(self), err(Display))]
  async fn find_order(&self, order_no: &str) -> Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(
      r#"SELECT order_no, created_at, user_uuid, user_email, amount, plan, expired_at,
                order_status, session_id, credits, currency
         FROM orders
         WHERE order_no = $1"#,
    )
    .bind(order_no)
    .fetch_optional(&self.pool)
    .await?;
    row.map(Order::try_from).transpose()
  }
}
