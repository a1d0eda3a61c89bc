// credits_checkout/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::response::resp_data;

pub const ORDER_NOT_FOUND: &str = "order not found";

/// `GET /api/v1/orders/{order_no}`.
///
/// # Arguments
/// * `auth_user`: The caller; only their own orders are visible.
/// * `path`: The order number from the URL.
///
/// # Returns
/// The stored order in the success envelope, or 404 `order not found` for
/// unknown orders and for orders owned by someone else.
#[instrument(
    name = "handler::get_order",
    skip(app_state, auth_user),
    fields(user_uuid = %auth_user.user.uuid)
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_no = path.into_inner();

  let order = app_state
    .orders
    .find_order(&order_no)
    .await?
    .filter(|o| o.user_uuid == auth_user.user.uuid)
    .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.to_string()))?;

  info!(%order_no, status = order.order_status.code(), "Order fetched.");
  Ok(resp_data(order))
}
