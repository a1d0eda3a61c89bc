// credits_checkout/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::web::handlers::{checkout_handlers, order_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .route("/checkout", web::post().to(checkout_handlers::start_checkout_handler))
      .route("/orders/{order_no}", web::get().to(order_handlers::get_order_handler)),
  );
}
