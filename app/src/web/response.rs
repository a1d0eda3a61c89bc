// credits_checkout/src/web/response.rs

//! The `{code, message, data}` envelope every API response is wrapped in.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

pub const CODE_OK: i32 = 0;
pub const CODE_ERR: i32 = -1;

#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
  code: i32,
  message: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  data: Option<T>,
}

/// `200` with `{code: 0, message: "ok", data}`.
pub fn resp_data<T: Serialize>(data: T) -> HttpResponse {
  HttpResponse::Ok().json(Envelope {
    code: CODE_OK,
    message: "ok",
    data: Some(data),
  })
}

/// `{code: -1, message}` with the given status.
pub fn resp_err(status: StatusCode, message: &str) -> HttpResponse {
  HttpResponse::build(status).json(Envelope::<()> {
    code: CODE_ERR,
    message,
    data: None,
  })
}
