// credits_checkout/src/web/extractors.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "user-token";

pub const NO_AUTH: &str = "no auth";
pub const INVALID_USER_TOKEN: &str = "invalid user token";

/// The caller, resolved from the `user-token` cookie through the `UserDirectory`.
///
/// Rejects with 401 when the cookie is absent or empty, or when the token
/// does not resolve to a user with a uuid. Lookup failures propagate as 500.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user: User,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = req
      .cookie(SESSION_COOKIE)
      .map(|c| c.value().trim().to_string())
      .filter(|t| !t.is_empty());
    let users = req
      .app_data::<web::Data<AppState>>()
      .map(|state| state.users.clone());

    Box::pin(async move {
      let Some(token) = token else {
        warn!("Request without session cookie.");
        return Err(AppError::Auth(NO_AUTH.to_string()));
      };
      let users = users.ok_or_else(|| AppError::Internal("AppState not registered with the app".to_string()))?;

      match users.find_by_token(&token).await? {
        Some(user) if !user.uuid.is_empty() => Ok(AuthenticatedUser { user }),
        _ => {
          warn!("Session token did not resolve to a user.");
          Err(AppError::Auth(INVALID_USER_TOKEN.to_string()))
        }
      }
    })
  }
}
