// credits_checkout/src/services/auth_service.rs

//! Resolves opaque session tokens to user accounts.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::errors::Result;
use crate::models::User;

#[async_trait]
pub trait UserDirectory: Send + Sync {
  /// Looks up the account behind a session token.
  ///
  /// # Arguments
  /// * `token`: The raw `user-token` cookie value, already checked to be non-empty.
  ///
  /// # Returns
  /// `Ok(Some(user))` for a live session, `Ok(None)` for unknown or expired
  /// tokens, or an `AppError` when the directory itself cannot be reached.
  async fn find_by_token(&self, token: &str) -> Result<Option<User>>;
}

pub struct PgUserDirectory {
  pool: PgPool,
}

impl PgUserDirectory {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Sessions without `expired_at` never expire.
#[async_trait]
impl UserDirectory for PgUserDirectory {
  #[instrument(name = "auth_service::find_by_token", skip_all, err(Display))]
  async fn find_by_token(&self, token: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      r#"SELECT u.uuid, u.email, u.platform
         FROM user_sessions s
         JOIN users u ON u.uuid = s.user_uuid
         WHERE s.token = $1
           AND (s.expired_at IS NULL OR s.expired_at > NOW())"#,
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;

    debug!(found = user.is_some(), "Session token lookup finished.");
    Ok(user)
  }
}
