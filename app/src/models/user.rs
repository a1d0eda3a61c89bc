// credits_checkout/src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
  pub uuid: String,
  pub email: String,
  /// Set when the account signed in through an external platform identity.
  pub platform: Option<String>,
}

impl User {
  /// True for any non-empty `platform`, whitespace included.
  pub fn has_external_platform(&self) -> bool {
    self.platform.as_deref().is_some_and(|p| !p.is_empty())
  }
}
