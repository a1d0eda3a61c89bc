// credits_checkout/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Process-wide settings, loaded once at startup and passed to every
/// component through `AppState`. Nothing reads the environment per request.
#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub run_migrations: bool,

  /// Base for the provider's success/cancel redirects, e.g. `https://shop.example.com`.
  pub web_base_url: String,

  pub stripe_private_key: String,
  pub stripe_public_key: String,
  pub stripe_api_base: String,

  /// `project` metadata tag attached to every checkout session.
  pub checkout_project: String,
  pub checkout_product_name: String,
  pub checkout_timeout: Duration,
}

impl AppConfig {
  /// Loads the configuration from the process environment, after reading a
  /// `.env` file if one is present.
  ///
  /// # Returns
  /// The parsed config, or `AppError::Config` naming the first missing or
  /// malformed variable.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any key/value source. `from_env` feeds it the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let web_base_url = get_env("WEB_BASE_URL")?.trim_end_matches('/').to_string();

    let stripe_private_key = get_env("STRIPE_PRIVATE_KEY")?;
    let stripe_public_key = get_env("STRIPE_PUBLIC_KEY")?;
    let stripe_api_base = get_env("STRIPE_API_BASE")
      .unwrap_or_else(|_| "https://api.stripe.com".to_string())
      .trim_end_matches('/')
      .to_string();

    let checkout_project = get_env("CHECKOUT_PROJECT").unwrap_or_else(|_| "credits".to_string());
    let checkout_product_name = get_env("CHECKOUT_PRODUCT_NAME").unwrap_or_else(|_| "credits plan".to_string());
    let checkout_timeout_secs = get_env("CHECKOUT_TIMEOUT_SECS")
      .unwrap_or_else(|_| "120".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid CHECKOUT_TIMEOUT_SECS: {}", e)))?;
    if checkout_timeout_secs == 0 {
      return Err(AppError::Config("CHECKOUT_TIMEOUT_SECS must be positive".to_string()));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      run_migrations,
      web_base_url,
      stripe_private_key,
      stripe_public_key,
      stripe_api_base,
      checkout_project,
      checkout_product_name,
      checkout_timeout: Duration::from_secs(checkout_timeout_secs),
    })
  }
}

impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("run_migrations", &self.run_migrations)
      .field("web_base_url", &self.web_base_url)
      .field("stripe_private_key", &"[REDACTED]")
      .field("stripe_public_key", &self.stripe_public_key)
      .field("stripe_api_base", &self.stripe_api_base)
      .field("checkout_project", &self.checkout_project)
      .field("checkout_product_name", &self.checkout_product_name)
      .field("checkout_timeout", &self.checkout_timeout)
      .finish()
  }
}
