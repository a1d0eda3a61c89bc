// credits_checkout/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use credits_checkout::config::AppConfig;
use credits_checkout::errors::AppError;
use credits_checkout::pipelines;
use credits_checkout::services::{PgOrderStore, PgUserDirectory, StripeCheckoutClient};
use credits_checkout::state::AppState;
use credits_checkout::web::configure_app_routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting credits checkout server...");

  let app_config = Arc::new(AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    e
  })?);
  tracing::debug!(config = ?app_config, "Loaded configuration.");

  let db_pool = PgPoolOptions::new()
    .max_connections(10)
    .connect(&app_config.database_url)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "Failed to connect to the database.");
      AppError::from(e)
    })?;
  tracing::info!("Successfully connected to the database.");

  if app_config.run_migrations {
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations applied.");
  }

  let flows = Arc::new(stepflow::Stepflow::<AppError>::new());
  pipelines::register_all_pipelines(&flows);

  let app_state = AppState {
    flows,
    config: app_config.clone(),
    users: Arc::new(PgUserDirectory::new(db_pool.clone())),
    orders: Arc::new(PgOrderStore::new(db_pool)),
    payments: Arc::new(StripeCheckoutClient::new(&app_config)?),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await?;

  Ok(())
}
