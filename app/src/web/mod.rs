// credits_checkout/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;

pub use extractors::{AuthenticatedUser, SESSION_COOKIE};
pub use routes::configure_app_routes;
