// credits_checkout/src/services/mod.rs

//! External collaborators of the checkout: session lookup, order storage and
//! the payment provider. Each is a trait with one production implementation;
//! the test suites plug in in-memory versions.

pub mod auth_service;
pub mod order_store;
pub mod payment_provider;
pub mod stripe_client;

pub use auth_service::{PgUserDirectory, UserDirectory};
pub use order_store::{OrderStore, PgOrderStore};
pub use payment_provider::{CheckoutSession, CheckoutSessionRequest, PaymentProvider};
pub use stripe_client::StripeCheckoutClient;
