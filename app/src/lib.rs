// credits_checkout/src/lib.rs

//! Credits checkout service: creates a pending order and a hosted checkout
//! session with the payment provider for an authenticated user.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;
