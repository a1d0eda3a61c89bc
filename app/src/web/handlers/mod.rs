// credits_checkout/src/web/handlers/mod.rs

pub mod checkout_handlers;
pub mod order_handlers;
