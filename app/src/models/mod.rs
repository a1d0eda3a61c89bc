// credits_checkout/src/models/mod.rs

//! Domain records shared by the pipeline, the stores and the web layer.

pub mod order;
pub mod plan;
pub mod user;

pub use order::{Order, OrderStatus};
pub use plan::Plan;
pub use user::User;
