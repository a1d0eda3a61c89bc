// stepflow/src/lib.rs

//! Stepflow: a small asynchronous step pipeline.
//!
//! A pipeline is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that operate on a shared
//! [`ContextData`] and decide whether the run continues or stops.
//!  - Optional steps and per-step skip conditions.
//!  - Early, non-error termination via [`PipelineControl::Stop`].
//!  - A registry ([`Stepflow`]) that runs the pipeline registered for a context type.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Stepflow;

/*
    Typical use:
    1. Define a context struct `MyCtx` holding the inputs and outputs of the process.
    2. Build a `Pipeline<MyCtx, MyError>` from step definitions.
    3. Attach async handlers with `.on_root()`, `.before_root()`, `.after_root()`.
    4. Register the pipeline with a `Stepflow<MyError>` registry at startup.
    5. Per request: wrap a fresh `MyCtx` in `ContextData`, call `registry.run(ctx.clone())`,
       then read the outputs back from `ctx`.
*/
