// stepflow/src/core/control.rs

//! Flow signals returned by handlers and the outcome of a whole run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Run the next handler, or the next step.
  Continue,
  /// Halt the run now. Remaining handlers and steps are not executed.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step was executed or skipped.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
