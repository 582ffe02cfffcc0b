//! Error taxonomy for the solve pipeline.
//!
//! Only `Input` is ever surfaced to the user as a hard failure. The other
//! variants are caught at the orchestrator boundary and downgraded to the
//! built-in solver, so the user always gets *some* Solution once the input
//! is non-empty.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
  /// Empty or whitespace-only problem text. Rejected before any work.
  #[error("please enter a math problem")]
  Input,

  /// The AI endpoint was unreachable, returned a non-success status, or the
  /// reply lacked the expected text field.
  #[error("AI service error: {0}")]
  ExternalService(String),

  /// The AI reply was not parseable JSON or did not form a valid Solution.
  #[error("AI reply violated the solution contract: {0}")]
  ContractViolation(String),
}
