//! Diagnostic system for the IBC front end.
//!
//! Every phase reports through the same shape:
//! - Error codes for searchability (`E0xxx` lexer, `E1xxx` parser,
//!   `E2xxx` reference resolution, `E9xxx` internal)
//! - A message saying what went wrong
//! - The source line number and line text
//! - Ranked "did you mean" suggestions
//!
//! Phases never print. They hand [`Diagnostic`] values to an [`IssueSink`]
//! supplied by the caller; [`IssueQueue`] is the stock implementation.

mod diagnostic;
mod error_code;
pub mod queue;
pub mod suggest;

pub use diagnostic::{Diagnostic, Severity, Suggestion};
pub use error_code::ErrorCode;
pub use queue::{IssueConfig, IssueQueue, IssueSink};
