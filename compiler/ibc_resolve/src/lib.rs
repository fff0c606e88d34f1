//! Semantic checks over a parsed IBC file.
//!
//! - [`resolve`]: validates every `$`-reference against the visible symbol
//!   view, the file's module imports and the external-library allow-list.
//! - [`validate_constructors`]: rejects classes declaring both constructor
//!   forms and records constructor parameters in class metadata.
//!
//! Both report through an [`IssueSink`](ibc_diagnostic::IssueSink) and never
//! fail: every problem is a recorded issue and checking continues.
//!
//! # Reference forms
//!
//! | reference              | checked against                                  |
//! |------------------------|--------------------------------------------------|
//! | `$self.member$`        | members of the enclosing class                   |
//! | `$alias.path$`         | symbols of the module imported as `alias`        |
//! | `$extlib.anything$`    | nothing (external libraries are not tracked)     |
//! | `$Local.member$`       | the file's own symbols                           |
//!
//! Call and index suffixes (`$a.b(x)$`, `$a.b[0]$`) are ignored.

mod config;
mod constructor;
mod imports;
mod resolver;

pub use config::ResolveConfig;
pub use constructor::validate_constructors;
pub use imports::{ModuleImport, ModuleImports};
pub use resolver::{reference_segments, resolve, ResolveScope};
