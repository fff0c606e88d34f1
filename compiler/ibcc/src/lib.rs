//! Pipeline driver for the IBC front end.
//!
//! Wires the phase crates together:
//!
//! ```text
//! source ─ lex ─ parse ─ symbols ─ constructors ─ visible view ─ resolve
//! ```
//!
//! [`compile_source`] runs one file against symbol tables it can load;
//! [`check_project`] runs a whole set of files, building every file's table
//! first and resolving all of them in parallel afterwards.

use std::sync::Once;

pub mod commands;
mod error;
mod pipeline;
mod project;

pub use error::DriverError;
pub use pipeline::{compile_source, parse_source, DriverConfig, FileReport};
pub use project::{check_project, ProjectReport, SourceFile};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=ibc_resolve=debug` or
/// `RUST_LOG=trace`; set `IBC_LOG_TREE=1` for indented span trees instead of
/// flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let filter = EnvFilter::from_default_env();
        let tree = std::env::var_os("IBC_LOG_TREE")
            .map(|_| tracing_tree::HierarchicalLayer::new(2).with_targets(true));
        let flat = tree
            .is_none()
            .then(|| fmt::layer().with_target(true).with_level(true));

        tracing_subscriber::registry()
            .with(flat)
            .with(tree)
            .with(filter)
            .init();
    });
}
