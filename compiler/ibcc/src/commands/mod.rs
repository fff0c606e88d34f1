//! Command handlers for the `ibc` developer CLI.
//!
//! Each submodule implements one command. Shared helpers for reading input
//! and printing diagnostics live here in the module root.

use ibc_diagnostic::Diagnostic;

mod check;
mod debug;
mod fmt;

pub use check::{check_file, CheckOptions};
pub use debug::{lex_file, parse_file};
pub use fmt::{format_files, FormatOptions};

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print diagnostics for `path` to stderr.
pub(crate) fn emit_diagnostics(path: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprint!("{path}: {diagnostic}");
    }
}
