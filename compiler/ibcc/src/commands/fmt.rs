//! The `fmt` command: print files rebuilt from their AST.
//!
//! Several files are reconstructed in parallel; output keeps argument order.

use ibc_diagnostic::Diagnostic;
use rayon::prelude::*;

use super::{emit_diagnostics, read_file};

/// Flags accepted by `ibc fmt`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Report files whose reconstruction differs instead of printing them.
    pub check: bool,
    pub paths: Vec<String>,
}

impl FormatOptions {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = FormatOptions::default();
        for arg in args {
            match arg.as_str() {
                "--check" => options.check = true,
                flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
                path => options.paths.push(path.to_string()),
            }
        }
        if options.paths.is_empty() {
            return Err("missing file path".to_string());
        }
        Ok(options)
    }
}

enum Outcome {
    Rebuilt { text: String, changed: bool },
    Failed(Vec<Diagnostic>),
}

fn rebuild(path: &str) -> Outcome {
    let content = read_file(path);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    match crate::parse_source(path, &content, &mut diagnostics) {
        Ok(_) if diagnostics.iter().any(Diagnostic::is_error) => Outcome::Failed(diagnostics),
        Ok(ast) => {
            let text = ibc_fmt::reconstruct(&ast);
            let changed = text.trim_end() != content.trim_end();
            Outcome::Rebuilt { text, changed }
        }
        Err(e) => Outcome::Failed(vec![e.to_diagnostic()]),
    }
}

/// Run `ibc fmt [--check] <file>...`.
pub fn format_files(args: &[String]) {
    let options = match FormatOptions::parse(args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("Usage: ibc fmt [--check] <file.ibc>...");
            std::process::exit(1);
        }
    };

    let outcomes: Vec<Outcome> = options.paths.par_iter().map(|p| rebuild(p)).collect();

    let mut failed = false;
    let many = options.paths.len() > 1;
    for (path, outcome) in options.paths.iter().zip(outcomes) {
        match outcome {
            Outcome::Failed(diagnostics) => {
                emit_diagnostics(path, &diagnostics);
                failed = true;
            }
            Outcome::Rebuilt { changed, .. } if options.check => {
                if changed {
                    println!("would reformat: {path}");
                    failed = true;
                }
            }
            Outcome::Rebuilt { text, .. } => {
                if many {
                    println!("// {path}");
                }
                print!("{text}");
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
