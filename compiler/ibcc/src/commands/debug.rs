//! Debug commands: `lex` and `parse` for inspecting front-end output.

use ibc_diagnostic::{Diagnostic, ErrorCode};

use super::{emit_diagnostics, read_file};

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    let output = match ibc_lexer::tokenize(&content) {
        Ok(output) => output,
        Err(e) => {
            emit_diagnostics(path, &[e.to_diagnostic()]);
            std::process::exit(1);
        }
    };

    println!("Tokens for '{}' ({} tokens):", path, output.tokens.len());
    for tok in output.tokens.iter() {
        println!("  {:?} {:?} @ line {}", tok.kind, tok.text, tok.line_number);
    }

    let warnings: Vec<Diagnostic> = output
        .warnings
        .iter()
        .map(ibc_lexer::LexWarning::to_diagnostic)
        .collect();
    emit_diagnostics(path, &warnings);
}

/// Parse a file and print its AST as JSON.
///
/// Structural diagnostics go to stderr; the exit code is 1 if any is an error.
pub fn parse_file(path: &str) {
    let content = read_file(path);
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let ast = match crate::parse_source(path, &content, &mut diagnostics) {
        Ok(ast) => ast,
        Err(e) => {
            emit_diagnostics(path, &[e.to_diagnostic()]);
            std::process::exit(1);
        }
    };

    match ast.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            let diag = Diagnostic::error(ErrorCode::E9001)
                .with_message(format!("cannot serialize AST: {e}"));
            emit_diagnostics(path, &[diag]);
            std::process::exit(1);
        }
    }

    emit_diagnostics(path, &diagnostics);
    if diagnostics.iter().any(Diagnostic::is_error) {
        std::process::exit(1);
    }
}
