use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E2004)
        .with_message("unknown module `nmpy`")
        .at_line(12, "    调用 $nmpy.array$")
        .with_note("module aliases come from `module` lines")
        .with_suggestions(vec![Suggestion::new("numpy")]);

    assert_eq!(diag.code, ErrorCode::E2004);
    assert!(diag.is_error());
    assert!(!diag.is_warning());
    assert_eq!(diag.line_num, 12);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_full_message_lists_suggestions_with_descriptions() {
    let diag = Diagnostic::error(ErrorCode::E2005)
        .with_message("`Ball.mvoe` not found in module `ball`")
        .with_suggestions(vec![
            Suggestion::new("Ball.move").with_description(Some("移动小球")),
            Suggestion::new("Ball.mode").with_description(None::<String>),
        ]);

    assert_eq!(
        diag.full_message(),
        "`Ball.mvoe` not found in module `ball`; did you mean: `Ball.move` (移动小球), `Ball.mode`?"
    );
}

#[test]
fn test_full_message_without_suggestions() {
    let diag = Diagnostic::warning(ErrorCode::E0007).with_message("empty reference");
    assert_eq!(diag.full_message(), "empty reference");
}

#[test]
fn test_diagnostic_display_format() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("reference `$Ball$` needs a scope")
        .at_line(3, "var b: $Ball$")
        .with_note("a note")
        .with_suggestions(vec![Suggestion::new("ball.Ball")]);

    let output = diag.to_string();
    assert!(output.contains("error [E2001]: reference `$Ball$` needs a scope"));
    assert!(output.contains("--> line 3"));
    assert!(output.contains("| var b: $Ball$"));
    assert!(output.contains("= note: a note"));
    assert!(output.contains("= help: did you mean `ball.Ball`?"));
}
