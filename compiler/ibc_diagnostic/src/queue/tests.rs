use super::*;

fn error_at(code: ErrorCode, line: u32, msg: &str) -> Diagnostic {
    Diagnostic::error(code).with_message(msg).at_line(line, "")
}

#[test]
fn test_default_keeps_everything() {
    let mut queue = IssueQueue::new();
    for _ in 0..20 {
        assert!(queue.add(error_at(ErrorCode::E2004, 3, "unknown module `a`")));
    }
    assert_eq!(queue.len(), 20);
    assert_eq!(queue.error_count(), 20);
}

#[test]
fn test_error_limit() {
    let mut queue = IssueQueue::with_config(IssueConfig {
        error_limit: 2,
        deduplicate: false,
    });
    assert!(queue.add(error_at(ErrorCode::E2004, 1, "a")));
    assert!(queue.add(error_at(ErrorCode::E2004, 2, "b")));
    assert!(queue.limit_reached());
    assert!(!queue.add(error_at(ErrorCode::E2004, 3, "c")));
    assert_eq!(queue.dropped_count(), 1);

    // warnings are not capped
    assert!(queue.add(Diagnostic::warning(ErrorCode::E1006).with_message("w")));
    assert_eq!(queue.len(), 3);
}

#[test]
fn test_deduplicate_same_line_same_message() {
    let mut queue = IssueQueue::with_config(IssueConfig::compact());
    assert!(queue.add(error_at(ErrorCode::E2005, 4, "missing `x`")));
    assert!(!queue.add(error_at(ErrorCode::E2005, 4, "missing `x`")));
    assert!(queue.add(error_at(ErrorCode::E2005, 5, "missing `x`")));
    assert!(queue.add(error_at(ErrorCode::E2005, 4, "missing `y`")));
    assert_eq!(queue.len(), 3);
}

#[test]
fn test_flush_sorts_by_line_stably() {
    let mut queue = IssueQueue::new();
    queue.add(error_at(ErrorCode::E2004, 9, "late"));
    queue.add(error_at(ErrorCode::E2001, 2, "first on 2"));
    queue.add(error_at(ErrorCode::E2003, 2, "second on 2"));

    let flushed = queue.flush();
    let messages: Vec<&str> = flushed.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first on 2", "second on 2", "late"]);
    assert!(queue.is_empty());
    assert!(!queue.has_errors());
}

#[test]
fn test_sink_impls() {
    fn report(sink: &mut impl IssueSink) {
        sink.record(error_at(ErrorCode::E2002, 1, "self outside class"));
    }

    let mut vec_sink: Vec<Diagnostic> = Vec::new();
    report(&mut vec_sink);
    assert_eq!(vec_sink.len(), 1);

    let mut queue = IssueQueue::new();
    report(&mut queue);
    assert!(queue.has_errors());
}
