//! Issue sinks and the stock collecting queue.
//!
//! Phases record into any [`IssueSink`]. [`IssueQueue`] adds:
//! - Error limits to cap output on badly broken files
//! - Optional deduplication of identical issues on one line
//! - Stable line-ordered flushing

use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorCode};

/// Receiver for issues raised by any phase.
pub trait IssueSink {
    /// Record one issue.
    fn record(&mut self, diagnostic: Diagnostic);
}

impl IssueSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: IssueSink + ?Sized> IssueSink for &mut S {
    fn record(&mut self, diagnostic: Diagnostic) {
        (**self).record(diagnostic);
    }
}

/// Configuration for issue collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IssueConfig {
    /// Maximum number of errors kept (0 = unlimited). Warnings are not capped.
    pub error_limit: usize,
    /// Drop an issue identical in code, line and message to an earlier one.
    pub deduplicate: bool,
}

impl Default for IssueConfig {
    /// Every issue is kept.
    fn default() -> Self {
        IssueConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

impl IssueConfig {
    /// Terminal-friendly settings: ten errors, duplicates folded.
    pub fn compact() -> Self {
        IssueConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

/// Collects issues in arrival order.
#[derive(Clone, Debug, Default)]
pub struct IssueQueue {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(ErrorCode, u32, String)>,
    error_count: usize,
    dropped: usize,
    config: IssueConfig,
}

impl IssueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IssueConfig) -> Self {
        IssueQueue {
            config,
            ..Self::default()
        }
    }

    /// Add an issue. Returns `false` if it was filtered out.
    pub fn add(&mut self, diagnostic: Diagnostic) -> bool {
        let is_error = diagnostic.is_error();
        if is_error && self.limit_reached() {
            self.dropped += 1;
            return false;
        }

        if self.config.deduplicate {
            let key = (
                diagnostic.code,
                diagnostic.line_num,
                diagnostic.message.clone(),
            );
            if !self.seen.insert(key) {
                return false;
            }
        }

        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Errors discarded after the limit was hit.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Drain the queue, ordered by line. Issues on the same line keep
    /// arrival order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| w[0].line_num <= w[1].line_num);
        if !already_sorted {
            self.diagnostics.sort_by_key(|d| d.line_num);
        }

        self.seen.clear();
        self.error_count = 0;
        self.dropped = 0;
        std::mem::take(&mut self.diagnostics)
    }
}

impl IssueSink for IssueQueue {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

#[cfg(test)]
mod tests;
