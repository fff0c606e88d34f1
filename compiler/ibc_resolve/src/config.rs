/// Default initializer method name.
pub const DEFAULT_INITIALIZER: &str = "__init__";

/// Configuration for reference resolution and constructor checks.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveConfig {
    /// Maximum "did you mean" suggestions per issue.
    pub max_suggestions: usize,
    /// Candidates scoring below this similarity are never suggested.
    pub min_similarity: f64,
    /// Conventional initializer method name.
    pub initializer_name: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            max_suggestions: 3,
            min_similarity: 0.6,
            initializer_name: DEFAULT_INITIALIZER.to_string(),
        }
    }
}
