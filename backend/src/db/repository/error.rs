//! Error types for repository operations.
//!
//! Both variants carry an [`ErrorContext`] so load failures can be traced
//! back to the dataset and file that caused them.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a dataset load went wrong.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// e.g. "load_dataset"
    pub operation: Option<String>,
    /// e.g. "block_summary", "answer_samples"
    pub dataset: Option<String>,
    pub path: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_path(mut self, path: impl fmt::Display) -> Self {
        self.path = Some(path.to_string());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("operation", &self.operation),
            ("dataset", &self.dataset),
            ("path", &self.path),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
        .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A dataset file could not be read.
    #[error("Load error: {message} {context}")]
    LoadError {
        message: String,
        context: ErrorContext,
    },

    /// A dataset file was read but is not valid JSON of the expected shape.
    #[error("Parse error: {message} {context}")]
    ParseError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn load_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::LoadError {
            message: message.into(),
            context,
        }
    }

    pub fn parse_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ParseError {
            message: message.into(),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("load_dataset")
            .with_dataset("block_summary")
            .with_path("data/block_summary.json");
        assert_eq!(
            ctx.to_string(),
            "[operation=load_dataset, dataset=block_summary, path=data/block_summary.json]"
        );
    }

    #[test]
    fn test_partial_context_skips_missing_fields() {
        let err = RepositoryError::parse_with_context(
            "expected value at line 1 column 1",
            ErrorContext::new("load_dataset").with_dataset("answer_samples"),
        );
        assert_eq!(
            err.to_string(),
            "Parse error: expected value at line 1 column 1 [operation=load_dataset, dataset=answer_samples]"
        );
    }
}
