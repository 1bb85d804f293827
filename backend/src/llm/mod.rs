//! Explanation generation through a language model.
//!
//! The playground only sees the [`ExplanationGenerator`] capability; the
//! concrete client ([`OpenAiGenerator`]) talks to an OpenAI-compatible chat
//! completions endpoint.

use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAiGenerator;

/// Error body message returned to clients when the explainer fails.
pub const GPT_FAILED_MESSAGE: &str = "GPT failed.";

#[derive(Debug, thiserror::Error)]
pub enum ExplainerError {
    #[error("Explainer is not configured: {0}")]
    NotConfigured(String),

    #[error("Explainer request failed: {0}")]
    Transport(String),

    #[error("Explainer request timed out")]
    Timeout,

    #[error("Explainer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed explainer response: {0}")]
    Malformed(String),
}

/// Something that can turn a prompt into explanation text.
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    /// Returns the trimmed model output. `structure` is an optional outline
    /// placed under the `Structure:` heading of the request.
    async fn explain(&self, prompt: &str, structure: Option<&str>)
        -> Result<String, ExplainerError>;
}
