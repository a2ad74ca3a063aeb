//! Core traits for judge backends.
//!
//! This module defines the `JudgeBackend` trait - the abstraction over
//! the remote vision model and its local stand-in.

use async_trait::async_trait;

use crate::request::EvidenceImage;
use crate::verdict;

/// Error types for judge operations.
///
/// Every variant maps to a distinct user-facing message via
/// [`JudgeError::user_message`]; the service layer absorbs these into
/// failing verdicts so callers never see a raw error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JudgeError {
    /// The configured credential was rejected
    #[error("credential rejected by the judge endpoint")]
    CredentialRejected,

    /// Too many requests, judge is over quota
    #[error("judge quota exceeded, retry after {retry_after_ms:?}ms")]
    QuotaExceeded { retry_after_ms: Option<u64> },

    /// The judge endpoint could not be reached
    #[error("transport failure: {0}")]
    Transport(String),

    /// The judge answered but the verdict could not be read
    #[error("malformed verdict: {0}")]
    MalformedVerdict(String),

    /// The evidence payload itself could not be decoded
    #[error("invalid evidence: {0}")]
    InvalidEvidence(String),
}

impl JudgeError {
    /// The overlord-voiced message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CredentialRejected => verdict::CREDENTIAL_REJECTED_MESSAGE,
            Self::QuotaExceeded { .. } => verdict::QUOTA_EXCEEDED_MESSAGE,
            Self::Transport(_) => verdict::TRANSPORT_FAILURE_MESSAGE,
            Self::MalformedVerdict(_) => verdict::GLITCH_MESSAGE,
            Self::InvalidEvidence(_) => verdict::GLITCH_MESSAGE,
        }
    }
}

/// Core trait for judge backends.
///
/// A backend takes the assembled judgment prompt plus the evidence image
/// and returns the model's raw text answer. Parsing the answer into a
/// [`crate::Verdict`] is the service's job, so remote and stand-in
/// output flow through the same path.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    /// Get the backend identifier (e.g., model name).
    fn id(&self) -> &str;

    /// Judge one evidence submission, returning the raw model text.
    async fn judge(&self, prompt: &str, image: &EvidenceImage) -> Result<String, JudgeError>;
}
