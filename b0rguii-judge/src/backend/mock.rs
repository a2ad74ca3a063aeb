//! Mock judge backend for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::traits::{JudgeBackend, JudgeError};
use crate::request::EvidenceImage;
use crate::verdict::Verdict;

/// Mock backend for testing.
///
/// Configurable raw response, failure, and latency for unit tests.
pub struct MockJudge {
    backend_id: String,
    response: String,
    failure: Option<JudgeError>,
    latency: Duration,
    call_count: AtomicU32,
}

impl MockJudge {
    /// Create a new mock judge.
    pub fn new(backend_id: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            response: r#"{"success": true, "message": "Mock verdict"}"#.to_string(),
            failure: None,
            latency: Duration::ZERO,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the raw response text.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Script a well-formed verdict as the response.
    pub fn with_verdict(self, success: bool, message: impl Into<String>) -> Self {
        let verdict = Verdict {
            success,
            message: message.into(),
        };
        // Verdict serialization over plain fields cannot fail
        let raw = serde_json::to_string(&verdict).unwrap_or_default();
        self.with_response(raw)
    }

    /// Script a failure instead of a response.
    pub fn with_failure(mut self, failure: JudgeError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Add artificial latency to every call (for race tests).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Get the number of times judge was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count.
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockJudge {
    fn default() -> Self {
        Self::new("mock-judge")
    }
}

#[async_trait]
impl JudgeBackend for MockJudge {
    fn id(&self) -> &str {
        &self.backend_id
    }

    async fn judge(&self, _prompt: &str, _image: &EvidenceImage) -> Result<String, JudgeError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        Ok(self.response.clone())
    }
}
