//! Local stand-in judgment for credential-less runs.
//!
//! When no API key is configured the app stays playable: the stand-in
//! waits a fixed simulated latency and then passes roughly 70% of
//! submissions. It answers with the same JSON shape as the remote model
//! so the verdict parse path stays uniform.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use super::traits::{JudgeBackend, JudgeError};
use crate::request::EvidenceImage;
use crate::verdict::{Verdict, STAND_IN_FAILURE_MESSAGE, STAND_IN_SUCCESS_MESSAGE};

const DEFAULT_LATENCY: Duration = Duration::from_secs(2);
const DEFAULT_SUCCESS_RATE: f64 = 0.7;

/// Stand-in judge used when no credential is configured.
pub struct StandInJudge {
    latency: Duration,
    success_rate: f64,
}

impl StandInJudge {
    /// Create a stand-in with the stock latency and success rate.
    pub fn new() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            success_rate: DEFAULT_SUCCESS_RATE,
        }
    }

    /// Set the simulated latency (tests use zero).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the success probability, clamped to `0.0..=1.0`.
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate.clamp(0.0, 1.0);
        self
    }
}

impl Default for StandInJudge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JudgeBackend for StandInJudge {
    fn id(&self) -> &str {
        "stand-in"
    }

    async fn judge(&self, _prompt: &str, _image: &EvidenceImage) -> Result<String, JudgeError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let success = rand::thread_rng().gen_bool(self.success_rate);
        let verdict = if success {
            Verdict::pass(STAND_IN_SUCCESS_MESSAGE)
        } else {
            Verdict::fail(STAND_IN_FAILURE_MESSAGE)
        };

        serde_json::to_string(&verdict).map_err(|e| JudgeError::MalformedVerdict(e.to_string()))
    }
}
