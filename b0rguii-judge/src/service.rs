//! JudgeService - main entry point for evidence verification.
//!
//! Orchestrates prompt assembly, the backend call, and verdict parsing.
//! `verify` cannot fail: remote trouble of any kind is absorbed into a
//! failing [`Verdict`] carrying the matching overlord message, so
//! callers deal with verdicts only.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use directives::PromptAssembler;

use crate::audit::{JudgmentRecord, JudgmentStats, VerificationLog};
use crate::backend::gemini::{GeminiBackend, API_KEY_ENV, DEFAULT_MODEL};
use crate::backend::standin::StandInJudge;
use crate::backend::traits::JudgeBackend;
use crate::request::VerificationRequest;
use crate::verdict::Verdict;

/// Configuration for the judge service.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Model identifier for the remote judge
    pub model: String,
    /// Credential for the remote judge; `None` selects the stand-in
    pub api_key: Option<String>,
    /// Simulated latency of the stand-in
    pub stand_in_latency: Duration,
    /// Per-request timeout for the remote judge
    pub request_timeout: Duration,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            stand_in_latency: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl JudgeConfig {
    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key,
            ..Default::default()
        }
    }
}

/// Main entry point for evidence verification.
pub struct JudgeService {
    /// Remote judge, present iff a credential is configured
    remote: Option<Arc<dyn JudgeBackend>>,
    /// Credential-less fallback
    stand_in: StandInJudge,
    /// Trail of issued verdicts
    log: VerificationLog,
}

impl JudgeService {
    /// Create a service over an explicit backend (or none, for the
    /// stand-in).
    pub fn new(remote: Option<Arc<dyn JudgeBackend>>) -> Self {
        Self {
            remote,
            stand_in: StandInJudge::new(),
            log: VerificationLog::new(),
        }
    }

    /// Create a service from configuration.
    pub fn from_config(config: JudgeConfig) -> Self {
        let remote = config.api_key.as_deref().map(|key| {
            Arc::new(
                GeminiBackend::new(key)
                    .with_model(config.model.clone())
                    .with_timeout(config.request_timeout),
            ) as Arc<dyn JudgeBackend>
        });

        if remote.is_none() {
            info!("no judge credential configured, stand-in verification active");
        }

        Self {
            remote,
            stand_in: StandInJudge::new().with_latency(config.stand_in_latency),
            log: VerificationLog::new(),
        }
    }

    /// Replace the stand-in (tests tune latency and odds).
    pub fn with_stand_in(mut self, stand_in: StandInJudge) -> Self {
        self.stand_in = stand_in;
        self
    }

    /// Whether a remote judge is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Verify one evidence submission.
    ///
    /// Always returns a verdict; backend and parse failures become
    /// failing verdicts with the failure's user-facing message.
    pub async fn verify(&self, request: VerificationRequest) -> Verdict {
        let started = std::time::Instant::now();

        let prompt = PromptAssembler::build_judgment_prompt(
            request.directive,
            request.challenge_started_at,
            request.captured_at,
            Utc::now(),
        );

        debug!(
            request_id = %request.request_id,
            directive = %request.directive,
            image_bytes = request.image.data.len(),
            prompt_tokens = PromptAssembler::estimate_tokens(&prompt),
            "judging evidence submission"
        );

        let (backend_id, stand_in, outcome) = match &self.remote {
            Some(backend) => (
                backend.id().to_string(),
                false,
                backend.judge(&prompt, &request.image).await,
            ),
            None => {
                warn!(
                    request_id = %request.request_id,
                    "no judge credential configured, using stand-in verification"
                );
                (
                    self.stand_in.id().to_string(),
                    true,
                    self.stand_in.judge(&prompt, &request.image).await,
                )
            }
        };

        let verdict = match outcome {
            Ok(raw) => match Verdict::parse(&raw) {
                Ok(verdict) => verdict,
                Err(err) => {
                    warn!(
                        request_id = %request.request_id,
                        error = %err,
                        "judge answer was unreadable"
                    );
                    Verdict::fail(err.user_message())
                }
            },
            Err(err) => {
                warn!(
                    request_id = %request.request_id,
                    error = %err,
                    "judge call failed"
                );
                Verdict::fail(err.user_message())
            }
        };

        info!(
            request_id = %request.request_id,
            directive = %request.directive,
            success = verdict.success,
            stand_in,
            "verdict issued"
        );

        self.log
            .record(JudgmentRecord {
                entry_id: uuid::Uuid::new_v4().to_string(),
                request_id: request.request_id.clone(),
                directive: request.directive,
                backend_id,
                stand_in,
                verdict: verdict.clone(),
                requested_at: request.requested_at,
                duration_ms: started.elapsed().as_millis() as u64,
            })
            .await;

        verdict
    }

    /// Get recent judgment records.
    pub async fn recent_judgments(&self, limit: usize) -> Vec<JudgmentRecord> {
        self.log.recent(limit).await
    }

    /// Get judgment statistics.
    pub async fn judgment_stats(&self) -> JudgmentStats {
        self.log.stats().await
    }
}
