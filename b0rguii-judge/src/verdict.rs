//! Verdict type and tolerant parsing of judge output.
//!
//! The judge model is instructed to answer with a JSON object carrying
//! `success` and `message`. Models drift, so parsing is deliberately
//! forgiving: a missing `success` counts as a rejection and a missing
//! `message` falls back to the glitch text. Only input that is not JSON
//! at all is reported as malformed.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::backend::traits::JudgeError;

/// Shown when the judge answered but the verdict could not be read.
pub const GLITCH_MESSAGE: &str = "ERROR. System glitch. Try again, meat-sack.";

/// Shown when the judge could not be reached at all.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "ERROR. Communication with the Overlord failed. You win this time... or do you?";

/// Shown when the configured credential was rejected.
pub const CREDENTIAL_REJECTED_MESSAGE: &str =
    "ERROR. Invalid Access Key. The Overlord cannot be reached without proper credentials.";

/// Shown when the judge is over quota.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "ERROR. Overlord is processing too many units. Try again in a moment.";

/// Stand-in verdict text for a passed verification.
pub const STAND_IN_SUCCESS_MESSAGE: &str =
    "Verification complete. You are 0.04% more disciplined. Don't let it go to your head.";

/// Stand-in verdict text for a failed verification.
pub const STAND_IN_FAILURE_MESSAGE: &str =
    "FAILURE. My sensors detect a lack of compliance. Your credits have been harvested.";

/// Outcome of judging one evidence submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Verdict {
    /// Whether the evidence satisfied the verification method
    pub success: bool,
    /// The overlord's commentary, always present
    pub message: String,
}

impl Verdict {
    /// Create a passing verdict.
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Create a failing verdict.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Parse raw judge output into a verdict.
    ///
    /// Empty or non-JSON input is malformed. Valid JSON is accepted even
    /// when fields are missing: `success` defaults to `false`, `message`
    /// to [`GLITCH_MESSAGE`].
    pub fn parse(raw: &str) -> Result<Self, JudgeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JudgeError::MalformedVerdict("empty response".to_string()));
        }

        let value: serde_json::Value = serde_json::from_str(trimmed)
            .map_err(|e| JudgeError::MalformedVerdict(e.to_string()))?;

        let success = value
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let message = value
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| GLITCH_MESSAGE.to_string());

        Ok(Self { success, message })
    }
}
