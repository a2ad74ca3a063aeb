//! Verification request types.
//!
//! A request bundles the evidence image with the directive under judgment
//! and the timing context the prompt needs for its stale-evidence rule.

use chrono::{DateTime, Utc};
use directives::Directive;

use crate::backend::traits::JudgeError;

/// An evidence photo, as raw bytes plus its MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct EvidenceImage {
    /// MIME type sent to the judge (`image/jpeg`, `image/png`, ...)
    pub mime_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl EvidenceImage {
    /// Create an image with an explicit MIME type.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Create a JPEG image.
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self::new("image/jpeg", data)
    }

    /// Create a PNG image.
    pub fn png(data: Vec<u8>) -> Self {
        Self::new("image/png", data)
    }

    /// Decode a browser-style data URL (`data:image/jpeg;base64,...`).
    ///
    /// A bare base64 payload without the `data:` header is accepted too
    /// and treated as JPEG, matching what camera capture widgets hand
    /// over.
    pub fn from_data_url(url: &str) -> Result<Self, JudgeError> {
        use base64::{engine::general_purpose, Engine as _};

        let (header, payload) = match url.split_once(',') {
            Some((header, payload)) => (Some(header), payload),
            None => (None, url),
        };

        let mime_type = header
            .and_then(|h| h.strip_prefix("data:"))
            .and_then(|h| h.split(';').next())
            .filter(|m| !m.is_empty())
            .unwrap_or("image/jpeg")
            .to_string();

        let data = general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| JudgeError::InvalidEvidence(format!("base64 decode failed: {}", e)))?;

        Ok(Self { mime_type, data })
    }

    /// Encode the image bytes as standard base64 for the wire.
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        general_purpose::STANDARD.encode(&self.data)
    }
}

impl std::fmt::Debug for EvidenceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EvidenceImage({}, {} bytes)", self.mime_type, self.data.len())
    }
}

/// Request to judge one evidence submission.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    /// Unique request identifier
    pub request_id: String,
    /// Directive the evidence is submitted for
    pub directive: Directive,
    /// The evidence photo
    pub image: EvidenceImage,
    /// When the challenge began, if a challenge context exists
    pub challenge_started_at: Option<DateTime<Utc>>,
    /// Evidence file modification time, if the capturer reported one
    pub captured_at: Option<DateTime<Utc>>,
    /// When the request was made
    pub requested_at: DateTime<Utc>,
}

impl VerificationRequest {
    /// Create a new request.
    pub fn new(directive: Directive, image: EvidenceImage) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            directive,
            image,
            challenge_started_at: None,
            captured_at: None,
            requested_at: Utc::now(),
        }
    }

    /// Set the challenge start instant.
    pub fn with_challenge_started_at(mut self, instant: DateTime<Utc>) -> Self {
        self.challenge_started_at = Some(instant);
        self
    }

    /// Set the evidence capture instant.
    pub fn with_captured_at(mut self, instant: DateTime<Utc>) -> Self {
        self.captured_at = Some(instant);
        self
    }
}
