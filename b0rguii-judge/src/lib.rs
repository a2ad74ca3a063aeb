//! b0rguii Judge - AI Evidence Verification
//!
//! Provides the verification client for the b0rguii accountability game:
//! - Trait-based judge backends (Gemini vision, local stand-in, mock)
//! - Tolerant verdict parsing with overlord-voiced failure messages
//! - Judgment audit trail
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             JudgeService                │
//! │   (verify() - never fails, always a     │
//! │    Verdict)                             │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ JudgeBackend│       │ directives  │
//! │ (Gemini/    │       │ catalog +   │
//! │  StandIn)   │       │ prompt      │
//! └─────────────┘       └─────────────┘
//! ```

pub mod audit;
pub mod backend;
pub mod request;
pub mod service;
pub mod verdict;

// Re-export main types for convenience
pub use audit::{JudgmentRecord, JudgmentStats, VerificationLog};
pub use backend::gemini::GeminiBackend;
pub use backend::mock::MockJudge;
pub use backend::standin::StandInJudge;
pub use backend::traits::{JudgeBackend, JudgeError};
pub use request::{EvidenceImage, VerificationRequest};
pub use service::{JudgeConfig, JudgeService};
pub use verdict::Verdict;
