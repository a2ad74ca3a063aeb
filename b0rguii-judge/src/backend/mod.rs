//! Judge backend abstraction layer.
//!
//! Provides a trait-based interface over the ways a verdict can be
//! produced:
//! - Gemini vision model (remote, requires a credential)
//! - Local stand-in (no credential, fixed odds)
//! - Mock backend for testing

pub mod gemini;
pub mod mock;
pub mod standin;
pub mod traits;

pub use gemini::GeminiBackend;
pub use mock::MockJudge;
pub use standin::StandInJudge;
pub use traits::{JudgeBackend, JudgeError};
