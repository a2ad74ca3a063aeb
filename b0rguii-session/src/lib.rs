//! Challenge lifecycle, countdown, and persistence for b0rguii.
//!
//! This crate is the game engine behind the discipline overlord: a
//! single unit logs in, stakes credits on a timed challenge, and either
//! proves compliance with photo evidence or forfeits the stake.
//!
//! # Architecture
//!
//! ```text
//!   SessionController ──────────┬──────────────┐
//!        │                      │              │
//!        ▼                      ▼              ▼
//!   Session (rules)        StateStore     JudgeService
//!   login / challenge      JSON file or   (b0rguii-judge)
//!   shop / ad reward       in-memory
//!        ▲
//!        │ expiry
//!   Countdown task
//! ```
//!
//! [`session::Session`] holds the pure rules with explicit clock
//! inputs; [`controller::SessionController`] wires them to the wall
//! clock, a [`store::StateStore`], the judge, and the
//! [`countdown::Countdown`] that settles overdue challenges.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use b0rguii_judge::{JudgeConfig, JudgeService};
//! use b0rguii_session::{MemoryStore, SessionController};
//! use directives::Directive;
//!
//! # async fn demo() -> Result<(), b0rguii_session::SessionError> {
//! let controller = SessionController::new(
//!     Arc::new(MemoryStore::new()),
//!     JudgeService::from_config(JudgeConfig::from_env()),
//! );
//!
//! controller.login("b0rguii").await?;
//! controller.start_challenge(Directive::Study, 50, 30).await?;
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod countdown;
pub mod session;
pub mod shop;
pub mod store;
pub mod types;

pub use controller::SessionController;
pub use countdown::Countdown;
pub use session::{
    Session, AD_REWARD, BOOSTED_AD_REWARD, DAILY_LOGIN_BONUS, DOUBLE_AD_ITEM, INACTIVITY_FEE,
    INACTIVITY_THRESHOLD_HOURS, MAX_DURATION_MINUTES, MIN_BET, MIN_DURATION_MINUTES,
    STARTING_CREDITS,
};
pub use shop::{ShopItem, ShopItemKind};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError, STORAGE_NAME};
pub use types::{ActiveChallenge, ChallengeOutcome, Resolution, SessionError, User};
