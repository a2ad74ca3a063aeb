//! Core types for the session engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use directives::Directive;

use crate::store::StoreError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// The player unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct User {
    /// Stable unit identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Credit balance; debits clamp at zero
    pub credits: u64,
    /// Consecutive completed challenges
    pub streak: u32,
    /// Most recent login instant
    pub last_login: DateTime<Utc>,
}

/// A locked-in challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ActiveChallenge {
    /// Unique id for this challenge instance
    pub challenge_id: String,
    /// Directive under challenge
    pub directive: Directive,
    /// Credits staked, double or nothing
    pub bet_amount: u64,
    /// When the challenge was locked in
    pub started_at: DateTime<Utc>,
    /// Deadline for evidence
    pub expires_at: DateTime<Utc>,
}

impl ActiveChallenge {
    /// Time left before the deadline, floored at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.expires_at - now).to_std().unwrap_or_default()
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// How a challenge was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum Resolution {
    /// Evidence accepted: stake paid out, streak extended
    Completed,
    /// Evidence rejected: stake seized, streak reset
    Failed,
    /// Deadline passed: stake seized, streak reset
    Expired,
}

/// Snapshot of the settlement a resolution produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ChallengeOutcome {
    /// How the challenge ended
    pub resolution: Resolution,
    /// Directive that was challenged
    pub directive: Directive,
    /// Credits that were staked
    pub bet_amount: u64,
    /// Balance after settlement
    pub credits: u64,
    /// Streak after settlement
    pub streak: u32,
}

/// Error types for the session engine.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Operation needs a logged-in unit
    #[error("no unit is logged in")]
    NotLoggedIn,

    /// Only one challenge can run at a time
    #[error("a challenge is already locked in: {0}")]
    ChallengeAlreadyActive(Directive),

    /// Nothing to settle or submit against
    #[error("no active challenge")]
    NoActiveChallenge,

    /// Bet below the minimum stake
    #[error("invalid bet amount: {0}")]
    InvalidBetAmount(u64),

    /// Stake or price exceeds the balance
    #[error("insufficient credits: needed {needed}, available {available}")]
    InsufficientCredits { needed: u64, available: u64 },

    /// Duration outside the allowed range
    #[error("invalid challenge duration: {0} minutes")]
    InvalidDuration(u32),

    /// Item id not in the shop catalog
    #[error("unknown shop item: {0}")]
    UnknownShopItem(String),

    /// Item was already purchased
    #[error("item already owned: {0}")]
    AlreadyOwned(String),

    /// An evidence submission is already being judged
    #[error("a verification is already in flight")]
    VerificationInFlight,

    /// Persistence failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
