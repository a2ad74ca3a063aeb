//! Session state machine.
//!
//! The pure rules of the game: login economics, the challenge lifecycle,
//! the shop, and the ad reward. Every time-sensitive operation takes an
//! explicit `now` so outcomes are deterministic under test; the async
//! controller supplies the wall clock.
//!
//! `Session` is also the persisted document shape — what a
//! [`crate::store::StateStore`] saves and loads is this struct,
//! serialized with camelCase field names.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use directives::Directive;

use crate::shop::ShopItem;
use crate::types::{ActiveChallenge, ChallengeOutcome, Resolution, Result, SessionError, User};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Credits a brand-new unit starts with.
pub const STARTING_CREDITS: u64 = 100;

/// Bonus for the first login of a UTC calendar day.
pub const DAILY_LOGIN_BONUS: u64 = 10;

/// Maintenance fee charged after prolonged inactivity.
pub const INACTIVITY_FEE: u64 = 20;

/// Hours of inactivity before the maintenance fee applies.
pub const INACTIVITY_THRESHOLD_HOURS: i64 = 48;

/// Smallest stake a challenge can be locked in with.
pub const MIN_BET: u64 = 10;

/// Shortest allowed challenge duration.
pub const MIN_DURATION_MINUTES: u32 = 5;

/// Longest allowed challenge duration.
pub const MAX_DURATION_MINUTES: u32 = 120;

/// Credits granted for sitting through an ad.
pub const AD_REWARD: u64 = 5;

/// Ad reward once the marketing perk is owned.
pub const BOOSTED_AD_REWARD: u64 = 10;

/// Shop id of the perk that doubles the ad reward.
pub const DOUBLE_AD_ITEM: &str = "double-ad";

/// Stable id of the single unit this engine manages.
pub const USER_ID: &str = "user-1";

/// The whole player session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Session {
    /// Logged-in unit, if any
    pub user: Option<User>,
    /// Ids of purchased shop items; these survive logout
    pub purchased_items: BTreeSet<String>,
    /// The locked-in challenge, if one is running
    pub active_challenge: Option<ActiveChallenge>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a unit is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Current balance, zero when logged out.
    pub fn credits(&self) -> u64 {
        self.user.as_ref().map(|u| u.credits).unwrap_or(0)
    }

    /// Current streak, zero when logged out.
    pub fn streak(&self) -> u32 {
        self.user.as_ref().map(|u| u.streak).unwrap_or(0)
    }

    /// Whether a shop item has been purchased.
    pub fn owns(&self, item_id: &str) -> bool {
        self.purchased_items.contains(item_id)
    }

    /// Log the unit in, applying the login economics.
    ///
    /// A fresh unit starts with [`STARTING_CREDITS`] and no streak. A
    /// returning unit keeps its balance and streak, then in order: the
    /// daily bonus if the last login fell on a different UTC calendar
    /// day, and the inactivity fee (clamped at zero) if more than
    /// [`INACTIVITY_THRESHOLD_HOURS`] have passed. Both adjustments
    /// apply at most once per login.
    pub fn login(&mut self, name: impl Into<String>, now: DateTime<Utc>) -> &User {
        let user = match self.user.take() {
            Some(mut user) => {
                if user.last_login.date_naive() != now.date_naive() {
                    user.credits = user.credits.saturating_add(DAILY_LOGIN_BONUS);
                }
                if now - user.last_login > Duration::hours(INACTIVITY_THRESHOLD_HOURS) {
                    user.credits = user.credits.saturating_sub(INACTIVITY_FEE);
                }
                user.name = name.into();
                user.last_login = now;
                user
            }
            None => User {
                id: USER_ID.to_string(),
                name: name.into(),
                credits: STARTING_CREDITS,
                streak: 0,
                last_login: now,
            },
        };
        self.user.insert(user)
    }

    /// End the session. Purchases survive; the running challenge does not.
    pub fn logout(&mut self) {
        self.user = None;
        self.active_challenge = None;
    }

    /// Credit the unit's balance, returning the new balance.
    pub fn add_credits(&mut self, amount: u64) -> Result<u64> {
        let user = self.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
        user.credits = user.credits.saturating_add(amount);
        Ok(user.credits)
    }

    /// Debit the unit's balance, clamping at zero.
    pub fn remove_credits(&mut self, amount: u64) -> Result<u64> {
        let user = self.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
        user.credits = user.credits.saturating_sub(amount);
        Ok(user.credits)
    }

    /// Grant the ad-watch reward and return how much was granted:
    /// [`AD_REWARD`], or [`BOOSTED_AD_REWARD`] with the marketing perk.
    pub fn claim_ad_reward(&mut self) -> Result<u64> {
        let reward = if self.owns(DOUBLE_AD_ITEM) {
            BOOSTED_AD_REWARD
        } else {
            AD_REWARD
        };
        self.add_credits(reward)?;
        Ok(reward)
    }

    /// Lock in a challenge.
    ///
    /// Rejected while another challenge is active, when the stake is
    /// below [`MIN_BET`] or above the balance, or when the duration
    /// falls outside [`MIN_DURATION_MINUTES`]..=[`MAX_DURATION_MINUTES`].
    /// The stake is not deducted here; it is settled on resolution.
    pub fn start_challenge(
        &mut self,
        directive: Directive,
        bet_amount: u64,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<&ActiveChallenge> {
        let user = self.user.as_ref().ok_or(SessionError::NotLoggedIn)?;
        if let Some(active) = &self.active_challenge {
            return Err(SessionError::ChallengeAlreadyActive(active.directive));
        }
        if bet_amount < MIN_BET {
            return Err(SessionError::InvalidBetAmount(bet_amount));
        }
        if bet_amount > user.credits {
            return Err(SessionError::InsufficientCredits {
                needed: bet_amount,
                available: user.credits,
            });
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(SessionError::InvalidDuration(duration_minutes));
        }

        let challenge = ActiveChallenge {
            challenge_id: uuid::Uuid::new_v4().to_string(),
            directive,
            bet_amount,
            started_at: now,
            expires_at: now + Duration::minutes(i64::from(duration_minutes)),
        };
        Ok(self.active_challenge.insert(challenge))
    }

    /// Settle the active challenge as won: the stake is paid out on top
    /// of the untouched balance and the streak extends.
    ///
    /// Returns `None` without changing anything when no challenge is
    /// active — a settlement that lost the race to an earlier one is a
    /// no-op, never a double settlement.
    pub fn complete_challenge(&mut self) -> Option<ChallengeOutcome> {
        self.resolve(Resolution::Completed)
    }

    /// Settle the active challenge as lost: the stake is seized
    /// (clamped at zero) and the streak resets. `None` when idle.
    pub fn fail_challenge(&mut self) -> Option<ChallengeOutcome> {
        self.resolve(Resolution::Failed)
    }

    /// Settle the active challenge as expired. Economically identical
    /// to a failure; the resolution records why. `None` when idle.
    pub fn expire_challenge(&mut self) -> Option<ChallengeOutcome> {
        self.resolve(Resolution::Expired)
    }

    fn resolve(&mut self, resolution: Resolution) -> Option<ChallengeOutcome> {
        if self.user.is_none() {
            return None;
        }
        let challenge = self.active_challenge.take()?;
        let user = self.user.as_mut()?;

        match resolution {
            Resolution::Completed => {
                user.credits = user.credits.saturating_add(challenge.bet_amount);
                user.streak += 1;
            }
            Resolution::Failed | Resolution::Expired => {
                user.credits = user.credits.saturating_sub(challenge.bet_amount);
                user.streak = 0;
            }
        }

        Some(ChallengeOutcome {
            resolution,
            directive: challenge.directive,
            bet_amount: challenge.bet_amount,
            credits: user.credits,
            streak: user.streak,
        })
    }

    /// Buy a shop item.
    ///
    /// Unknown ids, repeat purchases, and unaffordable prices leave the
    /// session untouched; a successful purchase deducts the price
    /// exactly once and records ownership.
    pub fn buy_item(&mut self, item_id: &str) -> Result<&'static ShopItem> {
        let item = ShopItem::find(item_id)
            .ok_or_else(|| SessionError::UnknownShopItem(item_id.to_string()))?;
        let already_owned = self.purchased_items.contains(item.id);
        let user = self.user.as_mut().ok_or(SessionError::NotLoggedIn)?;
        if already_owned {
            return Err(SessionError::AlreadyOwned(item.id.to_string()));
        }
        if user.credits < item.price {
            return Err(SessionError::InsufficientCredits {
                needed: item.price,
                available: user.credits,
            });
        }
        user.credits -= item.price;
        self.purchased_items.insert(item.id.to_string());
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).single().unwrap()
    }

    fn logged_in(now: DateTime<Utc>) -> Session {
        let mut session = Session::new();
        session.login("b0rguii", now);
        session
    }

    // =========================================================================
    // Login economics
    // =========================================================================

    #[test]
    fn test_first_login_grants_starting_credits() {
        let mut session = Session::new();
        let user = session.login("b0rguii", noon(1));

        assert_eq!(user.id, USER_ID);
        assert_eq!(user.name, "b0rguii");
        assert_eq!(user.credits, STARTING_CREDITS);
        assert_eq!(user.streak, 0);
        assert_eq!(user.last_login, noon(1));
    }

    #[test]
    fn test_same_day_relogin_grants_nothing() {
        let mut session = logged_in(noon(1));
        let user = session.login("b0rguii", noon(1) + Duration::hours(5));
        assert_eq!(user.credits, STARTING_CREDITS);
    }

    #[test]
    fn test_new_day_login_grants_daily_bonus() {
        let mut session = logged_in(noon(1));
        let user = session.login("b0rguii", noon(2));
        assert_eq!(user.credits, STARTING_CREDITS + DAILY_LOGIN_BONUS);
    }

    #[test]
    fn test_midnight_crossing_within_a_day_still_counts_as_new_day() {
        let mut session = Session::new();
        session.login("b0rguii", Utc.with_ymd_and_hms(2025, 6, 1, 23, 0, 0).single().unwrap());

        // Two hours later by the clock, but a new calendar day.
        let user = session.login(
            "b0rguii",
            Utc.with_ymd_and_hms(2025, 6, 2, 1, 0, 0).single().unwrap(),
        );
        assert_eq!(user.credits, STARTING_CREDITS + DAILY_LOGIN_BONUS);
    }

    #[test]
    fn test_exactly_48_hours_is_not_inactivity() {
        let mut session = logged_in(noon(1));
        let user = session.login("b0rguii", noon(1) + Duration::hours(48));
        // Bonus applies (new day), fee does not (not strictly past 48h).
        assert_eq!(user.credits, STARTING_CREDITS + DAILY_LOGIN_BONUS);
    }

    #[test]
    fn test_inactivity_fee_applies_after_bonus() {
        let mut session = logged_in(noon(1));
        let user = session.login("b0rguii", noon(1) + Duration::hours(49));
        // +10 for the new day, then -20 for the absence.
        assert_eq!(
            user.credits,
            STARTING_CREDITS + DAILY_LOGIN_BONUS - INACTIVITY_FEE
        );
    }

    #[test]
    fn test_inactivity_fee_clamps_at_zero() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().credits = 5;

        let user = session.login("b0rguii", noon(1) + Duration::hours(49));
        // 5 + 10 = 15, then the 20-credit fee clamps to 0.
        assert_eq!(user.credits, 0);
    }

    #[test]
    fn test_relogin_keeps_streak() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().streak = 7;

        let user = session.login("b0rguii", noon(3));
        assert_eq!(user.streak, 7);
    }

    #[test]
    fn test_logout_clears_user_and_challenge_but_keeps_purchases() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().credits = 500;
        session.buy_item("streak-freeze").unwrap();
        session
            .start_challenge(Directive::Reading, 20, 30, noon(1))
            .unwrap();

        session.logout();

        assert!(!session.is_logged_in());
        assert!(session.active_challenge.is_none());
        assert!(session.owns("streak-freeze"));
    }

    // =========================================================================
    // Challenge lifecycle
    // =========================================================================

    #[test]
    fn test_start_challenge_sets_exact_deadline() {
        let mut session = logged_in(noon(1));
        let challenge = session
            .start_challenge(Directive::Study, 50, 30, noon(1))
            .unwrap();

        assert_eq!(challenge.directive, Directive::Study);
        assert_eq!(challenge.bet_amount, 50);
        assert_eq!(challenge.started_at, noon(1));
        assert_eq!(
            (challenge.expires_at - challenge.started_at).num_milliseconds(),
            30 * 60 * 1000
        );
        assert!(!challenge.challenge_id.is_empty());
    }

    #[test]
    fn test_start_requires_login() {
        let mut session = Session::new();
        let err = session
            .start_challenge(Directive::Study, 50, 30, noon(1))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotLoggedIn));
    }

    #[test]
    fn test_start_rejects_second_challenge() {
        let mut session = logged_in(noon(1));
        session
            .start_challenge(Directive::Study, 50, 30, noon(1))
            .unwrap();

        let err = session
            .start_challenge(Directive::Sport, 10, 30, noon(1))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::ChallengeAlreadyActive(Directive::Study)
        ));
        // The original challenge is untouched.
        assert_eq!(
            session.active_challenge.as_ref().unwrap().directive,
            Directive::Study
        );
    }

    #[test]
    fn test_start_validates_bet() {
        let mut session = logged_in(noon(1));

        let err = session
            .start_challenge(Directive::Study, MIN_BET - 1, 30, noon(1))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidBetAmount(9)));

        let err = session
            .start_challenge(Directive::Study, 101, 30, noon(1))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientCredits {
                needed: 101,
                available: 100
            }
        ));

        assert!(session.active_challenge.is_none());
    }

    #[test]
    fn test_start_validates_duration() {
        let mut session = logged_in(noon(1));

        for minutes in [0, MIN_DURATION_MINUTES - 1, MAX_DURATION_MINUTES + 1] {
            let err = session
                .start_challenge(Directive::Study, 50, minutes, noon(1))
                .unwrap_err();
            assert!(matches!(err, SessionError::InvalidDuration(_)));
        }

        session
            .start_challenge(Directive::Study, 50, MIN_DURATION_MINUTES, noon(1))
            .unwrap();
    }

    #[test]
    fn test_complete_pays_out_and_extends_streak() {
        let mut session = logged_in(noon(1));
        session
            .start_challenge(Directive::Coding, 40, 30, noon(1))
            .unwrap();

        let outcome = session.complete_challenge().unwrap();

        assert_eq!(outcome.resolution, Resolution::Completed);
        assert_eq!(outcome.directive, Directive::Coding);
        assert_eq!(outcome.bet_amount, 40);
        assert_eq!(outcome.credits, 140);
        assert_eq!(outcome.streak, 1);
        assert_eq!(session.credits(), 140);
        assert!(session.active_challenge.is_none());
    }

    #[test]
    fn test_fail_seizes_stake_and_resets_streak() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().streak = 4;
        session
            .start_challenge(Directive::Coding, 40, 30, noon(1))
            .unwrap();

        let outcome = session.fail_challenge().unwrap();

        assert_eq!(outcome.resolution, Resolution::Failed);
        assert_eq!(outcome.credits, 60);
        assert_eq!(outcome.streak, 0);
        assert_eq!(session.streak(), 0);
    }

    #[test]
    fn test_expiry_is_economically_a_failure() {
        let mut session = logged_in(noon(1));
        session
            .start_challenge(Directive::WakeUp, 100, 30, noon(1))
            .unwrap();

        let outcome = session.expire_challenge().unwrap();

        assert_eq!(outcome.resolution, Resolution::Expired);
        assert_eq!(outcome.credits, 0);
        assert_eq!(outcome.streak, 0);
    }

    #[test]
    fn test_seizure_clamps_at_zero() {
        let mut session = logged_in(noon(1));
        session
            .start_challenge(Directive::Study, 80, 30, noon(1))
            .unwrap();
        // Balance drops below the stake before settlement.
        session.remove_credits(50).unwrap();

        let outcome = session.fail_challenge().unwrap();
        assert_eq!(outcome.credits, 0);
    }

    #[test]
    fn test_resolutions_are_noops_when_idle() {
        let mut session = logged_in(noon(1));

        assert!(session.complete_challenge().is_none());
        assert!(session.fail_challenge().is_none());
        assert!(session.expire_challenge().is_none());
        assert_eq!(session.credits(), STARTING_CREDITS);
    }

    #[test]
    fn test_first_resolution_wins() {
        let mut session = logged_in(noon(1));
        session
            .start_challenge(Directive::Study, 30, 30, noon(1))
            .unwrap();

        assert!(session.fail_challenge().is_some());
        assert!(session.complete_challenge().is_none());
        assert_eq!(session.credits(), 70);
        assert_eq!(session.streak(), 0);

        session
            .start_challenge(Directive::Study, 30, 30, noon(1))
            .unwrap();
        assert!(session.complete_challenge().is_some());
        assert!(session.fail_challenge().is_none());
        assert_eq!(session.credits(), 100);
        assert_eq!(session.streak(), 1);
    }

    // =========================================================================
    // Shop and ad reward
    // =========================================================================

    #[test]
    fn test_buy_deducts_exactly_once() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().credits = 500;

        let item = session.buy_item("streak-freeze").unwrap();
        assert_eq!(item.price, 200);
        assert_eq!(session.credits(), 300);
        assert!(session.owns("streak-freeze"));
    }

    #[test]
    fn test_repeat_purchase_does_not_double_charge() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().credits = 500;
        session.buy_item("streak-freeze").unwrap();

        let err = session.buy_item("streak-freeze").unwrap_err();
        assert!(matches!(err, SessionError::AlreadyOwned(_)));
        assert_eq!(session.credits(), 300);
    }

    #[test]
    fn test_unaffordable_purchase_changes_nothing() {
        let mut session = logged_in(noon(1));

        let err = session.buy_item("red-theme").unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientCredits {
                needed: 500,
                available: 100
            }
        ));
        assert_eq!(session.credits(), STARTING_CREDITS);
        assert!(!session.owns("red-theme"));
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let mut session = logged_in(noon(1));
        let err = session.buy_item("jetpack").unwrap_err();
        assert!(matches!(err, SessionError::UnknownShopItem(_)));
    }

    #[test]
    fn test_ad_reward_doubles_with_perk() {
        let mut session = logged_in(noon(1));

        assert_eq!(session.claim_ad_reward().unwrap(), AD_REWARD);
        assert_eq!(session.credits(), 105);

        session.user.as_mut().unwrap().credits = 300;
        session.buy_item(DOUBLE_AD_ITEM).unwrap();
        assert_eq!(session.credits(), 0);

        assert_eq!(session.claim_ad_reward().unwrap(), BOOSTED_AD_REWARD);
        assert_eq!(session.credits(), BOOSTED_AD_REWARD);
    }

    // =========================================================================
    // Persisted document shape
    // =========================================================================

    #[test]
    fn test_session_document_round_trips() {
        let mut session = logged_in(noon(1));
        session.user.as_mut().unwrap().credits = 500;
        session.buy_item("double-ad").unwrap();
        session
            .start_challenge(Directive::HealthyEating, 50, 60, noon(1))
            .unwrap();

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("purchasedItems"));
        assert!(json.contains("activeChallenge"));
        assert!(json.contains("lastLogin"));
        assert!(json.contains("Healthy Eating"));

        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_empty_document_deserializes_to_default() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert_eq!(session, Session::new());
    }
}
