//! Session controller.
//!
//! Owns the session state machine, its persistence, the evidence judge,
//! and the countdown task, and keeps them consistent:
//!
//! ```text
//!   SessionController
//!     ├── RwLock<Session>      the rules (login, challenge, shop)
//!     ├── dyn StateStore       persisted after every mutation
//!     ├── JudgeService         evidence verdicts
//!     └── Countdown            expiry of the active challenge
//! ```
//!
//! A challenge is settled by exactly one of three racers: an accepted
//! verdict, a rejected verdict, or the countdown. Whichever settles
//! first wins; the session's idle no-op settlement makes the later
//! racers harmless, and a verdict that arrives after the challenge was
//! already settled is suppressed rather than surfaced.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use b0rguii_judge::{EvidenceImage, JudgeService, Verdict, VerificationRequest};
use directives::Directive;

use crate::countdown::Countdown;
use crate::session::Session;
use crate::shop::ShopItem;
use crate::store::StateStore;
use crate::types::{ActiveChallenge, Resolution, Result, SessionError, User};

/// Top-level owner of a single unit's session.
///
/// Cheap to clone; clones share the same session, store, judge, and
/// countdown.
#[derive(Clone)]
pub struct SessionController {
    /// Session state machine
    session: Arc<RwLock<Session>>,
    /// Persistence backend
    store: Arc<dyn StateStore>,
    /// Evidence judge
    judge: Arc<JudgeService>,
    /// Countdown for the active challenge
    countdown: Arc<Mutex<Option<Countdown>>>,
    /// Single-flight guard for evidence submission
    verify_gate: Arc<Mutex<()>>,
}

impl SessionController {
    /// Create a controller over an empty session.
    pub fn new(store: Arc<dyn StateStore>, judge: JudgeService) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            store,
            judge: Arc::new(judge),
            countdown: Arc::new(Mutex::new(None)),
            verify_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create a controller from persisted state.
    ///
    /// A persisted challenge whose deadline already passed while the
    /// process was down is settled as expired here, before anything can
    /// observe it as active; a still-running challenge gets its
    /// countdown re-armed.
    pub async fn restore(store: Arc<dyn StateStore>, judge: JudgeService) -> Result<Self> {
        let mut session = store.load().await?.unwrap_or_default();

        let now = Utc::now();
        let already_expired = session
            .active_challenge
            .as_ref()
            .map(|c| c.is_expired(now))
            .unwrap_or(false);
        if already_expired {
            if let Some(outcome) = session.expire_challenge() {
                warn!(
                    directive = %outcome.directive,
                    bet = outcome.bet_amount,
                    credits = outcome.credits,
                    "Challenge expired while offline, stake seized"
                );
            }
            store.save(&session).await?;
        }

        let controller = Self {
            session: Arc::new(RwLock::new(session)),
            store,
            judge: Arc::new(judge),
            countdown: Arc::new(Mutex::new(None)),
            verify_gate: Arc::new(Mutex::new(())),
        };

        let live = { controller.session.read().await.active_challenge.clone() };
        if let Some(challenge) = live {
            info!(
                directive = %challenge.directive,
                expires_at = %challenge.expires_at,
                "Restored a running challenge, countdown re-armed"
            );
            controller.arm_countdown(&challenge).await;
        }

        Ok(controller)
    }

    /// Log the unit in, returning its post-login state.
    pub async fn login(&self, name: impl Into<String>) -> Result<User> {
        let user = {
            let mut session = self.session.write().await;
            session.login(name, Utc::now()).clone()
        };

        info!(
            name = %user.name,
            credits = user.credits,
            streak = user.streak,
            "Unit logged in"
        );

        self.persist().await?;
        Ok(user)
    }

    /// Log the unit out. Purchases survive; a running challenge and its
    /// countdown do not.
    pub async fn logout(&self) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.logout();
        }
        self.disarm_countdown().await;

        info!("Unit logged out");
        self.persist().await
    }

    /// Grant the ad-watch reward, returning how much was granted.
    pub async fn claim_ad_reward(&self) -> Result<u64> {
        let reward = {
            let mut session = self.session.write().await;
            session.claim_ad_reward()?
        };

        info!(reward = reward, "Ad reward claimed");

        self.persist().await?;
        Ok(reward)
    }

    /// Buy a shop item.
    pub async fn buy_item(&self, item_id: &str) -> Result<&'static ShopItem> {
        let item = {
            let mut session = self.session.write().await;
            session.buy_item(item_id)?
        };

        info!(item = item.id, price = item.price, "Item purchased");

        self.persist().await?;
        Ok(item)
    }

    /// Lock in a challenge and arm its countdown.
    pub async fn start_challenge(
        &self,
        directive: Directive,
        bet_amount: u64,
        duration_minutes: u32,
    ) -> Result<ActiveChallenge> {
        let challenge = {
            let mut session = self.session.write().await;
            session
                .start_challenge(directive, bet_amount, duration_minutes, Utc::now())?
                .clone()
        };

        info!(
            directive = %challenge.directive,
            bet = challenge.bet_amount,
            expires_at = %challenge.expires_at,
            "Challenge locked in"
        );

        self.persist().await?;
        self.arm_countdown(&challenge).await;
        Ok(challenge)
    }

    /// Submit evidence for the active challenge and settle it by the
    /// verdict.
    ///
    /// Only one submission can be in flight at a time; a second call
    /// while the judge deliberates returns
    /// [`SessionError::VerificationInFlight`]. If the challenge was
    /// settled while the judge deliberated (expiry, logout), the
    /// verdict lands as a no-op and `Ok(None)` is returned so the stale
    /// message is never surfaced.
    pub async fn submit_evidence(
        &self,
        image: EvidenceImage,
        captured_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Verdict>> {
        let _gate = self
            .verify_gate
            .try_lock()
            .map_err(|_| SessionError::VerificationInFlight)?;

        let challenge = {
            let session = self.session.read().await;
            session
                .active_challenge
                .clone()
                .ok_or(SessionError::NoActiveChallenge)?
        };

        let mut request = VerificationRequest::new(challenge.directive, image)
            .with_challenge_started_at(challenge.started_at);
        if let Some(instant) = captured_at {
            request = request.with_captured_at(instant);
        }

        // The judge call is the slow part; the session stays unlocked
        // so the countdown can settle an expiry meanwhile.
        let verdict = self.judge.verify(request).await;

        let outcome = {
            let mut session = self.session.write().await;
            let still_active = session
                .active_challenge
                .as_ref()
                .map(|c| c.challenge_id == challenge.challenge_id)
                .unwrap_or(false);
            if !still_active {
                debug!(
                    challenge_id = %challenge.challenge_id,
                    "Verdict arrived after the challenge was settled, suppressed"
                );
                return Ok(None);
            }
            if verdict.success {
                session.complete_challenge()
            } else {
                session.fail_challenge()
            }
        };

        if let Some(outcome) = &outcome {
            match outcome.resolution {
                Resolution::Completed => info!(
                    directive = %outcome.directive,
                    bet = outcome.bet_amount,
                    credits = outcome.credits,
                    streak = outcome.streak,
                    "Challenge completed, stake paid out"
                ),
                _ => info!(
                    directive = %outcome.directive,
                    bet = outcome.bet_amount,
                    credits = outcome.credits,
                    "Challenge failed, stake seized"
                ),
            }
        }

        self.disarm_countdown().await;
        self.persist().await?;
        Ok(Some(verdict))
    }

    /// Snapshot of the whole session.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// The logged-in unit, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    /// The running challenge, if any.
    pub async fn active_challenge(&self) -> Option<ActiveChallenge> {
        self.session.read().await.active_challenge.clone()
    }

    /// Ids of all purchased items.
    pub async fn purchased_items(&self) -> BTreeSet<String> {
        self.session.read().await.purchased_items.clone()
    }

    /// The judge, for inspecting verdict history.
    pub fn judge(&self) -> &JudgeService {
        &self.judge
    }

    /// Stop the countdown task. State stays persisted.
    pub async fn shutdown(&self) {
        self.disarm_countdown().await;
        debug!("Session controller shut down");
    }

    /// Spawn the countdown whose expiry settles `challenge`, replacing
    /// any previous one.
    async fn arm_countdown(&self, challenge: &ActiveChallenge) {
        let session = Arc::clone(&self.session);
        let store = Arc::clone(&self.store);
        let challenge_id = challenge.challenge_id.clone();

        let countdown = Countdown::spawn(challenge.expires_at, move || async move {
            Self::expire(session, store, challenge_id).await;
        });

        let mut slot = self.countdown.lock().await;
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        *slot = Some(countdown);
    }

    /// Cancel and drop the current countdown, if any.
    async fn disarm_countdown(&self) {
        let mut slot = self.countdown.lock().await;
        if let Some(countdown) = slot.take() {
            countdown.cancel();
        }
    }

    /// Expiry path, run inside the countdown task.
    ///
    /// Settles the named challenge only if it is still the active one;
    /// a challenge settled by a verdict in the meantime is left alone.
    /// The finished countdown's handle stays in its slot — it is
    /// replaced by the next challenge's countdown — because dropping it
    /// here would abort the very task this function runs on.
    async fn expire(
        session: Arc<RwLock<Session>>,
        store: Arc<dyn StateStore>,
        challenge_id: String,
    ) {
        let outcome = {
            let mut session = session.write().await;
            let still_active = session
                .active_challenge
                .as_ref()
                .map(|c| c.challenge_id == challenge_id)
                .unwrap_or(false);
            if !still_active {
                debug!(
                    challenge_id = %challenge_id,
                    "Expiry tick for a challenge that is no longer active"
                );
                return;
            }
            session.expire_challenge()
        };

        let Some(outcome) = outcome else {
            return;
        };

        warn!(
            directive = %outcome.directive,
            bet = outcome.bet_amount,
            credits = outcome.credits,
            "Challenge expired, stake seized"
        );

        let snapshot = { session.read().await.clone() };
        if let Err(e) = store.save(&snapshot).await {
            warn!(error = %e, "Failed to persist session after expiry");
        }
    }

    async fn persist(&self) -> Result<()> {
        let snapshot = { self.session.read().await.clone() };
        self.store.save(&snapshot).await?;
        Ok(())
    }
}
