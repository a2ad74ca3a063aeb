//! Challenge lifecycle integration tests
//!
//! Exercises the full controller stack including:
//! - Verdict-driven settlement (accepted and rejected evidence)
//! - The race between verdicts, expiry, and logout
//! - Single-flight evidence submission
//! - Restore behavior for expired and still-running persisted challenges
//! - Persistence through the JSON file store

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tempfile::TempDir;

use b0rguii_judge::{EvidenceImage, JudgeBackend, JudgeService, MockJudge};
use b0rguii_session::{
    ActiveChallenge, JsonFileStore, MemoryStore, Session, SessionController, SessionError,
    StateStore,
};
use directives::Directive;

fn mock_judge(success: bool) -> JudgeService {
    let message = if success { "Acceptable." } else { "Pathetic." };
    let mock = MockJudge::new("mock-judge").with_verdict(success, message);
    JudgeService::new(Some(Arc::new(mock) as Arc<dyn JudgeBackend>))
}

fn slow_judge(success: bool, latency: Duration) -> JudgeService {
    let mock = MockJudge::new("mock-judge")
        .with_verdict(success, "Deliberated at length.")
        .with_latency(latency);
    JudgeService::new(Some(Arc::new(mock) as Arc<dyn JudgeBackend>))
}

/// A session document with a hand-crafted challenge deadline, the way a
/// store would hand it back after a process restart.
fn persisted_session(bet: u64, expires_in_ms: i64) -> Session {
    let now = Utc::now();
    let mut session = Session::new();
    session.login("b0rguii", now);
    session.active_challenge = Some(ActiveChallenge {
        challenge_id: "challenge-under-test".to_string(),
        directive: Directive::Sport,
        bet_amount: bet,
        started_at: now - ChronoDuration::minutes(30),
        expires_at: now + ChronoDuration::milliseconds(expires_in_ms),
    });
    session
}

// =============================================================================
// Verdict-driven settlement
// =============================================================================

#[tokio::test]
async fn test_accepted_evidence_completes_the_challenge() {
    let store = Arc::new(MemoryStore::new());
    let controller = SessionController::new(store.clone(), mock_judge(true));

    controller.login("b0rguii").await.unwrap();
    controller
        .start_challenge(Directive::Study, 50, 30)
        .await
        .unwrap();

    let verdict = controller
        .submit_evidence(EvidenceImage::jpeg(vec![0xFF, 0xD8]), None)
        .await
        .unwrap()
        .expect("verdict should surface");

    assert!(verdict.success);
    assert_eq!(verdict.message, "Acceptable.");

    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_challenge.is_none());
    assert_eq!(snapshot.user.as_ref().unwrap().credits, 150);
    assert_eq!(snapshot.user.as_ref().unwrap().streak, 1);

    // The settled state is what got persisted.
    let persisted = store.load().await.unwrap().unwrap();
    assert_eq!(persisted.user.unwrap().credits, 150);

    // And the judgment left its audit trail.
    let stats = controller.judge().judgment_stats().await;
    assert_eq!(stats.total, 1);
    assert_eq!(stats.passed, 1);
}

#[tokio::test]
async fn test_rejected_evidence_fails_the_challenge() {
    let store = Arc::new(MemoryStore::new());
    let controller = SessionController::new(store, mock_judge(false));

    controller.login("b0rguii").await.unwrap();
    controller
        .start_challenge(Directive::Dishes, 50, 30)
        .await
        .unwrap();

    let verdict = controller
        .submit_evidence(EvidenceImage::jpeg(vec![0xFF, 0xD8]), None)
        .await
        .unwrap()
        .expect("verdict should surface");

    assert!(!verdict.success);

    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_challenge.is_none());
    assert_eq!(snapshot.user.as_ref().unwrap().credits, 50);
    assert_eq!(snapshot.user.as_ref().unwrap().streak, 0);
}

#[tokio::test]
async fn test_second_challenge_rejected_while_one_is_active() {
    let controller = SessionController::new(Arc::new(MemoryStore::new()), mock_judge(true));
    controller.login("b0rguii").await.unwrap();

    let first = controller
        .start_challenge(Directive::Reading, 20, 45)
        .await
        .unwrap();

    let err = controller
        .start_challenge(Directive::Sport, 20, 45)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::ChallengeAlreadyActive(_)));

    let live = controller.active_challenge().await.unwrap();
    assert_eq!(live.challenge_id, first.challenge_id);

    controller.shutdown().await;
}

// =============================================================================
// Races: single flight, logout, expiry
// =============================================================================

#[tokio::test]
async fn test_second_submission_while_judging_is_refused() {
    let controller = SessionController::new(
        Arc::new(MemoryStore::new()),
        slow_judge(true, Duration::from_millis(300)),
    );
    controller.login("b0rguii").await.unwrap();
    controller
        .start_challenge(Directive::Hydrate, 10, 15)
        .await
        .unwrap();

    let racing = controller.clone();
    let first = tokio::spawn(async move {
        racing
            .submit_evidence(EvidenceImage::jpeg(vec![1]), None)
            .await
    });

    // Give the first submission time to reach the judge.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = controller
        .submit_evidence(EvidenceImage::jpeg(vec![2]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::VerificationInFlight));

    let verdict = first
        .await
        .unwrap()
        .unwrap()
        .expect("first submission verdict");
    assert!(verdict.success);
}

#[tokio::test]
async fn test_verdict_after_logout_is_suppressed() {
    let controller = SessionController::new(
        Arc::new(MemoryStore::new()),
        slow_judge(true, Duration::from_millis(300)),
    );
    controller.login("b0rguii").await.unwrap();
    controller
        .start_challenge(Directive::Socialize, 30, 20)
        .await
        .unwrap();

    let submitting = controller.clone();
    let pending = tokio::spawn(async move {
        submitting
            .submit_evidence(EvidenceImage::jpeg(vec![1]), None)
            .await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.logout().await.unwrap();

    // The challenge was gone by the time the verdict landed.
    let result = pending.await.unwrap().unwrap();
    assert!(result.is_none());

    let snapshot = controller.snapshot().await;
    assert!(snapshot.user.is_none());
    assert!(snapshot.active_challenge.is_none());
}

#[tokio::test]
async fn test_expiry_during_judging_wins_and_verdict_is_suppressed() {
    let store = Arc::new(MemoryStore::new());
    store.save(&persisted_session(30, 150)).await.unwrap();

    let controller = SessionController::restore(
        store.clone(),
        slow_judge(true, Duration::from_millis(500)),
    )
    .await
    .unwrap();

    // Submitted while active, but the deadline lands before the verdict.
    let result = controller
        .submit_evidence(EvidenceImage::jpeg(vec![1]), None)
        .await
        .unwrap();
    assert!(result.is_none());

    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_challenge.is_none());
    // The stake was seized exactly once, by the expiry.
    assert_eq!(snapshot.user.as_ref().unwrap().credits, 70);
    assert_eq!(snapshot.user.as_ref().unwrap().streak, 0);

    let persisted = store.load().await.unwrap().unwrap();
    assert_eq!(persisted.user.unwrap().credits, 70);
}

// =============================================================================
// Restore behavior
// =============================================================================

#[tokio::test]
async fn test_challenge_expired_while_offline_settles_on_restore() {
    let store = Arc::new(MemoryStore::new());
    store.save(&persisted_session(30, -5_000)).await.unwrap();

    let controller = SessionController::restore(store.clone(), mock_judge(true))
        .await
        .unwrap();

    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_challenge.is_none());
    assert_eq!(snapshot.user.as_ref().unwrap().credits, 70);
    assert_eq!(snapshot.user.as_ref().unwrap().streak, 0);

    // Settlement was written back immediately.
    let persisted = store.load().await.unwrap().unwrap();
    assert!(persisted.active_challenge.is_none());
    assert_eq!(persisted.user.unwrap().credits, 70);
}

#[tokio::test]
async fn test_restore_rearms_countdown_for_running_challenge() {
    let store = Arc::new(MemoryStore::new());
    store.save(&persisted_session(40, 150)).await.unwrap();

    let controller = SessionController::restore(store.clone(), mock_judge(true))
        .await
        .unwrap();
    assert!(controller.active_challenge().await.is_some());

    tokio::time::sleep(Duration::from_millis(600)).await;

    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_challenge.is_none());
    assert_eq!(snapshot.user.as_ref().unwrap().credits, 60);

    let persisted = store.load().await.unwrap().unwrap();
    assert!(persisted.active_challenge.is_none());
}

#[tokio::test]
async fn test_shutdown_stops_the_countdown() {
    let store = Arc::new(MemoryStore::new());
    store.save(&persisted_session(40, 150)).await.unwrap();

    let controller = SessionController::restore(store, mock_judge(true))
        .await
        .unwrap();
    controller.shutdown().await;

    tokio::time::sleep(Duration::from_millis(600)).await;

    // Nothing settled the challenge after shutdown.
    let snapshot = controller.snapshot().await;
    assert!(snapshot.active_challenge.is_some());
    assert_eq!(snapshot.user.as_ref().unwrap().credits, 100);
}

// =============================================================================
// File-backed persistence
// =============================================================================

#[tokio::test]
async fn test_session_survives_a_controller_restart_on_disk() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()).await.unwrap());

    let controller = SessionController::new(store.clone(), mock_judge(true));
    controller.login("b0rguii").await.unwrap();
    let challenge = controller
        .start_challenge(Directive::Outdoors, 25, 90)
        .await
        .unwrap();
    controller.shutdown().await;
    drop(controller);

    let restored = SessionController::restore(store, mock_judge(true))
        .await
        .unwrap();
    let snapshot = restored.snapshot().await;
    assert_eq!(snapshot.user.as_ref().unwrap().name, "b0rguii");

    let live = snapshot.active_challenge.unwrap();
    assert_eq!(live.challenge_id, challenge.challenge_id);
    assert_eq!(live.expires_at, challenge.expires_at);

    restored.shutdown().await;
}
