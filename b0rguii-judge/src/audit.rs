//! Judgment log for verification calls.
//!
//! Keeps a bounded in-memory trail of every verdict the service issued,
//! newest first, for inspection and debugging.

use chrono::{DateTime, Utc};
use directives::Directive;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::verdict::Verdict;

/// Maximum entries in the judgment log before pruning.
const MAX_LOG_ENTRIES: usize = 1_000;

/// One judged evidence submission.
#[derive(Debug, Clone)]
pub struct JudgmentRecord {
    /// Unique entry ID
    pub entry_id: String,
    /// Request ID this verdict answers
    pub request_id: String,
    /// Directive under judgment
    pub directive: Directive,
    /// Backend that produced the verdict
    pub backend_id: String,
    /// Whether the stand-in judged instead of the remote model
    pub stand_in: bool,
    /// The verdict issued
    pub verdict: Verdict,
    /// When the request was made
    pub requested_at: DateTime<Utc>,
    /// Processing duration in ms
    pub duration_ms: u64,
}

/// Bounded log of issued verdicts (newest first).
pub struct VerificationLog {
    entries: Arc<RwLock<VecDeque<JudgmentRecord>>>,
    max_entries: usize,
}

impl VerificationLog {
    /// Create a new log with the default capacity.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_entries: MAX_LOG_ENTRIES,
        }
    }

    /// Create with custom max entries.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_entries,
        }
    }

    /// Record a judged submission.
    pub async fn record(&self, record: JudgmentRecord) {
        let mut entries = self.entries.write().await;
        entries.push_front(record);

        // Prune if over limit
        while entries.len() > self.max_entries {
            entries.pop_back();
        }
    }

    /// Get recent entries.
    pub async fn recent(&self, limit: usize) -> Vec<JudgmentRecord> {
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    /// Get entry by request ID.
    pub async fn get_by_request(&self, request_id: &str) -> Option<JudgmentRecord> {
        let entries = self.entries.read().await;
        entries.iter().find(|e| e.request_id == request_id).cloned()
    }

    /// Get statistics.
    pub async fn stats(&self) -> JudgmentStats {
        let entries = self.entries.read().await;

        let total = entries.len();
        let passed = entries.iter().filter(|e| e.verdict.success).count();
        let stand_in = entries.iter().filter(|e| e.stand_in).count();

        JudgmentStats {
            total,
            passed,
            failed: total - passed,
            stand_in,
        }
    }

    /// Clear the log.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Get count.
    pub async fn count(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }
}

impl Default for VerificationLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics from the judgment log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgmentStats {
    /// Total verdicts logged
    pub total: usize,
    /// Passing verdicts
    pub passed: usize,
    /// Failing verdicts
    pub failed: usize,
    /// Verdicts issued by the stand-in
    pub stand_in: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(request_id: &str, success: bool) -> JudgmentRecord {
        JudgmentRecord {
            entry_id: uuid::Uuid::new_v4().to_string(),
            request_id: request_id.to_string(),
            directive: Directive::Study,
            backend_id: "mock-judge".to_string(),
            stand_in: false,
            verdict: if success {
                Verdict::pass("ok")
            } else {
                Verdict::fail("no")
            },
            requested_at: Utc::now(),
            duration_ms: 5,
        }
    }

    #[tokio::test]
    async fn records_newest_first() {
        let log = VerificationLog::new();

        log.record(record("first", true)).await;
        log.record(record("second", false)).await;

        let recent = log.recent(10).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].request_id, "second");
        assert_eq!(recent[1].request_id, "first");

        let found = log.get_by_request("first").await.unwrap();
        assert!(found.verdict.success);
    }

    #[tokio::test]
    async fn prunes_oldest_beyond_capacity() {
        let log = VerificationLog::with_max_entries(3);

        for i in 0..5 {
            log.record(record(&format!("req-{}", i), true)).await;
        }

        assert_eq!(log.count().await, 3);
        assert!(log.get_by_request("req-0").await.is_none());
        assert!(log.get_by_request("req-4").await.is_some());
    }

    #[tokio::test]
    async fn stats_split_by_outcome() {
        let log = VerificationLog::new();

        log.record(record("a", true)).await;
        log.record(record("b", true)).await;
        log.record(record("c", false)).await;

        let stats = log.stats().await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.stand_in, 0);
    }
}
