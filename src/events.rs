//! Structured events emitted by the poll loop.
//!
//! The runner pushes one [`RunnerEvent`] per observable step over an
//! unbounded channel when an observer is attached. Fetch errors that the
//! fail-open policy suppresses are surfaced here and in the cycle record,
//! so tests and tooling can see them without scraping log output.
//!
//! # Event Lifecycle
//!
//! A normal cycle flows:
//! ```text
//! CycleStarted → ProfileLoaded → TaskListFetched → (TaskCompleted | TaskSkipped | TaskFailed)*
//!              → PartnerListFetched → (PartnerTaskCompleted | PartnerTaskFailed)* → CycleFinished
//! ```
//!
//! A fetch failure replaces the corresponding `*Fetched` event with a
//! `*FetchFailed` event and the cycle continues with an empty list.

use serde::{Deserialize, Serialize};

/// Why a task was skipped without a completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Telegram account linking cannot be completed by this client.
    ManualAuth,
    /// The action kind has no completion endpoint.
    NoCompletionEndpoint,
}

/// One observable step of a poll cycle.
///
/// Events arrive in temporal order. Failure events carry the stable error
/// code from [`crate::api::error::error_codes`] alongside the message.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    /// A poll cycle began. First event in every cycle.
    CycleStarted {
        /// 1-based cycle number since the runner started.
        cycle: u64,
    },

    /// The user profile was fetched and the identity line logged.
    ProfileLoaded {
        /// The identity summary line.
        summary: String,
    },

    /// Pending tasks were fetched.
    TaskListFetched {
        /// Number of tasks after completed-task filtering.
        count: usize,
    },

    /// The task fetch failed; the cycle continues with an empty list.
    TaskFetchFailed {
        /// Stable error code.
        code: &'static str,
        /// Human-readable error description.
        message: String,
    },

    /// One task completion was submitted successfully.
    TaskCompleted {
        /// Gateway task id.
        task_id: String,
        /// Wire name of the action.
        action: String,
    },

    /// One task was skipped without a completion attempt.
    TaskSkipped {
        /// Gateway task id.
        task_id: String,
        /// Wire name of the action.
        action: String,
        /// Why it was skipped.
        reason: SkipReason,
    },

    /// One task completion failed; the cycle continues.
    TaskFailed {
        /// Gateway task id.
        task_id: String,
        /// Wire name of the action.
        action: String,
        /// Stable error code.
        code: &'static str,
        /// Human-readable error description.
        message: String,
    },

    /// Incomplete partner tasks were fetched.
    PartnerListFetched {
        /// Number of incomplete partner tasks across all partners.
        count: usize,
    },

    /// The partner fetch failed; the cycle continues with an empty list.
    PartnerFetchFailed {
        /// Stable error code.
        code: &'static str,
        /// Human-readable error description.
        message: String,
    },

    /// One partner activity was submitted successfully.
    PartnerTaskCompleted {
        /// Gateway partner id.
        partner_id: String,
        /// Partner-defined task type.
        task_type: String,
    },

    /// One partner activity failed; the cycle continues.
    PartnerTaskFailed {
        /// Gateway partner id.
        partner_id: String,
        /// Partner-defined task type.
        task_type: String,
        /// Stable error code.
        code: &'static str,
        /// Human-readable error description.
        message: String,
    },

    /// The cycle finished. Last event in every cycle.
    CycleFinished {
        /// Full record of the finished cycle.
        record: CycleRecord,
    },
}

/// Summary of one completed poll cycle.
///
/// The runner keeps a bounded history of these; the same record rides on
/// [`RunnerEvent::CycleFinished`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// 1-based cycle number since the runner started.
    pub cycle: u64,
    /// Cycle start, seconds since the Unix epoch.
    pub started_at: u64,
    /// Cycle end, seconds since the Unix epoch.
    pub finished_at: u64,
    /// Pending tasks received (after completed-task filtering).
    pub tasks_seen: usize,
    /// Tasks whose completion was submitted successfully.
    pub tasks_completed: usize,
    /// Tasks skipped without a completion attempt.
    pub tasks_skipped: usize,
    /// Tasks whose completion failed.
    pub tasks_failed: usize,
    /// Incomplete partner tasks received.
    pub partner_tasks_seen: usize,
    /// Partner activities submitted successfully.
    pub partner_tasks_completed: usize,
    /// Partner activities that failed.
    pub partner_tasks_failed: usize,
    /// Fetch errors suppressed by the fail-open policy, in display form.
    pub fetch_errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn skip_reason_serializes_snake_case() {
        let json = serde_json::to_string(&SkipReason::NoCompletionEndpoint).unwrap();
        assert_eq!(json, "\"no_completion_endpoint\"");
        let json = serde_json::to_string(&SkipReason::ManualAuth).unwrap();
        assert_eq!(json, "\"manual_auth\"");
    }

    #[test]
    fn cycle_record_round_trips_through_serde() {
        let record = CycleRecord {
            cycle: 3,
            started_at: 1_700_000_000,
            finished_at: 1_700_000_040,
            tasks_seen: 5,
            tasks_completed: 3,
            tasks_skipped: 1,
            tasks_failed: 1,
            partner_tasks_seen: 2,
            partner_tasks_completed: 2,
            partner_tasks_failed: 0,
            fetch_errors: vec!["[HTTP_STATUS] gateway returned HTTP 500".to_owned()],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: CycleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn events_are_comparable_for_test_assertions() {
        let a = RunnerEvent::TaskCompleted {
            task_id: "t1".to_owned(),
            action: "like".to_owned(),
        };
        let b = RunnerEvent::TaskCompleted {
            task_id: "t1".to_owned(),
            action: "like".to_owned(),
        };
        assert_eq!(a, b);
    }
}
