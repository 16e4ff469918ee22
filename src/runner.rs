//! Poll loop over the quest gateway.
//!
//! One cycle: profile → task list → completions → partner list →
//! completions, with a pacing pause between submissions. [`QuestRunner::run`]
//! repeats cycles forever with a cooldown sleep in between. Fetch and
//! execution failures are absorbed (logged, emitted as events, counted in
//! the cycle record); only a failed profile fetch is fatal and ends the
//! loop.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::{ApiError, QuestClient, TaskAction};
use crate::config::RunnerConfig;
use crate::events::{CycleRecord, RunnerEvent, SkipReason};

/// Errors that end the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The profile fetch failed. Identity is a cycle precondition, so this
    /// stops the runner instead of being absorbed.
    #[error("cannot fetch user profile: {0}")]
    ProfileUnavailable(#[source] ApiError),
}

/// Forever-polling task runner.
pub struct QuestRunner {
    /// Gateway client all calls go through.
    client: QuestClient,
    /// Pacing, cooldown, and history settings.
    config: RunnerConfig,
    /// Channel for observing runner events (optional).
    event_tx: Option<mpsc::UnboundedSender<RunnerEvent>>,
    /// Recent cycle records, oldest first.
    history: Vec<CycleRecord>,
    /// Cycles started since construction.
    cycles: u64,
}

impl QuestRunner {
    /// Create a runner over the given client and settings.
    pub fn new(client: QuestClient, config: RunnerConfig) -> Self {
        Self {
            client,
            config,
            event_tx: None,
            history: Vec::new(),
            cycles: 0,
        }
    }

    /// Attach an event observer.
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<RunnerEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Completed cycle records, oldest first, bounded by the configured
    /// history limit.
    pub fn history(&self) -> &[CycleRecord] {
        &self.history
    }

    fn emit(&self, event: RunnerEvent) {
        if let Some(tx) = &self.event_tx {
            // Events are advisory; a departed observer is not an error.
            let _ = tx.send(event);
        }
    }

    /// Run poll cycles forever, sleeping the cooldown between them.
    ///
    /// Returns only when a cycle reports the fatal profile failure.
    pub async fn run(mut self) -> Result<(), RunnerError> {
        info!(
            cooldown_secs = self.config.cooldown_secs,
            pacing_ms = self.config.task_pacing_ms,
            "quest runner started"
        );
        loop {
            self.run_cycle().await?;
            info!(
                secs = self.config.cooldown_secs,
                "cooling down before next cycle"
            );
            tokio::time::sleep(std::time::Duration::from_secs(self.config.cooldown_secs)).await;
        }
    }

    /// Execute a single poll cycle.
    ///
    /// Directly callable so tests drive cycles without sleeping through
    /// the cooldown. Fails only when the profile fetch fails; everything
    /// else is absorbed into the returned record.
    pub async fn run_cycle(&mut self) -> Result<CycleRecord, RunnerError> {
        self.cycles += 1;
        let mut record = CycleRecord {
            cycle: self.cycles,
            started_at: now_epoch_secs(),
            ..CycleRecord::default()
        };
        self.emit(RunnerEvent::CycleStarted { cycle: self.cycles });

        let profile = match self.client.profile().await {
            Ok(profile) => profile,
            Err(e) => {
                error!("cannot fetch user profile, stopping: {e}");
                return Err(RunnerError::ProfileUnavailable(e));
            }
        };
        let summary = profile.summary();
        info!("{summary}");
        self.emit(RunnerEvent::ProfileLoaded { summary });

        let tasks = match self.client.fetch_tasks().await {
            Ok(tasks) => {
                info!(count = tasks.len(), "fetched pending tasks");
                self.emit(RunnerEvent::TaskListFetched { count: tasks.len() });
                tasks
            }
            Err(e) => {
                warn!("task fetch failed, continuing with none: {e}");
                record.fetch_errors.push(e.to_string());
                self.emit(RunnerEvent::TaskFetchFailed {
                    code: e.code(),
                    message: e.to_string(),
                });
                Vec::new()
            }
        };
        record.tasks_seen = tasks.len();

        for task in &tasks {
            if task.action == TaskAction::TelegramAuth {
                warn!(task_id = %task.id, "telegram auth task needs manual handling, skipping");
                record.tasks_skipped += 1;
                self.emit(RunnerEvent::TaskSkipped {
                    task_id: task.id.clone(),
                    action: task.action.to_string(),
                    reason: SkipReason::ManualAuth,
                });
                continue;
            }
            if task.action.completion_path().is_none() {
                warn!(task_id = %task.id, action = %task.action, "no completion endpoint for action, skipping");
                record.tasks_skipped += 1;
                self.emit(RunnerEvent::TaskSkipped {
                    task_id: task.id.clone(),
                    action: task.action.to_string(),
                    reason: SkipReason::NoCompletionEndpoint,
                });
                continue;
            }

            match self
                .client
                .complete_task(&task.action, &task.id, task.resource_id())
                .await
            {
                Ok(()) => {
                    info!(task_id = %task.id, action = %task.action, "task completed");
                    record.tasks_completed += 1;
                    self.emit(RunnerEvent::TaskCompleted {
                        task_id: task.id.clone(),
                        action: task.action.to_string(),
                    });
                }
                Err(e) => {
                    warn!(task_id = %task.id, action = %task.action, "task completion failed: {e}");
                    record.tasks_failed += 1;
                    self.emit(RunnerEvent::TaskFailed {
                        task_id: task.id.clone(),
                        action: task.action.to_string(),
                        code: e.code(),
                        message: e.to_string(),
                    });
                }
            }
            self.pace().await;
        }

        let partner_tasks = match self.client.fetch_partner_tasks().await {
            Ok(tasks) => {
                if tasks.is_empty() {
                    info!("no incomplete partner tasks");
                } else {
                    info!(count = tasks.len(), "fetched incomplete partner tasks");
                }
                self.emit(RunnerEvent::PartnerListFetched { count: tasks.len() });
                tasks
            }
            Err(e) => {
                warn!("partner fetch failed, continuing with none: {e}");
                record.fetch_errors.push(e.to_string());
                self.emit(RunnerEvent::PartnerFetchFailed {
                    code: e.code(),
                    message: e.to_string(),
                });
                Vec::new()
            }
        };
        record.partner_tasks_seen = partner_tasks.len();

        for task in &partner_tasks {
            match self
                .client
                .complete_partner_task(&task.partner_id, &task.task_type)
                .await
            {
                Ok(()) => {
                    info!(partner_id = %task.partner_id, task_type = %task.task_type, "partner task completed");
                    record.partner_tasks_completed += 1;
                    self.emit(RunnerEvent::PartnerTaskCompleted {
                        partner_id: task.partner_id.clone(),
                        task_type: task.task_type.clone(),
                    });
                }
                Err(e) => {
                    warn!(partner_id = %task.partner_id, "partner task failed: {e}");
                    record.partner_tasks_failed += 1;
                    self.emit(RunnerEvent::PartnerTaskFailed {
                        partner_id: task.partner_id.clone(),
                        task_type: task.task_type.clone(),
                        code: e.code(),
                        message: e.to_string(),
                    });
                }
            }
            self.pace().await;
        }

        record.finished_at = now_epoch_secs();
        self.push_history(record.clone());
        self.emit(RunnerEvent::CycleFinished {
            record: record.clone(),
        });
        Ok(record)
    }

    /// Pause between consecutive completion submissions.
    async fn pace(&self) {
        if self.config.task_pacing_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.task_pacing_ms)).await;
        }
    }

    fn push_history(&mut self, record: CycleRecord) {
        self.history.push(record);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        let limit = self.config.history_limit.max(1);
        if self.history.len() <= limit {
            return;
        }
        let drop_count = self.history.len().saturating_sub(limit);
        self.history.drain(0..drop_count);
    }
}

fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::ApiConfig;
    use crate::token::TokenStore;

    fn make_runner(history_limit: usize) -> QuestRunner {
        let config = ApiConfig {
            base_url: "http://localhost:1".to_owned(),
            ..ApiConfig::default()
        };
        let client = QuestClient::new(config, TokenStore::new("/tmp/questling-runner-test-token"));
        QuestRunner::new(
            client,
            RunnerConfig {
                task_pacing_ms: 0,
                cooldown_secs: 0,
                history_limit,
            },
        )
    }

    #[test]
    fn history_is_bounded() {
        let mut runner = make_runner(2);
        for cycle in 1..=5 {
            runner.push_history(CycleRecord {
                cycle,
                ..CycleRecord::default()
            });
        }
        assert_eq!(runner.history().len(), 2);
        assert_eq!(runner.history()[0].cycle, 4);
        assert_eq!(runner.history()[1].cycle, 5);
    }

    #[test]
    fn zero_history_limit_keeps_one_record() {
        let mut runner = make_runner(0);
        for cycle in 1..=3 {
            runner.push_history(CycleRecord {
                cycle,
                ..CycleRecord::default()
            });
        }
        assert_eq!(runner.history().len(), 1);
        assert_eq!(runner.history()[0].cycle, 3);
    }

    #[test]
    fn emit_without_observer_is_a_noop() {
        let runner = make_runner(10);
        runner.emit(RunnerEvent::CycleStarted { cycle: 1 });
    }

    #[test]
    fn emit_after_observer_departs_is_a_noop() {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = make_runner(10).with_events(tx);
        drop(rx);
        runner.emit(RunnerEvent::CycleStarted { cycle: 1 });
    }

    #[tokio::test]
    async fn zero_pacing_returns_immediately() {
        let runner = make_runner(10);
        tokio::time::timeout(std::time::Duration::from_millis(50), runner.pace())
            .await
            .expect("pace with zero interval should not sleep");
    }

    #[test]
    fn now_epoch_secs_is_recent() {
        // Any plausible wall clock is after 2023-01-01.
        assert!(now_epoch_secs() > 1_672_531_200);
    }
}
