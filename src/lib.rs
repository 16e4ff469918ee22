//! Questling: scheduled client for a quest/rewards gateway.
//!
//! This crate polls one remote quest API for outstanding tasks and partner
//! tasks, submits their completions, and keeps its bearer token alive:
//!
//! - **Token store**: the token lives in a plain text file; see [`token`].
//! - **Request wrapper**: every HTTP call attaches the stored token; a 401
//!   triggers revalidation and a bounded retry of the original call; see
//!   [`api`].
//! - **Poll loop**: fetch → filter → execute → cooldown, forever, with
//!   structured events and a bounded cycle history; see [`runner`].
//!
//! # Architecture
//!
//! ```text
//! QuestRunner ── profile/tasks/partners ──> QuestClient ──> gateway
//!      │                                        │
//!      │ RunnerEvents                           │ 401? revalidate + retry
//!      v                                        v
//!  observer (optional)                      TokenStore (token.txt)
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod quest_dirs;
pub mod runner;
pub mod token;

pub use api::{ApiError, PartnerTask, Profile, QuestClient, QuestTask, TaskAction};
pub use config::QuestConfig;
pub use error::{QuestError, Result};
pub use events::{CycleRecord, RunnerEvent, SkipReason};
pub use runner::{QuestRunner, RunnerError};
pub use token::{StoreError, TokenStore};
