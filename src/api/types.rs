//! Wire and domain types for the quest gateway.
//!
//! The `*Response` / `*Record` structs mirror the gateway's JSON exactly
//! (underscore-prefixed ids, camelCase payload keys); the bare structs
//! ([`QuestTask`], [`PartnerTask`], [`Profile`]) are the normalized
//! projections the rest of the crate works with.

use serde::{Deserialize, Serialize};

/// Task action kinds the gateway hands out.
///
/// Unknown kinds are preserved verbatim in [`TaskAction::Other`] so a new
/// server-side action degrades to a logged skip instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskAction {
    /// Follow a partner account.
    Follow,
    /// Retweet a given tweet.
    Retweet,
    /// Like a given tweet.
    Like,
    /// Link a Telegram account; needs manual handling outside this client.
    TelegramAuth,
    /// An action kind this client does not know how to complete.
    Other(String),
}

impl TaskAction {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Follow => "follow",
            Self::Retweet => "retweet",
            Self::Like => "like",
            Self::TelegramAuth => "telegram-auth",
            Self::Other(kind) => kind,
        }
    }

    /// Completion endpoint for this action, when one exists.
    #[must_use]
    pub fn completion_path(&self) -> Option<&'static str> {
        match self {
            Self::Follow => Some("/task/follow"),
            Self::Retweet => Some("/task/retweet"),
            Self::Like => Some("/task/like"),
            Self::TelegramAuth | Self::Other(_) => None,
        }
    }

    /// Follow tasks reference an account; every other engagement
    /// references a tweet.
    #[must_use]
    pub fn is_follow(&self) -> bool {
        matches!(self, Self::Follow)
    }
}

impl From<String> for TaskAction {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "follow" => Self::Follow,
            "retweet" => Self::Retweet,
            "like" => Self::Like,
            "telegram-auth" => Self::TelegramAuth,
            _ => Self::Other(kind),
        }
    }
}

impl From<TaskAction> for String {
    fn from(action: TaskAction) -> Self {
        action.as_str().to_owned()
    }
}

impl std::fmt::Display for TaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Task list ───────────────────────────────────────────────────────────

/// `GET /task/list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskListResponse {
    /// Raw task records, completed ones included.
    #[serde(default)]
    pub list: Vec<TaskRecord>,
}

/// One raw task record as the gateway sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    /// Gateway task id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Action kind.
    pub task_action: TaskAction,
    /// Tweet to engage with (retweet/like tasks).
    #[serde(default)]
    pub tweet_id: Option<String>,
    /// Account to follow (follow tasks).
    #[serde(default)]
    pub twitter_id: Option<String>,
    /// Whether this task was already completed.
    #[serde(default)]
    pub completed: bool,
}

/// A pending task, normalized for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestTask {
    /// Gateway task id.
    pub id: String,
    /// Action kind.
    pub action: TaskAction,
    /// Tweet to engage with, when the task names one.
    pub tweet_id: Option<String>,
    /// Account to follow, when the task names one.
    pub twitter_id: Option<String>,
}

impl QuestTask {
    /// Resource the task points at: the account id when present, otherwise
    /// the tweet id.
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        self.twitter_id.as_deref().or(self.tweet_id.as_deref())
    }
}

impl From<TaskRecord> for QuestTask {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            action: record.task_action,
            tweet_id: record.tweet_id,
            twitter_id: record.twitter_id,
        }
    }
}

// ── Partners ────────────────────────────────────────────────────────────

/// `GET /partners` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PartnersResponse {
    /// Partner records with their nested task lists.
    #[serde(default)]
    pub data: Vec<PartnerRecord>,
}

/// One partner as the gateway sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerRecord {
    /// Gateway partner id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Nested task entries, all statuses included.
    #[serde(default)]
    pub tasks: Vec<PartnerTaskRecord>,
}

/// One nested partner task entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerTaskRecord {
    /// Status string; only `"incomplete"` entries are actionable.
    #[serde(default)]
    pub status: String,
    /// Partner-defined task type, forwarded verbatim on completion.
    pub task_type: String,
}

/// An actionable partner task.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerTask {
    /// Gateway partner id.
    pub partner_id: String,
    /// Partner-defined task type.
    pub task_type: String,
}

// ── Profile ─────────────────────────────────────────────────────────────

/// `GET /user/info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    /// User record; the gateway may omit it entirely.
    #[serde(rename = "userData", default)]
    pub user_data: Option<UserRecord>,
}

/// Raw user record.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    /// Gateway user id.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Accumulated quest score.
    #[serde(default)]
    pub overall_score: Option<f64>,
}

/// Identity snapshot logged once per cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Gateway user id.
    pub id: Option<String>,
    /// Display name.
    pub username: Option<String>,
    /// Accumulated quest score.
    pub score: Option<f64>,
}

impl Profile {
    /// One-line identity summary with placeholder fallbacks for absent
    /// fields.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "User: {} - ID: {} - Score: {}",
            self.username.as_deref().unwrap_or("Unknown User"),
            self.id.as_deref().unwrap_or("Unknown ID"),
            self.score
                .map_or_else(|| "Unknown Score".to_owned(), |score| score.to_string()),
        )
    }
}

impl From<ProfileResponse> for Profile {
    fn from(response: ProfileResponse) -> Self {
        let user = response.user_data.unwrap_or_else(|| UserRecord {
            id: None,
            username: None,
            overall_score: None,
        });
        Self {
            id: user.id,
            username: user.username,
            score: user.overall_score,
        }
    }
}

// ── Completion payloads ─────────────────────────────────────────────────

/// Body for the task completion endpoints.
///
/// Carries `taskId` plus exactly one of `twitterId` (follow tasks) or
/// `tweetId` (tweet engagements); the unused field is omitted from the
/// JSON entirely, not sent as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    /// Gateway task id being completed.
    pub task_id: String,
    /// Account id, present for follow tasks only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_id: Option<String>,
    /// Tweet id, present for non-follow engagements only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_id: Option<String>,
}

impl TaskCompletion {
    /// Route the resource id into the field the action kind expects.
    #[must_use]
    pub fn new(action: &TaskAction, task_id: impl Into<String>, resource_id: Option<&str>) -> Self {
        let resource = resource_id.map(str::to_owned);
        if action.is_follow() {
            Self {
                task_id: task_id.into(),
                twitter_id: resource,
                tweet_id: None,
            }
        } else {
            Self {
                task_id: task_id.into(),
                twitter_id: None,
                tweet_id: resource,
            }
        }
    }
}

/// Body for `POST /partnerActivity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerActivity {
    /// Gateway partner id.
    pub partner_id: String,
    /// Partner-defined task type.
    pub task_type: String,
}
