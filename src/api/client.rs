//! HTTP client for the quest gateway.
//!
//! Every call flows through [`QuestClient::request`], which loads the
//! bearer token from the injected [`TokenStore`] on each attempt and
//! handles expiry in one place: a 401 triggers the revalidation flow
//! (POST revalidate → persist → confirm) and the original request is
//! retried with the fresh token, bounded by the configured budget. No
//! other retry shape exists in this crate.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::token::TokenStore;

use super::error::{ApiError, Result};
use super::types::{
    PartnerActivity, PartnerTask, PartnersResponse, Profile, ProfileResponse, QuestTask,
    TaskAction, TaskCompletion, TaskListResponse,
};

// Gateway endpoint paths.
const AUTH_PATH: &str = "/auth";
const USER_INFO_PATH: &str = "/user/info";
const REVALIDATE_PATH: &str = "/revalidate";
const TASK_LIST_PATH: &str = "/task/list";
const PARTNERS_PATH: &str = "/partners";
const PARTNER_ACTIVITY_PATH: &str = "/partnerActivity";

/// Client for the quest gateway API.
///
/// Holds the API settings, one `reqwest` client, and the token store.
/// The store is read on every request attempt, so a token persisted by
/// the revalidation flow is picked up without any in-memory handoff.
#[derive(Debug)]
pub struct QuestClient {
    config: ApiConfig,
    http: reqwest::Client,
    store: TokenStore,
}

impl QuestClient {
    /// Create a client over the given settings and token store.
    pub fn new(config: ApiConfig, store: TokenStore) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            store,
        }
    }

    /// The token store this client reads and refreshes.
    #[must_use]
    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// One HTTP attempt with the current token attached.
    ///
    /// A 401 surfaces here as a plain `Http { status: 401 }`; the bounded
    /// revalidate-and-retry handling lives in [`Self::request`].
    async fn send_once(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<Value> {
        let token = self.store.load()?;
        debug!(%method, path, "gateway request");

        let mut request = self
            .http
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json");
        if let Some(secs) = self.config.request_timeout_secs {
            request = request.timeout(std::time::Duration::from_secs(secs));
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("request to {path} failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("cannot read body from {path}: {e}")))?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ApiError::Parse(format!("invalid JSON from {path}: {e}")))?;
        debug!(path, body = %value, "gateway response");
        Ok(value)
    }

    /// Issue a request, revalidating the token and retrying on 401.
    ///
    /// Each pass through the loop re-reads the token from the store, so
    /// the retry automatically carries whatever [`Self::revalidate`]
    /// persisted. The loop spends at most `auth_retry_limit` revalidations
    /// before giving up with [`ApiError::AuthRetriesExhausted`].
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<Value> {
        let mut revalidations_left = self.config.auth_retry_limit;
        loop {
            match self.send_once(method.clone(), path, payload).await {
                Err(ApiError::Http { status: 401 }) => {
                    if revalidations_left == 0 {
                        warn!(
                            path,
                            limit = self.config.auth_retry_limit,
                            "still unauthorized after revalidating"
                        );
                        return Err(ApiError::AuthRetriesExhausted {
                            limit: self.config.auth_retry_limit,
                        });
                    }
                    revalidations_left -= 1;
                    info!(path, "token rejected (401), revalidating");
                    self.revalidate().await?;
                }
                other => return other,
            }
        }
    }

    /// Exchange the current token for a fresh one and persist it.
    ///
    /// Single-shot: a 401 from the revalidate endpoint itself is a plain
    /// HTTP error, never another revalidation. The new token is saved
    /// before the confirmation call so subsequent attempts read it from
    /// the store. The follow-up identity check is best-effort; its failure
    /// is logged but does not fail the flow.
    pub async fn revalidate(&self) -> Result<()> {
        let body = self.send_once(Method::POST, REVALIDATE_PATH, None).await?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Revalidation("response has no token field".to_owned()))?;
        self.store.save(token)?;
        info!(token = %redact(token), "revalidated token persisted");

        match self.send_once(Method::GET, AUTH_PATH, None).await {
            Ok(_) => info!("fresh token confirmed against auth endpoint"),
            Err(e) => warn!("auth confirmation after revalidation failed: {e}"),
        }
        Ok(())
    }

    /// Current user profile.
    pub async fn profile(&self) -> Result<Profile> {
        let body = self.request(Method::GET, USER_INFO_PATH, None).await?;
        let response: ProfileResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Parse(format!("unexpected user info shape: {e}")))?;
        Ok(Profile::from(response))
    }

    /// Pending tasks, with already-completed ones filtered out.
    pub async fn fetch_tasks(&self) -> Result<Vec<QuestTask>> {
        let body = self.request(Method::GET, TASK_LIST_PATH, None).await?;
        let response: TaskListResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Parse(format!("unexpected task list shape: {e}")))?;
        Ok(response
            .list
            .into_iter()
            .filter(|record| !record.completed)
            .map(QuestTask::from)
            .collect())
    }

    /// Incomplete partner tasks, flattened across all partners.
    pub async fn fetch_partner_tasks(&self) -> Result<Vec<PartnerTask>> {
        let body = self.request(Method::GET, PARTNERS_PATH, None).await?;
        let response: PartnersResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Parse(format!("unexpected partners shape: {e}")))?;
        Ok(response
            .data
            .into_iter()
            .flat_map(|partner| {
                let partner_id = partner.id;
                partner
                    .tasks
                    .into_iter()
                    .filter(|task| task.status == "incomplete")
                    .map(move |task| PartnerTask {
                        partner_id: partner_id.clone(),
                        task_type: task.task_type,
                    })
            })
            .collect())
    }

    /// Submit completion of one task.
    ///
    /// The endpoint is selected by the action kind; actions without a
    /// completion endpoint fail with [`ApiError::UnsupportedAction`]
    /// before any request is made.
    pub async fn complete_task(
        &self,
        action: &TaskAction,
        task_id: &str,
        resource_id: Option<&str>,
    ) -> Result<()> {
        let path = action
            .completion_path()
            .ok_or_else(|| ApiError::UnsupportedAction(action.to_string()))?;
        let payload = to_body(&TaskCompletion::new(action, task_id, resource_id))?;
        self.request(Method::POST, path, Some(&payload)).await?;
        Ok(())
    }

    /// Submit completion of one partner task.
    pub async fn complete_partner_task(&self, partner_id: &str, task_type: &str) -> Result<()> {
        let payload = to_body(&PartnerActivity {
            partner_id: partner_id.to_owned(),
            task_type: task_type.to_owned(),
        })?;
        self.request(Method::POST, PARTNER_ACTIVITY_PATH, Some(&payload))
            .await?;
        Ok(())
    }
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload)
        .map_err(|e| ApiError::Parse(format!("cannot encode request body: {e}")))
}

/// Short prefix for log lines; tokens never appear in full.
fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{prefix}...")
}
