use std::env;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use cohort_core::{Learner, LearnerId, LearnerPatch, NewLearner, WeekProgress};

use crate::error::StoreError;
use crate::store::LearnerStore;

const BASE_URL_ENV: &str = "COHORT_API_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Connection settings for the remote learner store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    base_url: String,
}

impl StoreConfig {
    /// Reads the base URL from `COHORT_API_URL`, falling back to the local
    /// development default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

//
// ─── HTTP STORE ────────────────────────────────────────────────────────────────
//

/// [`LearnerStore`] backed by the remote REST service.
#[derive(Clone)]
pub struct HttpLearnerStore {
    client: Client,
    config: StoreConfig,
}

impl HttpLearnerStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }
}

#[derive(Serialize)]
struct ReplaceProgressBody<'a> {
    items: &'a [WeekProgress],
}

#[async_trait]
impl LearnerStore for HttpLearnerStore {
    async fn list_learners(&self) -> Result<Vec<Learner>, StoreError> {
        let url = self.url("/learners");
        debug!(%url, "listing learners");
        let response = self.client.get(&url).send().await?;
        decode_json(response).await
    }

    async fn create_learner(&self, draft: &NewLearner) -> Result<Learner, StoreError> {
        let url = self.url("/learners");
        debug!(%url, name = draft.name(), "creating learner");
        let response = self.client.post(&url).json(draft).send().await?;
        decode_json(response).await
    }

    async fn delete_learner(&self, id: LearnerId) -> Result<(), StoreError> {
        let url = self.url(&format!("/learners/{id}"));
        debug!(%url, "deleting learner");
        let response = self.client.delete(&url).send().await?;
        if response.status().is_success() {
            // 204 No Content is the usual shape; any success body is ignored.
            Ok(())
        } else {
            Err(remote_error(response).await)
        }
    }

    async fn replace_progress(
        &self,
        id: LearnerId,
        progress: &[WeekProgress],
    ) -> Result<Learner, StoreError> {
        let url = self.url(&format!("/learners/{id}/progress"));
        debug!(%url, weeks = progress.len(), "replacing progress");
        let body = ReplaceProgressBody { items: progress };
        let response = self.client.put(&url).json(&body).send().await?;
        decode_json(response).await
    }

    async fn patch_learner(
        &self,
        id: LearnerId,
        patch: &LearnerPatch,
    ) -> Result<Learner, StoreError> {
        let url = self.url(&format!("/learners/{id}"));
        debug!(%url, "patching learner fields");
        let response = self.client.patch(&url).json(patch).send().await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    if !response.status().is_success() {
        return Err(remote_error(response).await);
    }
    response.json().await.map_err(StoreError::Decode)
}

async fn remote_error(response: Response) -> StoreError {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(status, &content_type, &body);
    warn!(status = status.as_u16(), %detail, "learner store returned an error");
    StoreError::Remote {
        status: status.as_u16(),
        detail,
    }
}

/// Extract a human-readable message from an error response: a JSON body if
/// one parses, else the raw text, else a generic status line.
fn error_detail(status: StatusCode, content_type: &str, body: &str) -> String {
    if content_type.contains("application/json") {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            return value.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("error")
    )
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
