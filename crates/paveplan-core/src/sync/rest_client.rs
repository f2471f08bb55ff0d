//! HTTP implementation of the remote mirror.
//!
//! Talks to a hosted backend exposing per-organization REST collections:
//! `PUT/DELETE {base}/orgs/{org}/{tasks|crew|blackouts}/{id}` and
//! `GET {base}/orgs/{org}/snapshot`. Every request carries a bearer api key
//! when one is configured and is bounded by the client timeout.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::mission::{BlackoutWindow, CrewMember, MissionTask};
use crate::sync::{RemoteMirror, RemoteSnapshot, SyncError};

/// Request timeout applied to every mirror call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// REST-backed remote mirror.
pub struct RestMirror {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    org: String,
}

impl RestMirror {
    /// Create a mirror with the default timeout.
    pub fn new(base_url: &str, api_key: Option<&str>, org: &str) -> Result<Self, SyncError> {
        Self::with_timeout(base_url, api_key, org, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: Option<&str>,
        org: &str,
        timeout_secs: u64,
    ) -> Result<Self, SyncError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| SyncError::InvalidBaseUrl(e.to_string()))?;
        // Url::join replaces the last path segment unless the base ends in a
        // slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.map(|k| k.to_string()),
            org: org.to_string(),
        })
    }

    fn endpoint(&self, kind: &str, id: Option<&str>) -> Result<Url, SyncError> {
        let mut path = format!("orgs/{}/{}", self.org, kind);
        if let Some(id) = id {
            path.push('/');
            path.push_str(id);
        }
        self.base_url
            .join(&path)
            .map_err(|e| SyncError::InvalidBaseUrl(e.to_string()))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn upsert<T: Serialize + Sync>(
        &self,
        kind: &str,
        id: &str,
        record: &T,
    ) -> Result<(), SyncError> {
        let url = self.endpoint(kind, Some(id))?;
        let response = self.authorize(self.client.put(url)).json(record).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    async fn delete(&self, kind: &str, id: &str) -> Result<(), SyncError> {
        let url = self.endpoint(kind, Some(id))?;
        let response = self.authorize(self.client.delete(url)).send().await?;
        // Deleting a record the remote never saw is not a failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::ensure_success(response).await.map(|_| ())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(SyncError::RemoteApi {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RemoteMirror for RestMirror {
    async fn upsert_task(&self, task: &MissionTask) -> Result<(), SyncError> {
        self.upsert("tasks", &task.id, task).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), SyncError> {
        self.delete("tasks", id).await
    }

    async fn upsert_crew(&self, member: &CrewMember) -> Result<(), SyncError> {
        self.upsert("crew", &member.id, member).await
    }

    async fn delete_crew(&self, id: &str) -> Result<(), SyncError> {
        self.delete("crew", id).await
    }

    async fn upsert_blackout(&self, window: &BlackoutWindow) -> Result<(), SyncError> {
        self.upsert("blackouts", &window.id, window).await
    }

    async fn delete_blackout(&self, id: &str) -> Result<(), SyncError> {
        self.delete("blackouts", id).await
    }

    async fn fetch_snapshot(&self) -> Result<Option<RemoteSnapshot>, SyncError> {
        let url = self.endpoint("snapshot", None)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        let snapshot = response.json::<RemoteSnapshot>().await?;
        Ok(Some(snapshot))
    }
}
