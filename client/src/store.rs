// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Persistence behind the controller: the REST `tasks` resource.
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tasksync_common::{TaskDraft, TaskId, TaskRecord};
use tracing::{debug, warn};

use crate::config::ClientConfig;

/// Where tasks are durably kept.
///
/// Records come back unnormalized; the controller decides what to admit.
/// Every failure, whatever its cause, is just an error.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// `GET /tasks`
    async fn list(&self) -> Result<Vec<TaskRecord>>;

    /// `POST /tasks`; the backend assigns `id` and `createdAt`.
    async fn create(&self, draft: &TaskDraft) -> Result<TaskRecord>;

    /// `PUT /tasks/{id}` with the full set of editable fields.
    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<TaskRecord>;

    /// `DELETE /tasks/{id}`
    async fn delete(&self, id: TaskId) -> Result<()>;
}

/// [`TaskStore`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: Url,
}

impl HttpTaskStore {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn task_url(&self, id: TaskId) -> Result<Url> {
        let raw = format!("{}/{id}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&raw).with_context(|| format!("Invalid task URL: {raw}"))
    }
}

/// Turns any non-2xx status into an error naming the action.
async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Failed to {action}: HTTP {status}: {body}");
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to {action}: malformed response body"))
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self) -> Result<Vec<TaskRecord>> {
        debug!("GET {}", self.base_url);
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .context("Failed to fetch tasks")?;
        let response = check_status(response, "fetch tasks").await?;

        // Elements are decoded one by one so a single bad record does not
        // hide the rest of the collection.
        let values: Vec<serde_json::Value> = read_json(response, "fetch tasks").await?;
        let records = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<TaskRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping undecodable task record: {}", e);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    async fn create(&self, draft: &TaskDraft) -> Result<TaskRecord> {
        debug!("POST {}", self.base_url);
        let response = self
            .client
            .post(self.base_url.clone())
            .json(draft)
            .send()
            .await
            .context("Failed to create task")?;
        let response = check_status(response, "create task").await?;
        read_json(response, "create task").await
    }

    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<TaskRecord> {
        let url = self.task_url(id)?;
        debug!("PUT {}", url);
        let response = self
            .client
            .put(url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("Failed to update task {id}"))?;
        let response = check_status(response, "update task").await?;
        read_json(response, "update task").await
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        let url = self.task_url(id)?;
        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .with_context(|| format!("Failed to delete task {id}"))?;
        check_status(response, "delete task").await?;
        Ok(())
    }
}
