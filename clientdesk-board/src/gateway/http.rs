//! REST implementation of the gateway
//!
//! - `POST {base}/tasks/{id}/move` with the JSON commit triple
//! - `GET {base}/tasks` for the authoritative collection
//!
//! Any 4xx on a move means the system of record refused it and is reported
//! as a conflict. 5xx responses, timeouts and transport failures are network
//! errors. Nothing is retried here.

use super::{MoveCommit, PersistenceGateway, TaskSource};
use crate::error::{BoardError, GatewayError, Result};
use crate::types::{Task, TaskId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpGateway`]
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("clientdesk-board/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gateway backed by the host application's REST API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(config: &HttpGatewayConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| BoardError::InvalidGatewayConfig {
            message: format!("base URL '{}': {}", config.base_url, e),
        })?;
        if base.cannot_be_a_base() {
            return Err(BoardError::InvalidGatewayConfig {
                message: format!("base URL '{}' cannot carry a path", config.base_url),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| BoardError::InvalidGatewayConfig {
                message: e.to_string(),
            })?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, GatewayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::network("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    #[instrument(skip(self), fields(task = %commit.task_id))]
    async fn commit_move(&self, commit: &MoveCommit) -> std::result::Result<(), GatewayError> {
        let url = self.endpoint(&["tasks", commit.task_id.as_str(), "move"])?;
        debug!(%url, lane = %commit.lane, rank = commit.rank, "committing move");

        let response = self
            .client
            .post(url)
            .json(commit)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, "move rejected");
        Err(status_error(&commit.task_id, status, &body))
    }
}

#[async_trait]
impl TaskSource for HttpGateway {
    #[instrument(skip(self))]
    async fn fetch_tasks(&self) -> std::result::Result<Vec<Task>, GatewayError> {
        let url = self.endpoint(&["tasks"])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("task fetch returned {}", status);
            return Err(GatewayError::network(message));
        }

        let tasks: Vec<Task> = response.json().await.map_err(transport_error)?;
        debug!(count = tasks.len(), "fetched authoritative tasks");
        Ok(tasks)
    }
}

fn status_error(task_id: &TaskId, status: StatusCode, body: &str) -> GatewayError {
    if status.is_client_error() {
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body.trim())
        };
        GatewayError::conflict(task_id.clone(), message)
    } else {
        GatewayError::network(format!("server returned {}", status))
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::network("request timed out")
    } else {
        GatewayError::network(e.to_string())
    }
}
