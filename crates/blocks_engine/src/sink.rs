use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use blocks_core::{append_payload, Block};
use engine_logging::{engine_debug, engine_warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("remote rejected append with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("failed to encode blocks: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("background write failed: {0}")]
    Background(String),
}

/// Destination for converted blocks.
///
/// Each call appends `blocks`, in order, after the container's existing
/// children.
#[async_trait::async_trait]
pub trait BlockSink: Send + Sync {
    async fn append(&self, container_id: &str, blocks: &[Block]) -> Result<(), SinkError>;
}

#[derive(Clone)]
pub struct NotionSinkSettings {
    pub api_base: String,
    pub api_version: String,
    pub token: String,
    pub request_timeout: Duration,
}

impl NotionSinkSettings {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: token.into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for NotionSinkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionSinkSettings")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Appends blocks through the remote `PATCH /v1/blocks/{id}/children`
/// endpoint.
#[derive(Debug, Clone)]
pub struct NotionSink {
    settings: NotionSinkSettings,
    client: reqwest::Client,
}

impl NotionSink {
    pub fn new(settings: NotionSinkSettings) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SinkError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn children_endpoint(&self, container_id: &str) -> Result<Url, SinkError> {
        let base = Url::parse(&self.settings.api_base)
            .map_err(|err| SinkError::InvalidEndpoint(format!("{}: {err}", self.settings.api_base)))?;
        let mut endpoint = base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| SinkError::InvalidEndpoint(base.to_string()))?
            .pop_if_empty()
            .extend(["v1", "blocks", container_id, "children"]);
        Ok(endpoint)
    }
}

#[async_trait::async_trait]
impl BlockSink for NotionSink {
    async fn append(&self, container_id: &str, blocks: &[Block]) -> Result<(), SinkError> {
        let endpoint = self.children_endpoint(container_id)?;
        let body = serde_json::to_vec(&append_payload(blocks))?;
        engine_debug!("PATCH {endpoint} ({} blocks)", blocks.len());

        let response = self
            .client
            .patch(endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.settings.token))
            .header("Notion-Version", self.settings.api_version.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| SinkError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        engine_warn!("Append to {container_id} rejected: {status} {body}");
        Err(SinkError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}

/// Dry-run sink: every append becomes `<dir>/<container>-batch-<NNN>.json`
/// holding the exact request body the remote sink would send. Batch
/// numbers count from zero for each container.
#[derive(Debug)]
pub struct JsonDirSink {
    writer: AtomicFileWriter,
    next_batch: Mutex<HashMap<String, usize>>,
}

impl JsonDirSink {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.into()),
            next_batch: Mutex::new(HashMap::new()),
        }
    }

    fn claim_batch_index(&self, container_id: &str) -> usize {
        let mut counters = self
            .next_batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = counters.entry(container_id.to_string()).or_insert(0);
        let index = *next;
        *next += 1;
        index
    }
}

#[async_trait::async_trait]
impl BlockSink for JsonDirSink {
    async fn append(&self, container_id: &str, blocks: &[Block]) -> Result<(), SinkError> {
        let index = self.claim_batch_index(container_id);
        let filename = batch_filename(container_id, index);
        let content = serde_json::to_vec_pretty(&append_payload(blocks))?;

        let writer = self.writer.clone();
        let path = tokio::task::spawn_blocking(move || writer.write(&filename, &content))
            .await
            .map_err(|err| SinkError::Background(err.to_string()))??;
        engine_debug!("Wrote {} blocks to {}", blocks.len(), path.display());
        Ok(())
    }
}

pub fn batch_filename(container_id: &str, index: usize) -> String {
    let safe: String = container_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}-batch-{index:03}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_filenames_are_ordered_and_safe() {
        assert_eq!(batch_filename("abc-123", 0), "abc-123-batch-000.json");
        assert_eq!(batch_filename("a/b:c", 12), "a_b_c-batch-012.json");
    }

    #[test]
    fn endpoint_appends_children_path() {
        let mut settings = NotionSinkSettings::new("secret");
        settings.api_base = "http://localhost:9999/api/".to_string();
        let sink = NotionSink::new(settings).unwrap();

        let endpoint = sink.children_endpoint("page-1").unwrap();
        assert_eq!(
            endpoint.as_str(),
            "http://localhost:9999/api/v1/blocks/page-1/children"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let settings = NotionSinkSettings::new("secret-token");
        assert!(!format!("{settings:?}").contains("secret-token"));
    }
}
