//! Ingestion job submission and status polling.
//!
//! Content extraction runs inside the engine; the client only uploads a URL,
//! inline text, or file bytes and then watches the write counters.

use std::path::Path;
use std::time::Duration;

use cuemap_core::{ClientError, JobStatus, Opaque, Result};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{debug, info};

use crate::{CueMapClient, EngineRequest};

const DEFAULT_CONTENT_FILENAME: &str = "content.txt";

/// Floor for the `wait_for_jobs` poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Serialize)]
struct UrlBody<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
    filename: &'a str,
}

impl CueMapClient {
    /// Ask the engine to fetch and ingest `url`.
    pub async fn ingest_url(&self, url: &str) -> Result<Opaque> {
        self.transport
            .invoke(EngineRequest::post(["ingest", "url"]).json(&UrlBody { url })?)
            .await
    }

    /// Ingest inline text. `filename` defaults to `content.txt` and only
    /// guides the engine's parser selection.
    pub async fn ingest_content(&self, content: &str, filename: Option<&str>) -> Result<Opaque> {
        let body = ContentBody {
            content,
            filename: filename.unwrap_or(DEFAULT_CONTENT_FILENAME),
        };
        self.transport
            .invoke(EngineRequest::post(["ingest", "content"]).json(&body)?)
            .await
    }

    /// Upload a file from disk as multipart field `file`.
    ///
    /// The file is streamed from disk rather than buffered whole.
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> Result<Opaque> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ClientError::transport(format!("failed to open {}", path.display()), e))?;
        let len = file
            .metadata()
            .await
            .map_err(|e| ClientError::transport(format!("failed to stat {}", path.display()), e))?
            .len();

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        info!(file = %path.display(), bytes = len, "Uploading file for ingestion");

        let part = Part::stream_with_length(file, len).file_name(filename);
        self.upload(Form::new().part("file", part)).await
    }

    /// Upload in-memory bytes as multipart field `file`.
    pub async fn ingest_bytes(&self, filename: &str, bytes: impl Into<Vec<u8>>) -> Result<Opaque> {
        let part = Part::bytes(bytes.into()).file_name(filename.to_string());
        self.upload(Form::new().part("file", part)).await
    }

    async fn upload(&self, form: Form) -> Result<Opaque> {
        self.transport
            .invoke(EngineRequest::post(["ingest", "file"]).multipart(form))
            .await
    }

    /// Write counters for the configured project.
    pub async fn jobs_status(&self) -> Result<JobStatus> {
        self.transport
            .invoke_as(EngineRequest::get(["jobs", "status"]))
            .await
    }

    /// Poll [`jobs_status`](Self::jobs_status) until every write has landed.
    ///
    /// `poll_interval` is raised to [`MIN_POLL_INTERVAL`] if smaller. Fails
    /// with `Timeout` once `max_wait` elapses; any polling error is returned
    /// as-is.
    pub async fn wait_for_jobs(&self, poll_interval: Duration, max_wait: Duration) -> Result<JobStatus> {
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        tokio::time::timeout(max_wait, self.poll_jobs(poll_interval))
            .await
            .map_err(|_| ClientError::Timeout { after: max_wait })?
    }

    async fn poll_jobs(&self, poll_interval: Duration) -> Result<JobStatus> {
        loop {
            let status = self.jobs_status().await?;
            if status.is_complete() {
                return Ok(status);
            }
            debug!(
                completed = status.writes_completed,
                total = status.writes_total,
                "Ingestion still running"
            );
            tokio::time::sleep(poll_interval).await;
        }
    }
}
