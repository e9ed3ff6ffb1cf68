//! HTTP client for the scanning service backend.

pub mod model;

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

pub use model::{CreatedTask, ScanReport, Task};

/// Errors surfaced by scanning service calls.
///
/// Every operation converts failures into one of these at its own
/// boundary; nothing propagates as a panic.
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, decode).
    #[error("request to the scanning service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("scanning service returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Client for the scanning service HTTP API.
///
/// Holds the resolved base URL and a configured `reqwest::Client`; built
/// once from the loaded configuration and passed into whatever needs it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("scanq/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Full task list, newest first as the backend returns it.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.http.get(self.url("/api/tasks")).send().await?;
        let response = check_response(response).await?;

        Ok(response.json().await?)
    }

    /// Single task lookup by id.
    pub async fn get_task(&self, task_id: &str) -> Result<Task, ApiError> {
        let url = self.url(&format!("/api/tasks/{task_id}"));
        let response = self.http.get(url).send().await?;
        let response = check_response(response).await?;

        Ok(response.json().await?)
    }

    /// Create a scan task by uploading the file with its description.
    /// Exactly one request per invocation.
    pub async fn create_task(
        &self,
        description: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<CreatedTask, ApiError> {
        debug!(filename, size = bytes.len(), "submitting scan task");

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;

        let form = reqwest::multipart::Form::new()
            .text("description", description.to_string())
            .part("file", file);

        let response = self
            .http
            .post(self.url("/api/tasks"))
            .multipart(form)
            .send()
            .await?;
        let response = check_response(response).await?;

        Ok(response.json().await?)
    }

    /// Structured scan report for a completed task.
    pub async fn fetch_report(&self, task_id: &str) -> Result<ScanReport, ApiError> {
        debug!(task_id, "fetching scan report");

        let url = self.url(&format!("/api/reports/{task_id}"));
        let response = self.http.get(url).send().await?;
        let response = check_response(response).await?;

        Ok(response.json().await?)
    }

    /// Raw report bytes; the report endpoint doubles as the artifact
    /// download.
    pub async fn download_report(&self, task_id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(&format!("/api/reports/{task_id}"));
        let response = self.http.get(url).send().await?;
        let response = check_response(response).await?;

        Ok(response.bytes().await?.to_vec())
    }
}

async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if !response.status().is_success() {
        return Err(ApiError::Rejected {
            status: response.status().as_u16(),
            message: response.text().await.unwrap_or_default(),
        });
    }

    Ok(response)
}
