//! HTTP client for the document analysis service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::models::{AnalysisResult, RawAnalysisResponse};

/// Endpoint for document uploads.
pub const ANALYZE_DOCUMENT_PATH: &str = "/api/analyze-document";
/// Endpoint for pasted text.
pub const ANALYZE_TEXT_PATH: &str = "/api/analyze-text";

/// Errors reaching or reading the analysis service.
///
/// Errors the service reports inside a readable envelope are not `ClientError`s;
/// they come back as an [`AnalysisResult`] with an error status.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("could not read analysis response: {0}")]
    Parse(String),
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// A document read into memory for upload.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// The analysis service, as seen by the submission flow.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze_document(
        &self,
        upload: DocumentUpload,
        analysis_type: &str,
    ) -> Result<AnalysisResult, ClientError>;

    async fn analyze_text(
        &self,
        text: &str,
        analysis_type: &str,
    ) -> Result<AnalysisResult, ClientError>;
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
    analysis_type: &'a str,
}

/// reqwest-backed [`AnalysisService`].
pub struct AnalysisClient {
    client: Client,
    base_url: Url,
}

impl AnalysisClient {
    /// Create a client for the service at `base_url`.
    ///
    /// No timeout is applied unless one is given.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Self::with_client(client, base_url)
    }

    /// Create a client around an existing reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Read the envelope whatever the HTTP status; non-2xx marks it as an error.
    async fn read_envelope(resp: reqwest::Response) -> Result<AnalysisResult, ClientError> {
        let status = resp.status();
        debug!(status = %status, "analysis response received");

        let raw: RawAnalysisResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(raw.into_result(status.is_success()))
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn analyze_document(
        &self,
        upload: DocumentUpload,
        analysis_type: &str,
    ) -> Result<AnalysisResult, ClientError> {
        let url = self.endpoint(ANALYZE_DOCUMENT_PATH)?;
        info!(file = %upload.file_name, analysis_type, "sending document for analysis");

        let mime = upload.mime_type();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&mime)
            .map_err(|e| ClientError::Build(e.to_string()))?;
        let form = Form::new()
            .part("document", part)
            .text("analysis_type", analysis_type.to_string());

        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Self::read_envelope(resp).await
    }

    async fn analyze_text(
        &self,
        text: &str,
        analysis_type: &str,
    ) -> Result<AnalysisResult, ClientError> {
        let url = self.endpoint(ANALYZE_TEXT_PATH)?;
        info!(chars = text.chars().count(), analysis_type, "sending text for analysis");

        let resp = self
            .client
            .post(url)
            .json(&TextRequest {
                text,
                analysis_type,
            })
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Self::read_envelope(resp).await
    }
}
