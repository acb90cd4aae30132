//! Submission flow: validate input, call the analysis service, render the
//! outcome and record history.
//!
//! Each submission moves `Idle -> Loading -> Success | Error`. `submit` takes
//! `&mut self`, so an orchestrator never has two requests in flight.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::analysis::{AnalysisService, DocumentUpload};
use crate::config::{ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES};
use crate::history::{AuthState, HistoryStore, RecordOutcome};
use crate::models::AnalysisResult;
use crate::render::{self, DEFAULT_ANALYSIS_TYPE};

/// Display name of pasted-text submissions.
pub const TEXT_INPUT_NAME: &str = "Text Input";

/// Message shown when the service cannot be reached or read.
pub const CONNECTION_ERROR_MESSAGE: &str = "Failed to connect to analysis service";

/// What the user submitted.
#[derive(Debug, Clone)]
pub enum Submission {
    Document {
        path: Option<PathBuf>,
        analysis_type: Option<String>,
    },
    Text {
        text: String,
        analysis_type: Option<String>,
    },
}

impl Submission {
    pub fn document(path: impl Into<PathBuf>, analysis_type: Option<String>) -> Self {
        Submission::Document {
            path: Some(path.into()),
            analysis_type,
        }
    }

    pub fn text(text: impl Into<String>, analysis_type: Option<String>) -> Self {
        Submission::Text {
            text: text.into(),
            analysis_type,
        }
    }

    fn analysis_type(&self) -> &str {
        let chosen = match self {
            Submission::Document { analysis_type, .. } | Submission::Text { analysis_type, .. } => {
                analysis_type.as_deref()
            }
        };
        chosen
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_ANALYSIS_TYPE)
    }
}

/// A successful analysis, ready to display.
#[derive(Debug, Clone)]
pub struct RenderedAnalysis {
    pub result: AnalysisResult,
    /// Name shown in the document badge.
    pub display_name: String,
    /// Results panel markup.
    pub panel_html: String,
    /// Panel content without markup, as exported.
    pub plain_text: String,
    pub export_filename: String,
    pub history: RecordOutcome,
}

/// Submission state.
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success(Box<RenderedAnalysis>),
    Error(String),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Loading => "loading",
            SubmissionState::Success(_) => "success",
            SubmissionState::Error(_) => "error",
        }
    }
}

/// Input rejected before any request was sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please select a document to analyze.")]
    MissingDocument,
    #[error("Please enter text to analyze.")]
    EmptyText,
    #[error("Unsupported document type {0:?}; expected one of: txt, pdf, doc, docx, rtf.")]
    UnsupportedType(String),
    #[error("Document is too large ({size} bytes; limit is {limit} bytes).")]
    TooLarge { size: u64, limit: u64 },
    #[error("Could not read document {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

type Observer = Box<dyn Fn(&SubmissionState) + Send + Sync>;

/// Drives submissions against an analysis service.
pub struct Orchestrator<'a> {
    service: &'a dyn AnalysisService,
    history: &'a HistoryStore,
    auth: AuthState,
    max_upload_bytes: u64,
    state: SubmissionState,
    observer: Option<Observer>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(service: &'a dyn AnalysisService, history: &'a HistoryStore, auth: AuthState) -> Self {
        Self {
            service,
            history,
            auth,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            state: SubmissionState::Idle,
            observer: None,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Call `observer` on every state transition.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&SubmissionState) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Return to `Idle` (the "try again" action).
    pub fn reset(&mut self) {
        self.transition(SubmissionState::Idle);
    }

    /// Run one submission to completion.
    ///
    /// Validation failures return `Err` and leave the state untouched; service
    /// failures end in [`SubmissionState::Error`].
    pub async fn submit(&mut self, submission: Submission) -> Result<&SubmissionState, SubmitError> {
        let analysis_type = submission.analysis_type().to_string();

        let outcome = match submission {
            Submission::Document { path, .. } => {
                let path = path.ok_or(SubmitError::MissingDocument)?;
                let upload = self.read_upload(&path).await?;
                let name = upload.file_name.clone();

                self.transition(SubmissionState::Loading);
                self.service
                    .analyze_document(upload, &analysis_type)
                    .await
                    .map(|result| {
                        let display = result.document_name.clone().unwrap_or(name);
                        (result, display)
                    })
            }
            Submission::Text { text, .. } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(SubmitError::EmptyText);
                }

                self.transition(SubmissionState::Loading);
                self.service
                    .analyze_text(text, &analysis_type)
                    .await
                    .map(|mut result| {
                        result.document_name = Some(TEXT_INPUT_NAME.to_string());
                        (result, TEXT_INPUT_NAME.to_string())
                    })
            }
        };

        let next = match outcome {
            Ok((result, display_name)) if result.is_success() => {
                info!(analysis_type = %result.analysis_type, "analysis successful");
                let rendered = self.render_success(result, display_name).await;
                SubmissionState::Success(Box::new(rendered))
            }
            Ok((result, _)) => {
                let message = result
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| render::panel::DEFAULT_ERROR_MESSAGE.to_string());
                warn!(message = %message, "analysis service reported an error");
                SubmissionState::Error(message)
            }
            Err(e) => {
                error!(error = %e, "error analyzing submission");
                SubmissionState::Error(CONNECTION_ERROR_MESSAGE.to_string())
            }
        };

        self.transition(next);
        Ok(&self.state)
    }

    /// Render first, then record history, in that order.
    async fn render_success(&self, result: AnalysisResult, display_name: String) -> RenderedAnalysis {
        let panel_html = render::result_panel(&result, &display_name);
        let plain_text = render::plain_text(&render::analysis_content(&result));
        let export_filename =
            render::export_filename(result.document_name.as_deref(), &result.analysis_type);
        let history = self.history.record(&result, &self.auth).await;

        RenderedAnalysis {
            result,
            display_name,
            panel_html,
            plain_text,
            export_filename,
            history,
        }
    }

    async fn read_upload(&self, path: &Path) -> Result<DocumentUpload, SubmitError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(SubmitError::UnsupportedType(extension));
        }

        let unreadable = |e: std::io::Error| SubmitError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let meta = tokio::fs::metadata(path).await.map_err(unreadable)?;
        if meta.len() > self.max_upload_bytes {
            return Err(SubmitError::TooLarge {
                size: meta.len(),
                limit: self.max_upload_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| render::export::DEFAULT_DOCUMENT_NAME.to_string());

        Ok(DocumentUpload { file_name, bytes })
    }

    fn transition(&mut self, next: SubmissionState) {
        self.state = next;
        if let Some(observer) = &self.observer {
            observer(&self.state);
        }
    }
}
