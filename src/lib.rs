//! LexAI: legal document analysis client.
//!
//! Submits documents or pasted text to the analysis service, renders the
//! returned analysis (including the compliance validation report) as HTML, and
//! keeps a capped history of past analyses.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod history;
pub mod models;
pub mod render;
pub mod submit;

pub use analysis::{AnalysisClient, AnalysisService, ClientError};
pub use history::{AuthState, HistoryStore, RecordOutcome};
pub use models::{AnalysisResult, ComplianceReport, HistoryEntry};
pub use submit::{Orchestrator, Submission, SubmissionState};
