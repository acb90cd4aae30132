//! Data models for analysis results and history.

mod analysis;
mod history;
mod lenient;

pub use analysis::{
    AnalysisResult, AnalysisStatus, ComplianceReport, ComplianceStatus, RawAnalysisResponse,
    ScoreTier,
};
pub use history::{HistoryEntry, DEFAULT_HISTORY_ANALYSIS_TYPE, DEFAULT_HISTORY_FILENAME};
