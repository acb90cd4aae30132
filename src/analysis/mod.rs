//! Analysis service client.

mod client;

pub use client::{
    AnalysisClient, AnalysisService, ClientError, DocumentUpload, ANALYZE_DOCUMENT_PATH,
    ANALYZE_TEXT_PATH,
};
