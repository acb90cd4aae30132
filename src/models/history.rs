//! Persisted analysis history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::{AnalysisResult, ComplianceReport};

/// Filename recorded when the result carries no document name.
pub const DEFAULT_HISTORY_FILENAME: &str = "Text Analysis";

/// Analysis type recorded when the result carries none.
pub const DEFAULT_HISTORY_ANALYSIS_TYPE: &str = "general";

/// One past analysis.
///
/// Entries are immutable once built; the only derived copy is the one carrying
/// the user id for the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    id: String,
    filename: String,
    analysis_type: String,
    timestamp: DateTime<Utc>,
    result: String,
    compliance: Option<ComplianceReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

impl HistoryEntry {
    /// Build an entry for a result received at `now`.
    pub fn from_result(result: &AnalysisResult, now: DateTime<Utc>) -> Self {
        let analysis_type = if result.analysis_type.is_empty() {
            DEFAULT_HISTORY_ANALYSIS_TYPE.to_string()
        } else {
            result.analysis_type.clone()
        };

        Self {
            id: now.timestamp_millis().to_string(),
            filename: result
                .document_name
                .clone()
                .unwrap_or_else(|| DEFAULT_HISTORY_FILENAME.to_string()),
            analysis_type,
            timestamp: now,
            result: result.result.clone().unwrap_or_default(),
            compliance: result.compliance.clone(),
            user_id: None,
        }
    }

    /// Copy of this entry owned by `user_id`, as sent to the remote store.
    pub fn for_user(&self, user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..self.clone()
        }
    }

    /// This entry, with `-1`, `-2`, ... appended to its id until `taken`
    /// rejects it. Suffixed ids still sort after the bare timestamp.
    pub fn with_unique_id(mut self, taken: impl Fn(&str) -> bool) -> Self {
        if !taken(&self.id) {
            return self;
        }
        let base = self.id.clone();
        let mut n = 1u32;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !taken(&candidate) {
                self.id = candidate;
                return self;
            }
            n += 1;
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn analysis_type(&self) -> &str {
        &self.analysis_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn compliance(&self) -> Option<&ComplianceReport> {
        self.compliance.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisStatus;
    use chrono::TimeZone;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            status: AnalysisStatus::Success,
            analysis_type: String::new(),
            result: None,
            document_name: None,
            document_length: None,
            compliance: None,
            message: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let entry = HistoryEntry::from_result(&sample_result(), now);
        assert_eq!(entry.id(), now.timestamp_millis().to_string());
        assert_eq!(entry.filename(), "Text Analysis");
        assert_eq!(entry.analysis_type(), "general");
        assert_eq!(entry.result(), "");
        assert!(entry.compliance().is_none());
        assert!(entry.user_id().is_none());
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut result = sample_result();
        result.analysis_type = "key_points".into();
        result.document_name = Some("lease.pdf".into());

        let entry = HistoryEntry::from_result(&result, now);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["analysisType"], "key_points");
        assert_eq!(value["filename"], "lease.pdf");
        assert!(value["compliance"].is_null());
        assert!(value.get("userId").is_none());

        let owned = serde_json::to_value(entry.for_user("uid-7")).unwrap();
        assert_eq!(owned["userId"], "uid-7");
        assert_eq!(owned["id"], value["id"]);
    }

    #[test]
    fn test_unique_id_suffixes_collisions() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let base = now.timestamp_millis().to_string();
        let taken = [base.clone(), format!("{}-1", base)];

        let fresh = HistoryEntry::from_result(&sample_result(), now).with_unique_id(|_| false);
        assert_eq!(fresh.id(), base);

        let entry = HistoryEntry::from_result(&sample_result(), now)
            .with_unique_id(|id| taken.iter().any(|t| t == id));
        assert_eq!(entry.id(), format!("{}-2", base));
        assert!(entry.id() > base.as_str());
    }
}
