//! Analysis response types.
//!
//! The service answers both endpoints with the same loosely-shaped JSON envelope.
//! [`RawAnalysisResponse`] mirrors that envelope, field aliases included, and
//! [`RawAnalysisResponse::into_result`] folds it into the canonical [`AnalysisResult`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Outcome reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Success,
    Error,
}

/// Canonical analysis result, after alias resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub status: AnalysisStatus,
    /// Analysis type code (open set: unknown codes are kept as-is).
    pub analysis_type: String,
    /// Free-text body with lightweight `**bold**` / `_italic_` markup.
    pub result: Option<String>,
    pub document_name: Option<String>,
    /// Character count of the analyzed document.
    pub document_length: Option<u64>,
    pub compliance: Option<ComplianceReport>,
    /// Error detail, present when `status` is `Error`.
    pub message: Option<String>,
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}

/// Compliance validation sub-report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub compliance_status: ComplianceStatus,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub compliance_score: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub legal_terms_found: Vec<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub red_flags_count: u64,
}

/// Compliance status code. Open enumeration: codes the client does not know are
/// preserved in `Other` and rendered through the label fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplianceStatus {
    Valid,
    ReviewRecommended,
    Flagged,
    #[default]
    Unknown,
    Other(String),
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ComplianceStatus::Valid => "valid",
            ComplianceStatus::ReviewRecommended => "review_recommended",
            ComplianceStatus::Flagged => "flagged",
            ComplianceStatus::Unknown => "unknown",
            ComplianceStatus::Other(code) => code,
        }
    }

    /// Display label. Unknown codes get their first letter capitalized and
    /// underscores replaced with spaces.
    pub fn label(&self) -> String {
        match self {
            ComplianceStatus::Valid => "Valid".to_string(),
            ComplianceStatus::ReviewRecommended => "Review Recommended".to_string(),
            ComplianceStatus::Flagged => "Compliance Issues".to_string(),
            ComplianceStatus::Unknown => "Unknown".to_string(),
            ComplianceStatus::Other(code) => {
                let mut chars = code.chars();
                match chars.next() {
                    Some(first) => {
                        let rest: String = chars.collect();
                        format!("{}{}", first.to_uppercase(), rest.replace('_', " "))
                    }
                    None => String::new(),
                }
            }
        }
    }

    /// Text colour class for the status badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            ComplianceStatus::Valid => "text-success",
            ComplianceStatus::ReviewRecommended => "text-warning",
            _ => "text-danger",
        }
    }
}

impl From<String> for ComplianceStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "valid" => ComplianceStatus::Valid,
            "review_recommended" => ComplianceStatus::ReviewRecommended,
            "flagged" => ComplianceStatus::Flagged,
            "unknown" => ComplianceStatus::Unknown,
            _ => ComplianceStatus::Other(code),
        }
    }
}

impl From<ComplianceStatus> for String {
    fn from(status: ComplianceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier of a compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    /// Lower bounds are inclusive: `>= 0.7` is high, `>= 0.4` is medium.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            ScoreTier::High
        } else if score >= 0.4 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }

    /// Background class for the score bar.
    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreTier::High => "bg-success",
            ScoreTier::Medium => "bg-warning",
            ScoreTier::Low => "bg-danger",
        }
    }
}

impl ComplianceReport {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.compliance_score)
    }
}

/// Analysis envelope exactly as the service sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysisResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::count_opt")]
    pub document_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count_opt")]
    pub document_size: Option<u64>,
    #[serde(default)]
    pub legal_bert_validation: Option<ComplianceReport>,
    #[serde(default)]
    pub compliance: Option<ComplianceReport>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RawAnalysisResponse {
    /// Resolve field aliases into the canonical result.
    ///
    /// `http_ok` is false for non-2xx responses; those are errors whatever the
    /// envelope claims.
    pub fn into_result(self, http_ok: bool) -> AnalysisResult {
        let status = match self.status.as_deref() {
            Some("success") if http_ok => AnalysisStatus::Success,
            _ => AnalysisStatus::Error,
        };

        AnalysisResult {
            status,
            analysis_type: self.analysis_type.unwrap_or_default(),
            result: self.result,
            document_name: self.document_name,
            document_length: self.document_length.or(self.document_size),
            compliance: self.legal_bert_validation.or(self.compliance),
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_mapping() {
        assert_eq!(ComplianceStatus::Valid.label(), "Valid");
        assert_eq!(
            ComplianceStatus::ReviewRecommended.label(),
            "Review Recommended"
        );
        assert_eq!(ComplianceStatus::Flagged.label(), "Compliance Issues");
        assert_eq!(ComplianceStatus::Unknown.label(), "Unknown");
    }

    #[test]
    fn test_status_label_fallback_replaces_underscores() {
        let status = ComplianceStatus::from("needs_legal_review".to_string());
        assert_eq!(status, ComplianceStatus::Other("needs_legal_review".into()));
        assert_eq!(status.label(), "Needs legal review");
        assert_eq!(ComplianceStatus::Other(String::new()).label(), "");
    }

    #[test]
    fn test_status_css_class() {
        assert_eq!(ComplianceStatus::Valid.css_class(), "text-success");
        assert_eq!(ComplianceStatus::ReviewRecommended.css_class(), "text-warning");
        assert_eq!(ComplianceStatus::Flagged.css_class(), "text-danger");
        assert_eq!(ComplianceStatus::Other("x".into()).css_class(), "text-danger");
    }

    #[test]
    fn test_score_tier_boundaries() {
        assert_eq!(ScoreTier::from_score(1.0), ScoreTier::High);
        assert_eq!(ScoreTier::from_score(0.7), ScoreTier::High);
        assert_eq!(ScoreTier::from_score(0.6999), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(0.4), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_score(0.3999), ScoreTier::Low);
        assert_eq!(ScoreTier::from_score(0.0), ScoreTier::Low);
    }

    #[test]
    fn test_score_tier_partition_is_exhaustive() {
        for step in 0..=1000 {
            let score = step as f64 / 1000.0;
            let tier = ScoreTier::from_score(score);
            let expected = if score >= 0.7 {
                "high"
            } else if score >= 0.4 {
                "medium"
            } else {
                "low"
            };
            assert_eq!(tier.as_str(), expected, "score {}", score);
        }
    }

    #[test]
    fn test_envelope_aliases_resolved() {
        let json = r#"{
            "status": "success",
            "analysis_type": "summary",
            "result": "ok",
            "document_size": 1200,
            "compliance": {"compliance_status": "valid", "compliance_score": 0.9}
        }"#;
        let raw: RawAnalysisResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_result(true);
        assert!(result.is_success());
        assert_eq!(result.document_length, Some(1200));
        let compliance = result.compliance.unwrap();
        assert_eq!(compliance.compliance_status, ComplianceStatus::Valid);
        assert!(compliance.legal_terms_found.is_empty());
        assert_eq!(compliance.red_flags_count, 0);
    }

    #[test]
    fn test_envelope_tolerates_nulls_and_float_counts() {
        let json = r#"{
            "status": "success",
            "analysis_type": "risks",
            "result": "ok",
            "document_length": 1200.0,
            "legal_bert_validation": {
                "compliance_status": null,
                "compliance_score": null,
                "legal_terms_found": null,
                "red_flags_count": 3.0
            }
        }"#;
        let raw: RawAnalysisResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_result(true);
        assert!(result.is_success());
        assert_eq!(result.document_length, Some(1200));

        let compliance = result.compliance.unwrap();
        assert_eq!(compliance.compliance_status, ComplianceStatus::Unknown);
        assert_eq!(compliance.compliance_score, 0.0);
        assert!(compliance.legal_terms_found.is_empty());
        assert_eq!(compliance.red_flags_count, 3);
    }

    #[test]
    fn test_envelope_null_length_falls_back_to_size() {
        let raw: RawAnalysisResponse = serde_json::from_str(
            r#"{"status": "success", "document_length": null, "document_size": 42}"#,
        )
        .unwrap();
        assert_eq!(raw.into_result(true).document_length, Some(42));
    }

    #[test]
    fn test_envelope_prefers_primary_aliases() {
        let json = r#"{
            "status": "success",
            "document_length": 10,
            "document_size": 20,
            "legal_bert_validation": {"compliance_status": "flagged"},
            "compliance": {"compliance_status": "valid"}
        }"#;
        let raw: RawAnalysisResponse = serde_json::from_str(json).unwrap();
        let result = raw.into_result(true);
        assert_eq!(result.document_length, Some(10));
        assert_eq!(
            result.compliance.unwrap().compliance_status,
            ComplianceStatus::Flagged
        );
    }

    #[test]
    fn test_non_success_envelopes_are_errors() {
        let raw: RawAnalysisResponse =
            serde_json::from_str(r#"{"status": "error", "message": "bad file"}"#).unwrap();
        let result = raw.into_result(true);
        assert_eq!(result.status, AnalysisStatus::Error);
        assert_eq!(result.message.as_deref(), Some("bad file"));

        let raw: RawAnalysisResponse =
            serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert_eq!(raw.into_result(false).status, AnalysisStatus::Error);
    }

    #[test]
    fn test_unknown_status_code_survives_serialization() {
        let report = ComplianceReport {
            compliance_status: ComplianceStatus::Other("pending_review".into()),
            compliance_score: 0.5,
            legal_terms_found: vec!["lien".into()],
            red_flags_count: 1,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"compliance_status\":\"pending_review\""));
        let parsed: ComplianceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
