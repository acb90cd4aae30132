//! Display labels for analysis type codes.

/// Analysis types the service documents, with their display labels.
pub const KNOWN_ANALYSIS_TYPES: &[(&str, &str)] = &[
    ("summary", "Summary"),
    ("key_points", "Key Points"),
    ("risks", "Risk Analysis"),
    ("parties", "Parties"),
    ("definitions", "Definitions"),
    ("comprehensive", "Comprehensive"),
];

/// Analysis type sent when none is chosen.
pub const DEFAULT_ANALYSIS_TYPE: &str = "summary";

/// Label for an analysis type code.
///
/// Unknown codes only get their first character capitalized; underscores are
/// kept, unlike the compliance status fallback.
pub fn analysis_type_label(code: &str) -> String {
    if let Some((_, label)) = KNOWN_ANALYSIS_TYPES.iter().find(|(known, _)| *known == code) {
        return (*label).to_string();
    }

    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(analysis_type_label("summary"), "Summary");
        assert_eq!(analysis_type_label("key_points"), "Key Points");
        assert_eq!(analysis_type_label("risks"), "Risk Analysis");
        assert_eq!(analysis_type_label("parties"), "Parties");
        assert_eq!(analysis_type_label("definitions"), "Definitions");
        assert_eq!(analysis_type_label("comprehensive"), "Comprehensive");
    }

    #[test]
    fn test_fallback_keeps_underscores() {
        assert_eq!(analysis_type_label("unknown_code_x"), "Unknown_code_x");
        assert_eq!(analysis_type_label("éclair"), "Éclair");
    }

    #[test]
    fn test_empty_code() {
        assert_eq!(analysis_type_label(""), "");
    }
}
