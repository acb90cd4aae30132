//! Rendering of analysis results into HTML panels and plain-text exports.

pub mod compliance;
pub mod export;
pub mod labels;
pub mod markup;
pub mod panel;

pub use compliance::render_compliance;
pub use export::{export_filename, plain_text};
pub use labels::{analysis_type_label, DEFAULT_ANALYSIS_TYPE, KNOWN_ANALYSIS_TYPES};
pub use markup::format_analysis;
pub use panel::{analysis_content, base_template, error_panel, result_panel};

/// Escape text for HTML content and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }
}
