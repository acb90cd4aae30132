//! Lightweight markup for analysis text.
//!
//! Paragraphs are separated by blank lines, single newlines are soft breaks,
//! and `**bold**` / `_italic_` are the only inline markers.

use std::sync::LazyLock;

use regex::Regex;

use super::html_escape;

/// Rendered when the service returned no analysis body.
pub const NO_RESULTS_PLACEHOLDER: &str = "<p>No analysis results available.</p>";

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold marker regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(.*?)_").expect("italic marker regex"));

/// Convert analysis text into HTML.
///
/// The text is escaped before markers are substituted, so service output never
/// reaches the page as raw markup.
pub fn format_analysis(text: Option<&str>) -> String {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return NO_RESULTS_PLACEHOLDER.to_string(),
    };

    let body = html_escape(&text.replace("\r\n", "\n"))
        .replace("\n\n", "</p><p>")
        .replace('\n', "<br>");
    let body = BOLD.replace_all(&body, "<strong>$1</strong>");
    let body = ITALIC.replace_all(&body, "<em>$1</em>");

    format!("<p>{}</p>", body)
}
