//! Plain-text export of rendered analyses.

use scraper::{Html, Node};

use super::labels::analysis_type_label;

/// Document name used in export filenames when the result has none.
pub const DEFAULT_DOCUMENT_NAME: &str = "Document";

/// Export filename: `{name up to the first dot}-{type label}-Analysis.txt`.
pub fn export_filename(document_name: Option<&str>, analysis_type: &str) -> String {
    let name = document_name.unwrap_or(DEFAULT_DOCUMENT_NAME);
    let stem = name.split('.').next().unwrap_or_default();
    format!("{}-{}-Analysis.txt", stem, analysis_type_label(analysis_type))
}

/// Strip markup from rendered HTML.
///
/// `<br>` becomes a newline and each paragraph after the first starts on a new
/// line; template indentation is dropped.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::new();
    let mut seen_paragraph = false;

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push('\n'),
            Node::Element(el) if matches!(el.name(), "p" | "h5" | "h6" | "div" | "hr") => {
                if seen_paragraph {
                    raw.push('\n');
                }
                seen_paragraph = true;
            }
            _ => {}
        }
    }

    let mut out = String::new();
    let mut blank = false;
    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            blank = !out.is_empty();
            continue;
        }
        if blank {
            out.push('\n');
            blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
