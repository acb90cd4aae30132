//! HTML templates for the results panel and standalone report pages.

use crate::models::AnalysisResult;

use super::compliance::render_compliance;
use super::html_escape;
use super::labels::analysis_type_label;
use super::markup::format_analysis;

/// Error text used when the service reports a failure without a message.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred during analysis";

/// Inner content of the results panel: formatted body plus compliance block.
pub fn analysis_content(result: &AnalysisResult) -> String {
    let mut content = format_analysis(result.result.as_deref());
    content.push_str(&render_compliance(result.compliance.as_ref()));
    content
}

/// Render the full results panel for a successful analysis.
pub fn result_panel(result: &AnalysisResult, display_name: &str) -> String {
    let length_badge = result
        .document_length
        .map(|len| format!(r#"<span class="document-length">{} characters</span>"#, len))
        .unwrap_or_default();

    format!(
        r#"
    <section id="analysisResults" class="analysis-results">
        <header class="analysis-header">
            <span class="badge document-name">{}</span>
            <span class="badge analysis-type">{}</span>
            {}
        </header>
        <div id="analysisContent" class="analysis-content">{}</div>
    </section>
    "#,
        html_escape(display_name),
        html_escape(&analysis_type_label(&result.analysis_type)),
        length_badge,
        analysis_content(result)
    )
}

/// Render the error panel.
pub fn error_panel(message: &str) -> String {
    format!(
        r#"
    <section id="analysisError" class="analysis-error">
        <h3>Analysis failed</h3>
        <p id="errorMessage">{}</p>
    </section>
    "#,
        html_escape(message)
    )
}

/// Wrap rendered content in a standalone page.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - LexAI</title>
    <style>{css}</style>
</head>
<body>
    <main>
        <h1>{title}</h1>
        {content}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        css = CSS,
        content = content
    )
}

/// Minimal styles for report pages.
pub const CSS: &str = r#"
body { font-family: system-ui, sans-serif; color: #222; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; }
.badge { display: inline-block; padding: 0.2em 0.6em; border-radius: 0.3em; background: #eee; margin-right: 0.4em; }
.bg-secondary { background: #6c757d; color: #fff; }
.analysis-header { margin-bottom: 1rem; }
.document-length { color: #666; font-size: 0.9em; }
.progress { width: 120px; height: 24px; background: #e9ecef; border-radius: 0.3em; overflow: hidden; }
.progress-bar { height: 100%; color: #fff; text-align: center; line-height: 24px; }
.bg-success { background: #198754; }
.bg-warning { background: #ffc107; color: #222; }
.bg-danger { background: #dc3545; }
.text-success { color: #198754; }
.text-warning { color: #b58100; }
.text-danger { color: #dc3545; }
.compliance-summary { display: flex; justify-content: space-between; align-items: center; }
.red-flags.warning { color: #b58100; }
.red-flags.ok { color: #666; }
.analysis-error { border-left: 4px solid #dc3545; padding-left: 1rem; }
"#;
