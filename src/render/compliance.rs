//! Compliance validation section of the results panel.

use crate::models::ComplianceReport;

use super::html_escape;

/// Render the compliance block, or nothing when the result has no report.
pub fn render_compliance(report: Option<&ComplianceReport>) -> String {
    let report = match report {
        Some(r) => r,
        None => return String::new(),
    };

    let status_class = report.compliance_status.css_class();
    let status_label = html_escape(&report.compliance_status.label());
    let tier = report.tier();
    let percent = report.compliance_score * 100.0;

    let terms_section = if report.legal_terms_found.is_empty() {
        String::new()
    } else {
        let badges: String = report
            .legal_terms_found
            .iter()
            .map(|term| {
                format!(
                    r#"<span class="badge bg-secondary me-2 mb-1">{}</span>"#,
                    html_escape(term)
                )
            })
            .collect();
        format!(
            r#"
                <h6 class="mb-2 mt-3">Legal Terms Identified:</h6>
                <div class="mb-3 legal-terms">{}</div>"#,
            badges
        )
    };

    let red_flags = if report.red_flags_count > 0 {
        format!(
            r#"<p class="red-flags warning">{} potential red flags identified</p>"#,
            report.red_flags_count
        )
    } else {
        r#"<p class="red-flags ok">No red flags detected</p>"#.to_string()
    };

    format!(
        r#"
        <hr>
        <section class="compliance-section mt-4">
            <h5 class="mb-3">Compliance Validation</h5>
            <div class="compliance-summary">
                <div>
                    <h6 class="mb-1">Compliance Status:</h6>
                    <span class="badge {status_class}">{status_label}</span>
                </div>
                <div class="text-end">
                    <h6 class="mb-1">Compliance Score:</h6>
                    <div class="progress">
                        <div class="progress-bar {tier_class}" data-tier="{tier}" role="progressbar" style="width: {width}%" aria-valuenow="{width}" aria-valuemin="0" aria-valuemax="100">{rounded}%</div>
                    </div>
                </div>
            </div>{terms_section}
            <div class="mt-2">{red_flags}</div>
        </section>
        "#,
        status_class = status_class,
        status_label = status_label,
        tier_class = tier.css_class(),
        tier = tier.as_str(),
        width = bar_width(percent),
        rounded = rounded_percent(percent),
        terms_section = terms_section,
        red_flags = red_flags,
    )
}

/// Score label in whole percent; never prints `-0`.
fn rounded_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.round() + 0.0
}

/// Bar width in percent, clamped to the bar and trimmed to two decimals.
fn bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    (percent.clamp(0.0, 100.0) * 100.0).round() / 100.0
}
