//! `history` commands over the local history list.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Subcommand;
use console::style;

use crate::config::Settings;
use crate::models::{AnalysisResult, AnalysisStatus, HistoryEntry};
use crate::render;

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List recent analyses, newest first
    List {
        /// Maximum number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Show one analysis
    Show {
        /// Entry id (from `history list`)
        id: String,
        /// Write the rendered report page to this HTML file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one analysis as a text file
    Export {
        /// Entry id (from `history list`)
        id: String,
        /// Directory to write the export into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

pub fn run(settings: &Settings, command: HistoryCommand) -> anyhow::Result<()> {
    let history = super::history_store(settings, None);

    match command {
        HistoryCommand::List { limit } => {
            let entries = history.local_entries();
            if entries.is_empty() {
                println!("No analyses in local history.");
                return Ok(());
            }
            for entry in entries.iter().take(limit) {
                println!(
                    "{}  {}  {:<30}  {}",
                    style(entry.id()).dim(),
                    entry.timestamp().format("%Y-%m-%d %H:%M"),
                    entry.filename(),
                    style(render::analysis_type_label(entry.analysis_type())).cyan()
                );
            }
            Ok(())
        }
        HistoryCommand::Show { id, output } => {
            let entry = find(&history, &id)?;
            let result = entry_result(&entry);
            print!("{}", render::plain_text(&render::analysis_content(&result)));

            if let Some(path) = output {
                let page = render::base_template(
                    entry.filename(),
                    &render::result_panel(&result, entry.filename()),
                );
                std::fs::write(&path, page)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
                eprintln!("{} {}", style("report written:").green(), path.display());
            }
            Ok(())
        }
        HistoryCommand::Export { id, dir } => {
            let entry = find(&history, &id)?;
            let result = entry_result(&entry);
            let text = render::plain_text(&render::analysis_content(&result));
            let filename = render::export_filename(Some(entry.filename()), entry.analysis_type());
            super::analyze::write_export(&dir, &filename, &text)?;
            Ok(())
        }
    }
}

fn find(history: &crate::history::HistoryStore, id: &str) -> anyhow::Result<HistoryEntry> {
    history
        .find(id)
        .ok_or_else(|| anyhow!("no analysis with id {} in local history", id))
}

/// Rebuild a displayable result from a stored entry.
fn entry_result(entry: &HistoryEntry) -> AnalysisResult {
    AnalysisResult {
        status: AnalysisStatus::Success,
        analysis_type: entry.analysis_type().to_string(),
        result: Some(entry.result().to_string()),
        document_name: Some(entry.filename().to_string()),
        document_length: None,
        compliance: entry.compliance().cloned(),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplianceReport, ComplianceStatus};
    use chrono::Utc;

    #[test]
    fn test_entry_result_keeps_stored_fields() {
        let stored = AnalysisResult {
            status: AnalysisStatus::Success,
            analysis_type: "risks".into(),
            result: Some("Risk: **High**".into()),
            document_name: Some("lease.pdf".into()),
            document_length: Some(10),
            compliance: Some(ComplianceReport {
                compliance_status: ComplianceStatus::Valid,
                compliance_score: 0.9,
                legal_terms_found: vec![],
                red_flags_count: 0,
            }),
            message: None,
        };
        let entry = HistoryEntry::from_result(&stored, Utc::now());
        let rebuilt = entry_result(&entry);

        assert_eq!(rebuilt.analysis_type, "risks");
        assert_eq!(rebuilt.result.as_deref(), Some("Risk: **High**"));
        assert_eq!(rebuilt.document_name.as_deref(), Some("lease.pdf"));
        assert_eq!(rebuilt.compliance, stored.compliance);
    }
}
