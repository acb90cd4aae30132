//! `analyze` and `analyze-text` commands.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::render;
use crate::submit::{Orchestrator, RenderedAnalysis, Submission, SubmissionState};

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Analysis type (summary, key_points, risks, parties, definitions, comprehensive)
    #[arg(short = 't', long = "type")]
    pub analysis_type: Option<String>,

    /// Write the rendered report page to this HTML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export the analysis as a text file into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Document to analyze (txt, pdf, doc, docx, rtf)
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct AnalyzeTextArgs {
    /// Text to analyze
    pub text: Option<String>,

    /// Read the text from stdin
    #[arg(long, conflicts_with = "text")]
    pub stdin: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn run_document(settings: &Settings, args: AnalyzeArgs) -> anyhow::Result<()> {
    let submission = Submission::document(args.file, args.output.analysis_type.clone());
    submit(settings, submission, &args.output).await
}

pub async fn run_text(settings: &Settings, args: AnalyzeTextArgs) -> anyhow::Result<()> {
    let text = if args.stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read text from stdin")?;
        buf
    } else {
        args.text.unwrap_or_default()
    };

    let submission = Submission::text(text, args.output.analysis_type.clone());
    submit(settings, submission, &args.output).await
}

async fn submit(
    settings: &Settings,
    submission: Submission,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let client = super::analysis_client(settings)?;
    let history = super::history_store(settings, Some(&client));
    let spinner = loading_spinner();

    let observer_spinner = spinner.clone();
    let mut orchestrator = Orchestrator::new(&client, &history, settings.auth_state())
        .with_max_upload_bytes(settings.max_upload_bytes)
        .with_observer(move |state| match state {
            SubmissionState::Loading => {
                observer_spinner.set_message("Analyzing...");
                observer_spinner.enable_steady_tick(Duration::from_millis(120));
            }
            _ => observer_spinner.finish_and_clear(),
        });

    let state = match orchestrator.submit(submission).await {
        Ok(state) => state,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", style("warning:").yellow().bold(), e);
            bail!("{}", e);
        }
    };

    match state {
        SubmissionState::Success(rendered) => {
            print_analysis(rendered);
            if let Some(ref path) = output.output {
                write_page(path, rendered)?;
            }
            if let Some(ref dir) = output.export {
                write_export(dir, &rendered.export_filename, &rendered.plain_text)?;
            }
            Ok(())
        }
        SubmissionState::Error(message) => {
            eprintln!("{} {}", style("error:").red().bold(), message);
            if let Some(ref path) = output.output {
                let page = render::base_template("Analysis failed", &render::error_panel(message));
                write_html(path, &page)?;
            }
            bail!("analysis failed: {}", message)
        }
        SubmissionState::Idle | SubmissionState::Loading => {
            bail!("submission ended in unexpected state {}", state.name())
        }
    }
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner
}

fn print_analysis(rendered: &RenderedAnalysis) {
    let result = &rendered.result;
    let mut header = format!(
        "{}  {}",
        style(&rendered.display_name).bold(),
        style(render::analysis_type_label(&result.analysis_type)).cyan()
    );
    if let Some(len) = result.document_length {
        header.push_str(&format!("  {}", style(format!("{} characters", len)).dim()));
    }
    println!("{}\n", header);
    print!("{}", rendered.plain_text);
}

fn write_page(path: &Path, rendered: &RenderedAnalysis) -> anyhow::Result<()> {
    let page = render::base_template(&rendered.display_name, &rendered.panel_html);
    write_html(path, &page)
}

fn write_html(path: &Path, page: &str) -> anyhow::Result<()> {
    std::fs::write(path, page)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    eprintln!("{} {}", style("report written:").green(), path.display());
    Ok(())
}

/// Write an exported analysis into `dir`, returning the file path.
pub(super) fn write_export(dir: &Path, filename: &str, text: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, text)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    eprintln!("{} {}", style("analysis exported:").green(), path.display());
    Ok(path)
}
