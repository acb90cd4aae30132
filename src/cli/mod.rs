//! Command-line interface.

mod analyze;
mod history;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::analysis::AnalysisClient;
use crate::config::{self, Settings};
use crate::history::{FileStore, HistoryStore, HttpHistoryStore, RemoteHistoryStore};

/// Legal document analysis from the command line.
#[derive(Parser, Debug)]
#[command(name = "lexai", version, about)]
pub struct Cli {
    /// Analysis service base URL
    #[arg(long, global = true, env = "LEXAI_API_URL")]
    api_url: Option<String>,

    /// Data directory holding the local history
    #[arg(long, global = true, env = "LEXAI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Remote history store base URL
    #[arg(long, global = true, env = "LEXAI_HISTORY_URL")]
    history_url: Option<String>,

    /// Signed-in user id (enables the remote history store)
    #[arg(long, global = true, env = "LEXAI_USER_ID")]
    user_id: Option<String>,

    /// Bearer token for the remote history store
    #[arg(long, global = true, env = "LEXAI_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a document for analysis
    Analyze(analyze::AnalyzeArgs),
    /// Analyze pasted text
    AnalyzeText(analyze::AnalyzeTextArgs),
    /// Browse and export past analyses
    History {
        #[command(subcommand)]
        command: history::HistoryCommand,
    },
    /// List known analysis types
    Types,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = config::load_settings().await;
    cli.apply_to_settings(&mut settings);
    tracing::debug!(api_url = %settings.api_url, data_dir = %settings.data_dir.display(), "settings loaded");

    match cli.command {
        Commands::Analyze(args) => analyze::run_document(&settings, args).await,
        Commands::AnalyzeText(args) => analyze::run_text(&settings, args).await,
        Commands::History { command } => history::run(&settings, command),
        Commands::Types => {
            for (code, label) in crate::render::KNOWN_ANALYSIS_TYPES {
                println!("{:<15} {}", code, label);
            }
            Ok(())
        }
    }
}

impl Cli {
    fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(ref dir) = self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(ref url) = self.history_url {
            settings.history_url = Some(url.clone());
        }
        if let Some(ref user_id) = self.user_id {
            settings.user_id = Some(user_id.clone());
        }
        if let Some(ref token) = self.auth_token {
            settings.auth_token = Some(token.clone());
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "lexai=debug" } else { "lexai=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Analysis client built from settings.
fn analysis_client(settings: &Settings) -> anyhow::Result<AnalysisClient> {
    Ok(AnalysisClient::new(
        &settings.api_url,
        &settings.user_agent,
        settings.timeout(),
    )?)
}

/// History store over the data directory, with the remote store when configured.
fn history_store(settings: &Settings, client: Option<&AnalysisClient>) -> HistoryStore {
    let local = Arc::new(FileStore::new(settings.data_dir.clone()));
    let remote = match (&settings.history_url, client) {
        (Some(url), Some(client)) => Some(
            Arc::new(HttpHistoryStore::new(client.http().clone(), url)) as Arc<dyn RemoteHistoryStore>,
        ),
        _ => None,
    };
    HistoryStore::new(local, remote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from([
            "lexai",
            "analyze",
            "lease.pdf",
            "--type",
            "risks",
            "--user-id",
            "uid-1",
        ])
        .unwrap();
        assert_eq!(cli.user_id.as_deref(), Some("uid-1"));
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.file, PathBuf::from("lease.pdf"));
                assert_eq!(args.output.analysis_type.as_deref(), Some("risks"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::try_parse_from([
            "lexai",
            "--api-url",
            "https://lexai.example.com",
            "--data-dir",
            "/tmp/lexai-cli",
            "types",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_to_settings(&mut settings);
        assert_eq!(settings.api_url, "https://lexai.example.com");
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/lexai-cli"));
    }
}
