//! NARC - Nexus Artifact Retainer/Cleaner
//!
//! The `narc` command keeps the last N versions of every artifact in a
//! Nexus repository and deletes the older ones.
//!
//! ## Commands
//!
//! - `maven`: clean a Maven (maven2) hosted repository

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use narc_core::{run_cleanup, KeepPolicy, LogConfig, RetentionConfig, RunSummary};
use nexus_rm::{NexusClient, NexusConfig};
use tracing::error;

#[derive(Parser)]
#[command(name = "narc")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Nexus Artifact Retainer/Cleaner (NARC) - keep last N versions in Nexus Maven Repository",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run maven cleaning
    Maven(MavenArgs),
}

#[derive(Args)]
struct MavenArgs {
    /// Maven repository name
    #[arg(long)]
    repository: String,

    /// Number of versions to keep. -1 means not delete anything
    #[arg(long, allow_negative_numbers = true)]
    keep: KeepPolicy,

    /// Nexus URL
    #[arg(long, env = "NEXUS_ROOT_URL", default_value = "http://localhost:8081")]
    url: String,

    /// Nexus username
    #[arg(long, env = "NEXUS_USER", default_value = "admin")]
    user: String,

    /// Nexus password
    #[arg(long, env = "NEXUS_PASS", default_value = "admin", hide_env_values = true)]
    password: String,

    /// Shows artifacts for deletion instead of actually deleting them
    #[arg(long)]
    dry_run: bool,

    /// Show debug logs
    #[arg(long)]
    debug: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,

    /// Append-only log file written alongside stdout
    #[arg(long, default_value = "narc.log")]
    log_file: PathBuf,

    /// Write the audit report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Maximum concurrent deletions within one artifact
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    delete_concurrency: u16,

    /// Timeout in seconds for each request to Nexus
    #[arg(long, default_value = "120")]
    timeout_secs: u64,
}

impl fmt::Debug for MavenArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MavenArgs")
            .field("repository", &self.repository)
            .field("keep", &self.keep)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("dry_run", &self.dry_run)
            .field("debug", &self.debug)
            .field("json_logs", &self.json_logs)
            .field("log_file", &self.log_file)
            .field("report", &self.report)
            .field("delete_concurrency", &self.delete_concurrency)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MavenArgs {
    fn log_config(&self) -> LogConfig {
        LogConfig {
            debug: self.debug,
            json: self.json_logs,
            log_file: Some(self.log_file.clone()),
        }
    }

    fn nexus_config(&self) -> NexusConfig {
        NexusConfig::new(&self.url)
            .with_credentials(&self.user, &self.password)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    fn retention_config(&self) -> RetentionConfig {
        let config = RetentionConfig::new(&self.repository, self.keep)
            .with_dry_run(self.dry_run)
            .with_delete_concurrency(usize::from(self.delete_concurrency));
        match &self.report {
            Some(path) => config.with_report_path(path),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Maven(args) => {
            narc_core::init_tracing(&args.log_config());
            run_maven(&args).await
        }
    }
}

/// Run the `maven` command and map a fatal error to exit status 1
async fn run_maven(args: &MavenArgs) -> ExitCode {
    match cmd_maven(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "cleanup aborted");
            ExitCode::FAILURE
        }
    }
}

/// Clean one Maven repository
async fn cmd_maven(args: &MavenArgs) -> Result<RunSummary> {
    let client = NexusClient::new(args.nexus_config()).context("Failed to create Nexus client")?;
    let config = args.retention_config();

    let report = run_cleanup(&client, &config)
        .await
        .context("Failed to run cleanup")?;
    Ok(report.summary)
}
