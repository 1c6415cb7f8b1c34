use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use docket::cli::{commands, prompt::TerminalConfirm, shell};
use docket::config::{ClientConfig, FileSettings};
use docket::confirm::{AssumeYes, Confirm};
use docket::Workbench;

#[derive(Parser)]
#[command(name = "docket")]
#[command(
  about = "Docket - Requested-Document Classifier\nAnalyze requested documents, confirm departments and manage history"
)]
#[command(version)]
struct Cli {
  /// Base URL of the classification service
  #[arg(long, env = "DOCKET_SERVER_URL", global = true)]
  server_url: Option<String>,

  /// Request timeout in seconds (0 or unset waits indefinitely)
  #[arg(long, env = "DOCKET_TIMEOUT_SECS", global = true)]
  timeout_secs: Option<u64>,

  /// Config file (defaults to <config dir>/docket/config.yaml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Answer yes to every confirmation
  #[arg(short, long, global = true)]
  yes: bool,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Interactive session (the default)
  Shell,
  /// Analyze a requested document and print the result
  Analyze {
    /// Document text; read from stdin when omitted
    text: Vec<String>,
  },
  /// Manage the analysis history
  History {
    #[command(subcommand)]
    action: HistoryAction,
  },
}

#[derive(Subcommand)]
enum HistoryAction {
  /// List every history record
  List,
  /// Show one record in full
  Show { id: String },
  /// Delete one record
  Delete { id: String },
  /// Delete every record
  Clear,
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("docket=debug,warn")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docket=warn,warn"))
  };

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

async fn handle(cli: Cli) -> Result<()> {
  let file = FileSettings::load_from(cli.config.as_deref())?;
  let config = ClientConfig::resolve(cli.server_url.as_deref(), cli.timeout_secs, &file)?;
  tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "configuration resolved");

  let mut workbench = Workbench::connect(config)?;
  let confirm: Box<dyn Confirm> =
    if cli.yes { Box::new(AssumeYes) } else { Box::new(TerminalConfirm) };

  match cli.command.unwrap_or(Command::Shell) {
    Command::Shell => shell::run(&mut workbench, confirm.as_ref()).await,
    Command::Analyze { text } => commands::analyze(&mut workbench, &text).await,
    Command::History { action } => match action {
      HistoryAction::List => commands::list_history(&mut workbench).await,
      HistoryAction::Show { id } => commands::inspect_history(&mut workbench, &id).await,
      HistoryAction::Delete { id } => {
        commands::delete_history(&mut workbench, &id, confirm.as_ref()).await
      }
      HistoryAction::Clear => commands::clear_history(&mut workbench, confirm.as_ref()).await,
    },
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  handle(cli).await
}
