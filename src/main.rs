use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use scenaria_artifact::FsStore;
use scenaria_client::ServiceClient;
use scenaria_config::{Catalog, HarnessConfig};
use scenaria_runner::{ConsoleNotifier, RunError, SuiteRunner};

const EXIT_FATAL: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

/// Scenaria - scenario regression runs against a document/chat service
#[derive(Parser)]
#[command(name = "scenaria")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Suite file (JSON). Defaults to the builtin suites.
  #[arg(long, global = true)]
  suites: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run every case of one component's suite
  Run {
    /// Component name selecting the suite, e.g. generate_without_context
    component: String,

    #[command(flatten)]
    overrides: ConfigOverrides,
  },

  /// List the available suites
  List,
}

#[derive(Args)]
struct ConfigOverrides {
  /// Harness config file (JSON)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Service address, e.g. http://localhost:8000
  #[arg(long)]
  base_url: Option<String>,

  /// Session id shared by every case
  #[arg(long)]
  session_id: Option<String>,

  /// Per-request timeout in seconds
  #[arg(long)]
  timeout_secs: Option<u64>,

  /// Root directory for result artifacts
  #[arg(long)]
  output_root: Option<PathBuf>,

  /// Also write summary.json next to the artifacts
  #[arg(long)]
  summary: bool,

  /// Only HTTP-level failures count; ignore the body's status field
  #[arg(long)]
  lenient_status: bool,
}

fn main() -> ExitCode {
  init_logging();
  let cli = Cli::parse();

  match run(cli) {
    Ok(code) => ExitCode::from(code),
    Err(e) => {
      if let Some(RunError::Cancelled { .. }) = e.downcast_ref::<RunError>() {
        eprintln!("interrupted: {:#}", e);
        return ExitCode::from(EXIT_INTERRUPTED);
      }
      eprintln!("error: {:#}", e);
      ExitCode::from(EXIT_FATAL)
    }
  }
}

fn init_logging() {
  // stdout carries progress lines, logs go to stderr
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
}

fn run(cli: Cli) -> Result<u8> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    let catalog = load_catalog(cli.suites.as_deref()).await?;

    match cli.command {
      Some(Commands::Run {
        component,
        overrides,
      }) => run_suite(catalog, component, overrides).await,
      Some(Commands::List) => {
        list_suites(&catalog);
        Ok(0)
      }
      None => {
        println!("scenaria - use --help to see available commands");
        Ok(0)
      }
    }
  })
}

async fn run_suite(catalog: Catalog, component: String, overrides: ConfigOverrides) -> Result<u8> {
  let config = load_config(overrides).await?;
  tracing::info!(
    base_url = %config.base_url,
    output_root = %config.output_root.display(),
    "loaded harness config"
  );

  let client = ServiceClient::new(&config.base_url, config.timeout())
    .context("failed to create service client")?;
  let store = FsStore::new(&config.output_root);

  let runner = SuiteRunner::new(config, catalog, Arc::new(client), Arc::new(store))
    .with_notifier(Arc::new(ConsoleNotifier));

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      on_interrupt.cancel();
    }
  });

  let report = runner
    .run_suite(&component, cancel)
    .await
    .with_context(|| format!("suite '{}' aborted", component))?;

  Ok(report.exit_code())
}

fn list_suites(catalog: &Catalog) {
  for suite in &catalog.suites {
    println!(
      "{} ({} cases) {}",
      suite.component_name,
      suite.cases.len(),
      suite.description
    );
  }
}

async fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
  let Some(path) = path else {
    return Ok(Catalog::builtin());
  };

  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read suite file: {}", path.display()))?;

  let mut catalog = Catalog::from_json(&content)
    .with_context(|| format!("failed to parse suite file: {}", path.display()))?;

  // Document paths are relative to the suite file.
  let base = path.parent().unwrap_or_else(|| Path::new("."));
  for suite in &mut catalog.suites {
    for document in &mut suite.documents {
      if document.is_relative() {
        *document = base.join(&*document);
      }
    }
  }

  Ok(catalog)
}

async fn load_config(overrides: ConfigOverrides) -> Result<HarnessConfig> {
  let mut config = match &overrides.config {
    Some(path) => {
      let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
      HarnessConfig::from_json(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?
    }
    None => HarnessConfig::default(),
  };

  if let Some(base_url) = overrides.base_url {
    config.base_url = base_url;
  }
  if let Some(session_id) = overrides.session_id {
    config.session_id = session_id;
  }
  if let Some(timeout) = overrides.timeout_secs {
    config.timeout_seconds = timeout;
  }
  if let Some(output_root) = overrides.output_root {
    config.output_root = output_root;
  }
  if overrides.summary {
    config.write_summary = true;
  }
  if overrides.lenient_status {
    config.strict_status = false;
  }

  config.validate().context("invalid harness config")?;
  Ok(config)
}
