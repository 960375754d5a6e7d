//! Command-line front end for the release resolution pipeline.

mod error;

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use exn::ResultExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use sznjd_cache::{FileStore, MemoryStore, StoreHandle};
use sznjd_config::{CacheBackend, Config, FailureMode};
use sznjd_extract::{Normalizer, TitleFormat};
use sznjd_resolve::{Candidates, HttpPageSource, OverrideTable, ReleasePipeline};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sznjd", version, about = "Resolve curated release recommendations into torrent records")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "SZNJD_CONFIG")]
    config: Option<PathBuf>,

    /// More logging; repeat for more detail (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an entry's recommended links into release records (JSON)
    Resolve(ResolveArgs),
    /// Print the canonical form of release titles
    Normalize {
        #[arg(required = true)]
        titles: Vec<String>,
        /// Title format (defaults to the configured one)
        #[arg(short, long)]
        format: Option<TitleFormat>,
        /// Print the extracted fields as JSON instead
        #[arg(long)]
        fields: bool,
    },
    /// Record a manual title for a release
    Override {
        id: u64,
        title: String,
        /// Override file (defaults to the configured one)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Newline-separated preferred release links
    #[arg(long, default_value = "")]
    best: String,
    /// Newline-separated alternative release links
    #[arg(long, default_value = "")]
    alt: String,
    /// JSON file holding an aggregator entry (`-` reads standard input)
    #[arg(long, conflicts_with_all = ["best", "alt"])]
    entry: Option<PathBuf>,
    /// Skip releases that fail instead of failing the whole entry
    #[arg(long)]
    isolated: bool,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("could not start runtime: {err}");
            return ExitCode::FAILURE;
        },
    };
    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(err.exit_code())
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    debug!(?config, "configuration loaded");
    match cli.command {
        Command::Resolve(args) => resolve(&config, args).await,
        Command::Normalize { titles, format, fields } => {
            normalize(&titles, format.unwrap_or(config.title_format), fields)
        },
        Command::Override { id, title, file } => {
            let path = file.or(config.overrides).ok_or_else(|| exn::Exn::from(ErrorKind::NoOverrideFile))?;
            record_override(&path, id, &title).await
        },
    }
}

fn candidates(args: &ResolveArgs) -> Result<Candidates> {
    let Some(entry) = &args.entry else {
        return Ok(Candidates::new(args.best.replace("\\n", "\n"), args.alt.replace("\\n", "\n")));
    };
    let json = if entry.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).or_raise(|| ErrorKind::Input)?
    } else {
        std::fs::read_to_string(entry).or_raise(|| ErrorKind::Input)?
    };
    serde_json::from_str(&json).or_raise(|| ErrorKind::Input)
}

fn store(config: &Config) -> Result<StoreHandle> {
    Ok(match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryStore::default()),
        CacheBackend::File => {
            let dir = config.cache_dir().ok_or_else(|| exn::Exn::from(ErrorKind::Cache))?;
            let dir = std::path::absolute(&dir).or_raise(|| ErrorKind::Cache)?;
            Arc::new(FileStore::new(dir).or_raise(|| ErrorKind::Cache)?)
        },
    })
}

async fn resolve(config: &Config, args: ResolveArgs) -> Result<()> {
    let candidates = candidates(&args)?;
    let overrides = match config.overrides.as_deref() {
        Some(path) => OverrideTable::load(path).await,
        None => OverrideTable::new(),
    };
    let source = HttpPageSource::new(&config.index.user_agent).or_raise(|| ErrorKind::Resolve)?;
    let mut pipeline =
        ReleasePipeline::from_config(config, store(config)?, Arc::new(source), overrides).or_raise(|| ErrorKind::Resolve)?;
    if args.isolated {
        pipeline = pipeline.with_failure_mode(FailureMode::Isolated);
    }
    let releases = pipeline.resolve(&candidates).await.or_raise(|| ErrorKind::Resolve)?;
    let json = serde_json::to_string_pretty(&releases).or_raise(|| ErrorKind::Output)?;
    writeln!(std::io::stdout(), "{json}").or_raise(|| ErrorKind::Output)
}

fn normalize(titles: &[String], format: TitleFormat, fields: bool) -> Result<()> {
    let normalizer = Normalizer::new(format);
    let mut stdout = std::io::stdout().lock();
    for title in titles {
        if fields {
            let json = serde_json::to_string(&normalizer.extract(title)).or_raise(|| ErrorKind::Output)?;
            writeln!(stdout, "{json}").or_raise(|| ErrorKind::Output)?;
        } else {
            writeln!(stdout, "{}", normalizer.normalize(title)).or_raise(|| ErrorKind::Output)?;
        }
    }
    Ok(())
}

async fn record_override(path: &Path, id: u64, title: &str) -> Result<()> {
    let previous = OverrideTable::record(path, id, title).await.or_raise(|| ErrorKind::Output)?;
    match previous {
        Some(previous) => info!(id, %previous, "replaced title override"),
        None => info!(id, "added title override"),
    }
    Ok(())
}
