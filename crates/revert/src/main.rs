use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use revert_history::HistoryConfig;
use revert_resources::{DirStore, FileStore, MemoryStore};

mod replay;
mod script;

use replay::Replay;

/// Replays a script of file operations with undo/redo.
#[derive(Parser, Debug)]
#[command(name = "revert", version, about)]
struct Cli {
    /// Script to replay. Reads stdin when omitted or `-`.
    script: Option<PathBuf>,

    /// Operate on this directory instead of an in-memory store.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// JSON history config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum undo depth; overrides the config file and environment.
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn history_config(cli: &Cli) -> HistoryConfig {
    let config = match &cli.config {
        Some(path) => HistoryConfig::load_or_default(path),
        None => HistoryConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(depth) = cli.max_depth {
        config.max_depth = Some(depth);
        config.sanitize();
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let source = read_script(cli.script.as_ref())?;
    let commands = script::parse_script(&source).context("invalid script")?;

    let store: Box<dyn FileStore> = match &cli.dir {
        Some(dir) => Box::new(DirStore::open(dir).context("failed to open store directory")?),
        None => Box::new(MemoryStore::new()),
    };
    let config = history_config(&cli);
    tracing::info!(
        commands = commands.len(),
        max_depth = ?config.max_depth,
        "Replaying script"
    );

    let mut replay = Replay::new(store, config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (line, command) in commands {
        replay.run(line, command, &mut out)?;
    }

    let summary = replay.summary();
    tracing::debug!(
        files = ?replay.store().list().unwrap_or_default(),
        undo_len = replay.history().undo_len(),
        redo_len = replay.history().redo_len(),
        "Final state"
    );
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Replay finished"
    );
    if summary.needs_reconciliation > 0 {
        anyhow::bail!(
            "{} undo step(s) failed; the store may need manual reconciliation",
            summary.needs_reconciliation
        );
    }
    Ok(())
}
