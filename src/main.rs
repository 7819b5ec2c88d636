//! logsetup: load a logger config, install it, and emit sample entries.
//!
//! ```text
//! logsetup --config app.toml            # install and emit one entry per level
//! logsetup --config app.toml --check    # validate, print resolved config
//! logsetup --config app.toml --watch    # reinstall on every file change
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use logsetup::config::{apply_updates, load_config, validate_config, ConfigWatcher, LogConfig};
use logsetup::logging::{init_logger, LoggerOptions};

#[derive(Parser)]
#[command(name = "logsetup")]
#[command(about = "Configure and exercise the process-wide structured logger", long_about = None)]
struct Cli {
    /// TOML file with a [logger] table.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured level.
    #[arg(short, long)]
    level: Option<String>,

    /// Override the configured encoding (json, console).
    #[arg(short, long)]
    encoding: Option<String>,

    /// Force colored level labels (console encoding only).
    #[arg(long)]
    color: bool,

    /// Validate and print the resolved configuration, then exit.
    #[arg(long)]
    check: bool,

    /// Re-initialize the logger whenever the config file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

impl Cli {
    fn resolve(&self) -> Result<LogConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => LogConfig::default(),
        };

        if let Some(level) = &self.level {
            config.level = level.clone();
        }
        if let Some(encoding) = &self.encoding {
            config.encoding = encoding.clone();
        }
        if self.color {
            config.color = true;
        }

        validate_config(&config).map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })?;
        Ok(config)
    }
}

fn emit_samples() {
    tracing::trace!("trace sample");
    tracing::debug!("debug sample");
    tracing::info!(component = "cli", "info sample");
    tracing::warn!(retries = 3, "warn sample");
    tracing::error!(error = "simulated", "error sample");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    if cli.check {
        // Surface build-time problems (bad destinations) without installing.
        LoggerOptions::from_config(&config)?.build()?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logger(&config)?;
    emit_samples();

    if let (true, Some(path)) = (cli.watch, &cli.config) {
        let (watcher, updates) = ConfigWatcher::new(path);
        let _watcher = watcher.run()?;

        let reloader = tokio::spawn(apply_updates(updates, init_logger));
        let mut ticker = tokio::time::interval(Duration::from_secs(5));

        loop {
            tokio::select! {
                _ = ticker.tick() => emit_samples(),
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        reloader.abort();
        tracing::info!("Stopped watching");
    }

    logsetup::logging::current().sync()?;
    Ok(())
}
