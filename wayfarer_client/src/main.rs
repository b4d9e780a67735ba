#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Wayfarer **
//! Terminal client for the Wayfarer exploration game server

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use env_logger::{Builder, Env, Target};
use log::info;

use wayfarer_client::config::Overrides;
use wayfarer_client::{ClientConfig, HttpGameApi, WAYFARER_VERSION, run_repl};

#[derive(Parser)]
#[command(author, version, about = "Explore a Wayfarer world from the terminal.")]
struct Cli {
    /// Configuration file (default: <config dir>/wayfarer/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Game server base url, e.g. http://localhost/api.
    #[arg(long)]
    server: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Go straight to the game without the backstory screen.
    #[arg(long)]
    skip_intro: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::resolve(
        cli.config.as_deref(),
        Overrides {
            server_url: cli.server,
            timeout_secs: cli.timeout,
            skip_intro: cli.skip_intro,
        },
    )
    .context("while loading configuration")?;
    init_logging(&config)?;
    info!("Start: wayfarer v{WAYFARER_VERSION} against {}", config.server_url);

    let api = HttpGameApi::new(&config.server_url, config.request_timeout())
        .context("while building the HTTP client")?;

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush().context("flushing stdout")?;
    println!("{:^84}", "WAYFARER".bright_yellow().underline());
    println!();

    run_repl(api, &config).await
}

/// `warn` unless `RUST_LOG` says otherwise; to the configured file if there is one.
fn init_logging(config: &ClientConfig) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(path) = &config.log_file {
        let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
