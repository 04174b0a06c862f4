//! Rauth - session verification cache and revocation tracker
//!
//! Main entry point for the Rauth CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, health, verify, webhook};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Rauth - session verification cache and revocation tracker
#[derive(Parser)]
#[command(name = "rauth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to the TOML config file
    #[arg(short, long, global = true, env = "RAUTH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the session API is reachable
    Health(health::HealthArgs),

    /// Verify a session token for a phone number
    Verify(verify::VerifyArgs),

    /// Replay webhook events from a file
    Webhook(webhook::WebhookArgs),

    /// Show the resolved configuration
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let ctx = commands::Context::load(cli.config, cli.json, cli.verbose)?;

    match cli.command {
        Commands::Health(args) => health::run(args, &ctx).await,
        Commands::Verify(args) => verify::run(args, &ctx).await,
        Commands::Webhook(args) => webhook::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
/// `RUST_LOG` overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool, log_json: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_filter = if verbose {
        "rauth=debug,rauth_session=debug,rauth_client=debug,rauth_config=debug,info"
    } else {
        "rauth=info,rauth_session=info,rauth_client=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json_layer = log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!log_json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
