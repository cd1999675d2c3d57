//! CLI entry point for TaskPilot.
//!
//! This binary provides the `taskpilot` command with subcommands for
//! serving the web UI, chatting in the terminal, and checking status.

mod cli;
mod config;
mod repl;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskpilot_web::{AppState, WebServer};

use crate::cli::{Cli, Commands};
use crate::config::{AppConfig, load_config, resolve_llm_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(match cli.command {
        Commands::Serve { .. } => "info",
        Commands::Run { .. } | Commands::Status => "warn",
    });
    let config = load_config(&cli.config);

    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(config, bind, port).await,
        Commands::Run { seed } => repl::cmd_run(&config, seed).await,
        Commands::Status => cmd_status(&config),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(mut config: AppConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.web.bind_addr = bind;
    }
    if let Some(port) = port {
        config.web.port = port;
    }

    let llm_config = resolve_llm_config(&config.llm)?;
    if llm_config.api_key.is_empty() {
        info!(
            provider = %llm_config.provider,
            "no server API key; sessions must supply their own"
        );
    }

    let state = AppState::with_llm(config.web, llm_config);
    let server = WebServer::new(state);
    println!();
    println!("  TaskPilot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Open http://{} in your browser", server.addr());
    println!();

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("web server failed: {e}"))
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

fn cmd_status(config: &AppConfig) -> Result<()> {
    let llm = resolve_llm_config(&config.llm)?;

    println!();
    println!("  TaskPilot Status");
    println!("  ================");
    println!();
    println!("  Provider:         {}", llm.provider);
    println!("  Model:            {}", llm.default_model);
    println!("  Endpoint:         {}", llm.base_url);
    if llm.api_key.is_empty() {
        println!(
            "  API key:          NOT SET (TASKPILOT_API_KEY or {})",
            llm.provider.api_key_env()
        );
    } else {
        println!("  API key:          CONFIGURED");
    }
    println!(
        "  Web:              http://{}:{}",
        config.web.bind_addr, config.web.port
    );
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
