//! CLI argument definitions for TaskPilot.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TaskPilot -- a chat assistant for routine business tasks.
#[derive(Parser)]
#[command(
    name = "taskpilot",
    version,
    about = "TaskPilot -- automate HR, sales, finance, reporting and sheet tasks",
    long_about = "Describe a task in plain language; TaskPilot classifies it with an LLM and \
                  produces a checklist, a generated table, or model-written text."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server with the embedded UI.
    Serve {
        /// Address to bind the HTTP server to (overrides the config file).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides the config file).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Chat with the assistant in the terminal.
    Run {
        /// Seed for the table synthesizers, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the resolved configuration.
    Status,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::try_parse_from(["taskpilot", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { bind, port } => {
                assert_eq!(bind, None);
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }
}
