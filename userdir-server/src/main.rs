#![cfg_attr(not(test), forbid(unsafe_code))]

//! Main entry point for the User Directory backend CLI.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::server::Config;
use std::error::Error;
use std::path::PathBuf;

use userdir_server::server;

/// Main CLI structure for the User Directory server
#[derive(Parser)]
#[command(name = "userdir")]
#[command(about = "Backend server for the User Directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for the User Directory CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Start the backend server
    Serve {
        /// The port number to bind the server to (e.g., 8080)
        #[arg(
            long,
            short,
            help = "The port number to bind the server to (e.g., 8080). Overrides the configuration file."
        )]
        port: Option<u16>,

        /// Path to the configuration file (optional)
        #[arg(
            long,
            short,
            help = "Path to the configuration file (e.g., config.yaml or config.json). If not provided, defaults will be used."
        )]
        config: Option<PathBuf>,

        /// Insert the demo users at startup
        #[arg(long, help = "Seed the store with demo users before serving.")]
        seed: bool,
    },
}

/// Initializes environment variables and returns the parsed CLI.
#[must_use]
pub fn initialize_cli() -> Cli {
    dotenv().ok();
    Cli::parse()
}

/// Handles the serve command by loading configuration and starting the server.
///
/// # Errors
/// Returns an error if configuration loading or server startup fails.
pub async fn handle_serve_command(
    port: Option<u16>,
    config: Option<PathBuf>,
    seed: bool,
) -> Result<(), Box<dyn Error>> {
    let mut resolved_config = Config::load_config(config, port)?;
    if seed {
        resolved_config.seed_demo_data = true;
    }
    server::run(resolved_config).await
}

/// Main application entry point.
///
/// # Errors
/// Returns an error if the application fails to initialize or run.
pub async fn run_app() -> Result<(), Box<dyn Error>> {
    let cli = initialize_cli();

    match cli.command {
        Commands::Serve { port, config, seed } => {
            handle_serve_command(port, config, seed).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    run_app().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_serve_with_port_and_seed() {
        let cli = Cli::parse_from(["userdir", "serve", "--port", "9999", "--seed"]);
        let Commands::Serve { port, config, seed } = cli.command;
        assert_eq!(port, Some(9999));
        assert_eq!(config, None);
        assert!(seed);
    }

    #[test]
    fn cli_serve_defaults_are_optional() {
        let cli = Cli::parse_from(["userdir", "serve"]);
        let Commands::Serve { port, config, seed } = cli.command;
        assert_eq!(port, None);
        assert_eq!(config, None);
        assert!(!seed);
    }

    #[test]
    fn cli_rejects_unknown_subcommands() {
        assert!(Cli::try_parse_from(["userdir", "explode"]).is_err());
    }
}
