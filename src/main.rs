//! Router configuration tool.
//!
//! Loads a router configuration document, checks it, and prints either the
//! normalized configuration or the generated configuration reference.
//!
//! # Architecture Overview
//!
//! ```text
//!   config document
//!   ──────────────────▶ ┌────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐
//!                       │ loader │──▶│ validate │──▶│ defaults │──▶│ normalize │──▶ Config
//!                       └────────┘   └──────────┘   └──────────┘   └───────────┘
//!
//!   field tables ─────▶ ┌────────┐
//!                       │  docs  │──▶ markdown reference
//!                       └────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use router_config::observability::logging;
use router_config::{docs, load_file};

const DEFAULT_CONFIG_PATH: &str = "/etc/router-config.yml";

#[derive(Parser)]
#[command(name = "router-config", version)]
#[command(about = "Validate and normalize router BGP/VRRP configuration", long_about = None)]
struct Cli {
    /// Show verbose log messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration file and report whether it is valid
    Check {
        /// Configuration file in YAML, TOML, or JSON format
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// Print the normalized configuration as JSON
    Dump {
        /// Configuration file in YAML, TOML, or JSON format
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// Print the configuration reference as markdown
    Docs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Check { config } => match load_file(&config) {
            Ok(loaded) => {
                println!(
                    "{}: ok (AS{}, {} peers, {} VRRP instances, {} interfaces)",
                    config.display(),
                    loaded.asn.unwrap_or_default(),
                    loaded.peers.len(),
                    loaded.vrrp.len(),
                    loaded.interfaces.len()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(path = %config.display(), "Failed to load configuration: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Dump { config } => {
            let loaded = match load_file(&config) {
                Ok(loaded) => loaded,
                Err(e) => {
                    tracing::error!(path = %config.display(), "Failed to load configuration: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::to_string_pretty(&loaded) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Failed to serialize configuration: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Docs => match docs::document_config() {
            Ok(reference) => {
                print!("{}", reference);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{}", e);
                ExitCode::from(2)
            }
        },
    }
}
