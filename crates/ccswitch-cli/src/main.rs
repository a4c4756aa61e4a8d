//! ccswitch CLI - switch Claude Code and Codex between connection profiles
//!
//! Provides `ccswitch claude`, `ccswitch codex`, `ccswitch profile`, and
//! `ccswitch provider` commands. All state logic lives in `ccswitch-core`;
//! this binary only parses arguments and renders results.

mod commands;

use clap::{Parser, Subcommand};

use commands::codex::ProviderCommands;
use commands::profile::ProfileCommands;

#[derive(Parser)]
#[command(name = "ccswitch")]
#[command(about = "ccswitch - connection profile manager for Claude Code and Codex")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch Claude Code to a profile, the proxy, or official login
    Claude {
        /// Profile id or name, `ccr` for the local proxy, `official` to
        /// return to the built-in login
        #[arg(value_name = "TARGET")]
        target: Option<String>,

        /// List profiles instead of switching
        #[arg(short, long)]
        list: bool,
    },
    /// Switch Codex to a model provider or back to official login
    Codex {
        /// Provider id or name, or `official`
        #[arg(value_name = "TARGET")]
        target: Option<String>,

        /// List providers instead of switching
        #[arg(short, long)]
        list: bool,
    },
    /// Manage saved profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Maintain the Codex provider table
    Provider {
        #[command(subcommand)]
        action: ProviderCommands,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Claude { target, list } => commands::claude::execute(target.as_deref(), list),
        Commands::Codex { target, list } => commands::codex::execute(target.as_deref(), list),
        Commands::Profile { action } => commands::profile::execute(action),
        Commands::Provider { action } => commands::codex::execute_provider(action),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
