//! Ledgerline CLI - the company dashboard in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{demo, edit, import, show, status, sync};

/// Ledgerline - revenue, unpaid invoices and weekly reports
#[derive(Parser)]
#[command(name = "ll", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dataset summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a CSV export into the dashboard
    Import {
        #[command(subcommand)]
        command: import::ImportCommands,
    },

    /// Show dashboard data
    Show {
        #[command(subcommand)]
        command: show::ShowCommands,
    },

    /// Add, change or delete performance records
    Edit {
        #[command(subcommand)]
        command: edit::EditCommands,
    },

    /// Push local data to the backend (or pull it down)
    Sync {
        /// Pull backend state into the local cache instead of pushing
        #[arg(long)]
        pull: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json).await,
        Commands::Import { command } => import::run(command).await,
        Commands::Show { command } => show::run(command).await,
        Commands::Edit { command } => edit::run(command).await,
        Commands::Sync { pull, json } => sync::run(pull, json).await,
        Commands::Demo { command } => demo::run(command),
    }
}
