//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use ledgerline_core::config::Config;

use super::get_ledgerline_dir;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode (no backend; everything stays local)
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let ledgerline_dir = get_ledgerline_dir();
    std::fs::create_dir_all(&ledgerline_dir)?;
    let mut config = Config::load(&ledgerline_dir)?;

    match command {
        Some(DemoCommands::On) => {
            config.enable_demo_mode();
            config.save(&ledgerline_dir)?;
            println!("{}", "Demo mode enabled".green());
            println!("Uploads and edits stay local. Run 'll demo off' to reconnect the backend.");
            Ok(())
        }
        Some(DemoCommands::Off) => {
            config.disable_demo_mode();
            config.save(&ledgerline_dir)?;
            println!("{}", "Demo mode disabled".yellow());
            Ok(())
        }
        Some(DemoCommands::Status) | None => {
            if config.demo_mode {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
            Ok(())
        }
    }
}
