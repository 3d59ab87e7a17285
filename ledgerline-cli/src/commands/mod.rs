//! CLI command implementations

pub mod demo;
pub mod edit;
pub mod import;
pub mod show;
pub mod status;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ledgerline_core::LedgerlineContext;

/// Get the ledgerline directory from environment or default
pub fn get_ledgerline_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LEDGERLINE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".ledgerline")
    }
}

/// Get or create the ledgerline context
pub fn get_context() -> Result<LedgerlineContext> {
    let ledgerline_dir = get_ledgerline_dir();

    std::fs::create_dir_all(&ledgerline_dir)
        .with_context(|| format!("Failed to create ledgerline directory: {:?}", ledgerline_dir))?;

    LedgerlineContext::new(&ledgerline_dir).context("Failed to initialize ledgerline context")
}
