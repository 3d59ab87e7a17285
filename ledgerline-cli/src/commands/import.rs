//! Import command - upload CSV exports into the dashboard

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use ledgerline_core::services::import::ensure_csv_path;
use ledgerline_core::services::sync::SyncOutcome;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Monthly performance export (pre-aggregated or raw ledger)
    Dashboard {
        /// Path to CSV file
        file: PathBuf,
    },
    /// Unpaid-invoice export
    Unpaid {
        /// Path to CSV file
        file: PathBuf,
    },
    /// Weekly report ledger export
    Weekly {
        /// Path to CSV file
        file: PathBuf,
        /// Also write the routed report as CSV
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

pub async fn run(command: ImportCommands) -> Result<()> {
    let ctx = get_context()?;
    let mut state = ctx.sync_service.hydrate().await;

    let outcome = match command {
        ImportCommands::Dashboard { file } => {
            ensure_csv_path(&file)?;
            let bytes = std::fs::read(&file)?;
            let batch = ctx.store_service.apply_performance_upload(&mut state, &bytes)?;
            output::success(&format!(
                "Imported {} of {} rows ({:?} format), {} records total",
                batch.rows.len(),
                batch.rows_read,
                batch.mode,
                state.performance.len()
            ));
            ctx.sync_service.push_performance(&state).await?
        }
        ImportCommands::Unpaid { file } => {
            ensure_csv_path(&file)?;
            let bytes = std::fs::read(&file)?;
            let batch = ctx.store_service.apply_unpaid_upload(&mut state, &bytes)?;
            output::success(&format!(
                "Imported {} unpaid invoices from {} rows",
                batch.invoices.len(),
                batch.rows_read
            ));
            ctx.sync_service.push_unpaid(&state).await?
        }
        ImportCommands::Weekly { file, out } => {
            ensure_csv_path(&file)?;
            let bytes = std::fs::read(&file)?;
            let snapshot = ctx.store_service.apply_weekly_upload(&mut state, &bytes)?;
            output::success(&format!(
                "Weekly report for {}: {} complete, {} scheduled",
                snapshot.week_label,
                snapshot.complete.len(),
                snapshot.scheduled.len()
            ));
            if let Some(out) = out {
                std::fs::write(&out, snapshot.to_csv())?;
                output::info(&format!("Report written to {}", out.display()));
            }
            ctx.sync_service.push_weekly(&state).await?
        }
    };

    match outcome {
        SyncOutcome::Synced => output::info("Synced to backend"),
        SyncOutcome::LocalOnly => output::warning("Backend unreachable - data saved locally"),
    }
    Ok(())
}
