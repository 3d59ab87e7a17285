//! Edit command - manual record entry and correction

use anyhow::Result;
use clap::Subcommand;

use ledgerline_core::services::sync::SyncOutcome;
use ledgerline_core::PerformanceRecord;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum EditCommands {
    /// Add a performance record (folds into an existing group if one matches)
    Add {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        cat1: String,
        #[arg(long, default_value = "")]
        cat2: String,
        #[arg(long, default_value = "")]
        cat3: String,
        #[arg(long, default_value_t = 1)]
        count: i64,
        #[arg(long, default_value_t = 0.0)]
        rev: f64,
        #[arg(long, default_value_t = 0.0)]
        purchase: f64,
        #[arg(long, default_value_t = 0.0)]
        labor: f64,
        #[arg(long, default_value_t = 0.0)]
        sga: f64,
    },
    /// Change fields of the record at INDEX (see 'll show performance')
    Set {
        index: usize,
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        cat1: Option<String>,
        #[arg(long)]
        cat2: Option<String>,
        #[arg(long)]
        cat3: Option<String>,
        #[arg(long)]
        count: Option<i64>,
        #[arg(long)]
        rev: Option<f64>,
        #[arg(long)]
        purchase: Option<f64>,
        #[arg(long)]
        labor: Option<f64>,
        #[arg(long)]
        sga: Option<f64>,
    },
    /// Delete the record at INDEX
    Delete {
        index: usize,
        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },
    /// Drop all local data
    Reset {
        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: EditCommands) -> Result<()> {
    let ctx = get_context()?;
    let mut state = ctx.sync_service.hydrate().await;

    match command {
        EditCommands::Add {
            month,
            cat1,
            cat2,
            cat3,
            count,
            rev,
            purchase,
            labor,
            sga,
        } => {
            let record = PerformanceRecord {
                month: month.unwrap_or_default(),
                cat1,
                cat2,
                cat3,
                count,
                rev,
                purchase,
                labor,
                sga,
            };
            ctx.store_service.add_record(&mut state, record)?;
            output::success(&format!("Record added ({} total)", state.performance.len()));
        }
        EditCommands::Set {
            index,
            month,
            cat1,
            cat2,
            cat3,
            count,
            rev,
            purchase,
            labor,
            sga,
        } => {
            let mut record = state
                .performance
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No record at index {}", index))?;
            if let Some(v) = month {
                record.month = v;
            }
            if let Some(v) = cat1 {
                record.cat1 = v;
            }
            if let Some(v) = cat2 {
                record.cat2 = v;
            }
            if let Some(v) = cat3 {
                record.cat3 = v;
            }
            if let Some(v) = count {
                record.count = v;
            }
            if let Some(v) = rev {
                record.rev = v;
            }
            if let Some(v) = purchase {
                record.purchase = v;
            }
            if let Some(v) = labor {
                record.labor = v;
            }
            if let Some(v) = sga {
                record.sga = v;
            }
            ctx.store_service.edit_record(&mut state, index, record)?;
            output::success(&format!("Record {} updated", index));
        }
        EditCommands::Delete { index, force } => {
            if !force {
                anyhow::bail!("Deleting record {} is irreversible; pass --force to confirm", index);
            }
            let removed = ctx.store_service.delete_record(&mut state, index)?;
            output::success(&format!(
                "Deleted {} {} {} (rev {})",
                removed.month,
                removed.cat1,
                removed.cat3,
                output::format_amount(removed.rev)
            ));
        }
        EditCommands::Reset { force } => {
            if !force {
                anyhow::bail!("Reset drops all local data; pass --force to confirm");
            }
            ctx.store_service.reset(&mut state);
            output::success("All data cleared");
        }
    }

    match ctx.sync_service.push_all(&state).await? {
        SyncOutcome::Synced => output::info("Synced to backend"),
        SyncOutcome::LocalOnly => output::warning("Backend unreachable - data saved locally"),
    }
    Ok(())
}
