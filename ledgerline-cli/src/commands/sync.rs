//! Sync command - push the local cache to the backend, or pull it down

use anyhow::Result;

use ledgerline_core::services::sync::SyncOutcome;

use super::get_context;
use crate::output;

pub async fn run(pull: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if pull {
        let state = ctx.sync_service.hydrate().await;
        ctx.sync_service.save_cache(&state)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&state)?);
        } else {
            output::success(&format!(
                "Pulled {} performance records, {} unpaid invoices{}",
                state.performance.len(),
                state.unpaid.len(),
                if state.weekly.is_some() {
                    ", weekly report"
                } else {
                    ""
                }
            ));
        }
        return Ok(());
    }

    let state = ctx.sync_service.load_cache().unwrap_or_default();
    if state.is_empty() {
        output::warning("Nothing to push - local cache is empty");
        return Ok(());
    }
    let outcome = ctx.sync_service.push_all(&state).await?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "synced": outcome == SyncOutcome::Synced })
        );
        return Ok(());
    }
    match outcome {
        SyncOutcome::Synced => output::success("Local data pushed to backend"),
        SyncOutcome::LocalOnly => output::warning("Backend unreachable - nothing was pushed"),
    }
    Ok(())
}
