//! Status command - dataset summary

use anyhow::Result;
use colored::Colorize;

use ledgerline_core::services::classify::{classify_record, RecordClass};

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let state = ctx.sync_service.hydrate().await;

    let months: Vec<&str> = {
        let mut months: Vec<&str> = state.performance.iter().map(|r| r.month.as_str()).collect();
        months.sort();
        months.dedup();
        months
    };
    // overhead rows carry SGA only and stay out of the revenue rollup
    let total_rev: f64 = state
        .performance
        .iter()
        .filter(|r| classify_record(r) == RecordClass::Performance)
        .map(|r| r.rev)
        .sum();
    let overhead_records = state
        .performance
        .iter()
        .filter(|r| classify_record(r) == RecordClass::Overhead)
        .count();
    let total_unpaid = ledgerline_core::UnpaidInvoice::total_supply(&state.unpaid);

    if json {
        let summary = serde_json::json!({
            "performanceRecords": state.performance.len(),
            "overheadRecords": overhead_records,
            "months": months,
            "totalRev": total_rev,
            "unpaidInvoices": state.unpaid.len(),
            "totalUnpaid": total_unpaid,
            "weeklyReport": state.weekly.as_ref().map(|w| &w.week_label),
            "demoMode": ctx.config.demo_mode,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Dashboard Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Performance records", &state.performance.len().to_string()]);
    table.add_row(vec![
        "Months covered",
        &match (months.first(), months.last()) {
            (Some(first), Some(last)) if first != last => format!("{} to {}", first, last),
            (Some(first), _) => first.to_string(),
            _ => "-".to_string(),
        },
    ]);
    table.add_row(vec!["Overhead records", &overhead_records.to_string()]);
    table.add_row(vec!["Total revenue", &output::format_amount(total_rev)]);
    table.add_row(vec!["Unpaid invoices", &state.unpaid.len().to_string()]);
    table.add_row(vec!["Unpaid amount", &output::format_amount(total_unpaid)]);
    table.add_row(vec![
        "Weekly report",
        state
            .weekly
            .as_ref()
            .map(|w| w.week_label.as_str())
            .unwrap_or("-"),
    ]);
    println!("{}", table);

    if ctx.config.demo_mode {
        println!();
        println!("Demo mode is {}", "ON".yellow());
    }
    Ok(())
}
