//! Show command - print dashboard data

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ShowCommands {
    /// Performance records
    Performance {
        /// Only show this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unpaid invoices
    Unpaid {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Weekly report
    Weekly {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Output as CSV (구분, 건물명, 공사명)
        #[arg(long)]
        csv: bool,
    },
}

pub async fn run(command: ShowCommands) -> Result<()> {
    let ctx = get_context()?;
    let state = ctx.sync_service.hydrate().await;

    match command {
        ShowCommands::Performance { month, json } => {
            let records: Vec<_> = state
                .performance
                .iter()
                .filter(|r| month.as_deref().map(|m| r.month == m).unwrap_or(true))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            if records.is_empty() {
                output::warning("No performance records. Use 'll import dashboard' to upload a CSV.");
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec![
                "#", "Month", "Cat1", "Cat2", "Cat3", "Count", "Rev", "Purchase", "Labor", "SG&A",
            ]);
            for (i, r) in records.iter().enumerate() {
                table.add_row(vec![
                    i.to_string(),
                    r.month.clone(),
                    r.cat1.clone(),
                    r.cat2.clone(),
                    r.cat3.clone(),
                    r.count.to_string(),
                    output::format_amount(r.rev),
                    output::format_amount(r.purchase),
                    output::format_amount(r.labor),
                    output::format_amount(r.sga),
                ]);
            }
            println!("{}", table);
        }
        ShowCommands::Unpaid { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&state.unpaid)?);
                return Ok(());
            }
            if state.unpaid.is_empty() {
                output::warning("No unpaid invoices.");
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["Month", "Building", "Project", "Invoiced", "Amount"]);
            let total = ledgerline_core::UnpaidInvoice::total_supply(&state.unpaid);
            for invoice in &state.unpaid {
                table.add_row(vec![
                    invoice.month.clone(),
                    invoice.building_name.clone(),
                    invoice.project_name.clone(),
                    invoice.invoice_date.clone(),
                    output::format_amount(invoice.supply_amount),
                ]);
            }
            println!("{}", table);
            println!();
            println!("Total outstanding: {}", output::format_amount(total).bold());
        }
        ShowCommands::Weekly { json, csv } => {
            let Some(snapshot) = &state.weekly else {
                output::warning("No weekly report. Use 'll import weekly' to upload a CSV.");
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(snapshot)?);
                return Ok(());
            }
            if csv {
                print!("{}", snapshot.to_csv());
                return Ok(());
            }
            println!("{}", format!("Week {}", snapshot.week_label).bold());
            println!();
            println!("Completed this week ({}):", snapshot.complete.len());
            for item in &snapshot.complete {
                println!("  • {}", item.label);
            }
            println!();
            println!("Scheduled next week ({}):", snapshot.scheduled.len());
            for item in &snapshot.scheduled {
                println!("  • {}", item.label);
            }
        }
    }
    Ok(())
}
