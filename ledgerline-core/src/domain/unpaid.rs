//! Unpaid invoice domain model

use serde::{Deserialize, Serialize};

/// One outstanding invoice for a managed building.
///
/// Snake-case field names are the wire shape of the unpaid-invoice table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnpaidInvoice {
    /// `YYYY-MM` the invoice is reported under
    #[serde(default)]
    pub month: String,
    #[serde(default, alias = "buildingName")]
    pub building_name: String,
    #[serde(default, alias = "projectName")]
    pub project_name: String,
    #[serde(default, alias = "invoiceDate")]
    pub invoice_date: String,
    /// Supply amount in currency units, VAT excluded
    #[serde(default, alias = "supplyAmount")]
    pub supply_amount: f64,
}

impl UnpaidInvoice {
    /// Sum of supply amounts over a set of invoices
    pub fn total_supply(invoices: &[UnpaidInvoice]) -> f64 {
        invoices.iter().map(|i| i.supply_amount).sum()
    }
}
