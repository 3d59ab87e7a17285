//! Ledgerline Core - business logic for the company dashboard
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (PerformanceRecord, UnpaidInvoice, WeeklySnapshot)
//! - **ports**: Trait definitions for external dependencies (SyncGateway)
//! - **services**: Business logic orchestration (import, aggregate, store, sync)
//! - **adapters**: Concrete implementations (HTTP backend, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{HttpSyncGateway, MemorySyncGateway};
use config::Config;
use ports::SyncGateway;
use services::{StoreService, SyncDebouncer, SyncService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{PerformanceRecord, UnpaidInvoice, WeekWindows, WeeklySnapshot};
pub use services::DashboardState;

/// Main context for Ledgerline operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the sync gateway and all services.
pub struct LedgerlineContext {
    pub config: Config,
    pub gateway: Arc<dyn SyncGateway>,
    pub store_service: StoreService,
    pub sync_service: SyncService,
    pub sync_debouncer: SyncDebouncer,
}

impl LedgerlineContext {
    /// Create a new Ledgerline context.
    ///
    /// Demo mode (or a missing backend URL) swaps the HTTP gateway for an
    /// in-memory one, so every operation works without a backend.
    pub fn new(ledgerline_dir: &Path) -> Result<Self> {
        let config = Config::load(ledgerline_dir)?;

        let gateway: Arc<dyn SyncGateway> = match (&config.api_base_url, config.demo_mode) {
            (Some(base_url), false) => Arc::new(HttpSyncGateway::new(
                base_url,
                config.editor_pin.as_deref().unwrap_or_default(),
            )?),
            _ => Arc::new(MemorySyncGateway::new()),
        };

        let store_service = StoreService::new();
        let sync_service = SyncService::new(Arc::clone(&gateway), ledgerline_dir);
        let sync_debouncer = SyncDebouncer::new();

        Ok(Self {
            config,
            gateway,
            store_service,
            sync_service,
            sync_debouncer,
        })
    }
}
