//! Sync service - local cache, remote hydration and debounced writes
//!
//! Local state is authoritative. Every mutation is written to the cache
//! file before a remote write is attempted, and an unreachable backend
//! degrades to local-only operation instead of failing the mutation.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use crate::domain::result::Result;
use crate::ports::SyncGateway;
use crate::services::classify::MANAGED_BUILDING_CAT2;
use crate::services::store::DashboardState;

/// Cache file name, versioned so stale layouts are simply ignored
pub const CACHE_FILE: &str = "cache-v31.json";

/// Quiet period before a scheduled remote write fires
pub const SYNC_DEBOUNCE: Duration = Duration::from_millis(800);

/// How a push ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Cached locally and written to the backend
    Synced,
    /// Cached locally; the backend was unreachable
    LocalOnly,
}

/// Persists dashboard state locally and replicates it through a
/// [`SyncGateway`].
pub struct SyncService {
    gateway: Arc<dyn SyncGateway>,
    cache_path: PathBuf,
}

impl SyncService {
    pub fn new(gateway: Arc<dyn SyncGateway>, data_dir: &Path) -> Self {
        Self {
            gateway,
            cache_path: data_dir.join(CACHE_FILE),
        }
    }

    /// Load the startup state: backend first, cache when the backend is
    /// unreachable, empty when there is no cache either.
    pub async fn hydrate(&self) -> DashboardState {
        match self.fetch_remote().await {
            Ok(state) => {
                info!(
                    "hydrated from backend: {} performance, {} unpaid, weekly={}",
                    state.performance.len(),
                    state.unpaid.len(),
                    state.weekly.is_some()
                );
                state
            }
            Err(e) => {
                warn!("backend hydration failed ({}), falling back to local cache", e);
                self.load_cache().unwrap_or_default()
            }
        }
    }

    async fn fetch_remote(&self) -> Result<DashboardState> {
        let performance = self
            .gateway
            .fetch_performance_rows()
            .await?
            .into_iter()
            // managed-building rows live on the unpaid tab; older backends
            // still return them mixed into the performance set
            .filter(|r| r.cat2 != MANAGED_BUILDING_CAT2)
            .collect();
        let unpaid = self.gateway.fetch_unpaid_invoices().await?;
        let weekly = self.gateway.fetch_weekly_snapshot().await?;
        Ok(DashboardState {
            performance,
            unpaid,
            weekly,
        })
    }

    /// Cache the whole state, then write the performance set upstream
    pub async fn push_performance(&self, state: &DashboardState) -> Result<SyncOutcome> {
        self.save_cache(state)?;
        self.relay(self.gateway.put_performance_rows(&state.performance))
            .await
    }

    /// Cache the whole state, then write the unpaid set upstream
    pub async fn push_unpaid(&self, state: &DashboardState) -> Result<SyncOutcome> {
        self.save_cache(state)?;
        self.relay(self.gateway.put_unpaid_invoices(&state.unpaid))
            .await
    }

    /// Cache the whole state, then write the weekly snapshot upstream
    /// (a no-op upstream when no snapshot exists)
    pub async fn push_weekly(&self, state: &DashboardState) -> Result<SyncOutcome> {
        self.save_cache(state)?;
        match &state.weekly {
            Some(snapshot) => self.relay(self.gateway.put_weekly_snapshot(snapshot)).await,
            None => Ok(SyncOutcome::Synced),
        }
    }

    /// Cache once, then write all three sets upstream
    pub async fn push_all(&self, state: &DashboardState) -> Result<SyncOutcome> {
        self.save_cache(state)?;
        let mut outcome = self
            .relay(self.gateway.put_performance_rows(&state.performance))
            .await?;
        if self.relay(self.gateway.put_unpaid_invoices(&state.unpaid)).await? == SyncOutcome::LocalOnly
        {
            outcome = SyncOutcome::LocalOnly;
        }
        if let Some(snapshot) = &state.weekly {
            if self.relay(self.gateway.put_weekly_snapshot(snapshot)).await? == SyncOutcome::LocalOnly
            {
                outcome = SyncOutcome::LocalOnly;
            }
        }
        Ok(outcome)
    }

    /// Local-first error policy: recoverable backend failures degrade to
    /// [`SyncOutcome::LocalOnly`]; authorization and validation failures
    /// propagate because retrying will not help.
    async fn relay(&self, write: impl Future<Output = Result<()>>) -> Result<SyncOutcome> {
        match write.await {
            Ok(()) => Ok(SyncOutcome::Synced),
            Err(e) if e.is_recoverable() => {
                warn!("remote write failed, data kept locally: {}", e);
                Ok(SyncOutcome::LocalOnly)
            }
            Err(e) => Err(e),
        }
    }

    pub fn save_cache(&self, state: &DashboardState) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.cache_path, serde_json::to_vec_pretty(state)?)?;
        debug!("cache written to {}", self.cache_path.display());
        Ok(())
    }

    /// Read the cache file; a missing or unreadable cache is None
    pub fn load_cache(&self) -> Option<DashboardState> {
        let bytes = std::fs::read(&self.cache_path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("ignoring unreadable cache {}: {}", self.cache_path.display(), e);
                None
            }
        }
    }
}

/// Coalesces bursts of mutations into one remote write: each call replaces
/// the previously scheduled write, and the last one fires after the quiet
/// period. Last write wins if two sessions race.
pub struct SyncDebouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Default for SyncDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncDebouncer {
    pub fn new() -> Self {
        Self::with_delay(SYNC_DEBOUNCE)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `write` after the quiet period, cancelling any write still
    /// waiting on it.
    pub async fn schedule<F>(&self, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let mut pending = self.pending.lock().await;
        if let Some(prev) = pending.take() {
            prev.abort();
        }
        *pending = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            write.await;
        }));
    }

    /// Wait for the scheduled write (if any) to finish
    pub async fn join(&self) {
        let handle = self.pending.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}
