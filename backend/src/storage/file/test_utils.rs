//! Test utilities for file-backed storage
//!
//! Provides RAII-based cleanup that guarantees test data is removed
//! even if tests panic or fail.

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

use super::connection::FileConnection;
use super::state_repository::StateRepository;
use crate::domain::clock::FixedClock;
use crate::domain::inventory_store::InventoryStore;

/// Temporary data directory plus a connection to it. Dropping the
/// environment removes the directory.
pub struct TestEnvironment {
    pub connection: FileConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        init_test_logging();
        let temp_dir = TempDir::new()?;
        let connection = FileConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// Open a store on this environment's data directory with a clock pinned to `today`
    pub fn open_store(&self, today: NaiveDate) -> (InventoryStore<StateRepository>, FixedClock) {
        let clock = FixedClock::new(today);
        let store = self.open_store_with_clock(&clock);
        (store, clock)
    }

    pub fn open_store_with_clock(&self, clock: &FixedClock) -> InventoryStore<StateRepository> {
        InventoryStore::new(
            StateRepository::new(self.connection.clone()),
            Arc::new(clock.clone()),
        )
    }
}

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
