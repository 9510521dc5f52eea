//! # Refillr Backend
//!
//! Synchronous pantry inventory backend: an in-memory store of grocery items
//! and usage history, snapshotted to a YAML file after every change.
//!
//! The frontend owns the [`Backend`] and is expected to call
//! [`Backend::on_app_foreground`] whenever the app comes to the foreground so
//! the daily rollover catches up.

use anyhow::Result;
use log::info;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use domain::{Clock, InventoryStore, RolloverOutcome, SystemClock};
pub use shared;
pub use storage::{FileConnection, StateRepository};

/// Main backend struct holding the store and its helpers
pub struct Backend {
    pub inventory_store: InventoryStore<StateRepository>,
    pub export_service: domain::ExportService,
}

impl Backend {
    /// Open the store in the default data directory using the local date
    pub fn new() -> Result<Self> {
        let connection = FileConnection::new_default()?;
        Ok(Self::with_connection(connection, Arc::new(SystemClock)))
    }

    pub fn with_connection(connection: FileConnection, clock: Arc<dyn Clock>) -> Self {
        info!("Opening Refillr data in {:?}", connection.base_directory());
        let inventory_store = InventoryStore::new(StateRepository::new(connection), clock);

        Backend {
            inventory_store,
            export_service: domain::ExportService::new(),
        }
    }

    /// Catch up the daily rollover. The rollover updates the streak itself
    /// when it applies.
    pub fn on_app_foreground(&mut self) -> RolloverOutcome {
        self.inventory_store.perform_daily_subtraction()
    }

    pub fn export_inventory_csv(&self) -> Result<String> {
        self.export_service
            .inventory_csv(self.inventory_store.state())
    }

    pub fn export_usage_csv(&self) -> Result<String> {
        self.export_service.usage_csv(self.inventory_store.state())
    }

    pub fn export_state_json(&self) -> Result<String> {
        self.export_service.state_json(self.inventory_store.state())
    }
}
