//! # State Repository
//!
//! Stores the whole inventory state as a single YAML record,
//! `refillr-storage.yaml`, at the root of the data directory.
//!
//! ## YAML Format
//!
//! ```yaml
//! dataFormatVersion: "1.0"
//! items:
//!   - id: 6f1c...
//!     name: Milk
//!     category: Dairy
//!     quantity: 1.5
//!     unit: litres
//!     caloriesPerUnit: 50.0
//!     purchaseDate: 2025-02-26
//!     expiryDate: 2025-03-05
//!     autoSubtractDaily: true
//!     dailyUsage: 0.5
//! settings: { ... }
//! budget: { ... }
//! usageRecords:
//!   - itemId: 6f1c...
//!     date: 2025-02-26
//!     quantity: 0.5
//!     calories: 25.0
//! theme: system
//! streak: 1
//! lastAutoSubtractDate: 2025-02-26
//! ```
//!
//! Files written before the version tag existed load as version `1.0`.
//! Unknown versions are refused rather than guessed at.

use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;

use super::connection::FileConnection;
use crate::domain::state::RefillrState;
use crate::storage::traits::StateStorage;

/// Name of the durable record
pub const STATE_FILE_NAME: &str = "refillr-storage.yaml";

/// Current layout of the durable record
pub const DATA_FORMAT_VERSION: &str = "1.0";

fn default_format_version() -> String {
    DATA_FORMAT_VERSION.to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStateRef<'a> {
    data_format_version: &'a str,
    #[serde(flatten)]
    state: &'a RefillrState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default = "default_format_version")]
    data_format_version: String,
    #[serde(flatten)]
    state: RefillrState,
}

/// YAML-file backed state repository
#[derive(Debug, Clone)]
pub struct StateRepository {
    connection: FileConnection,
}

impl StateRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn state_file_path(&self) -> std::path::PathBuf {
        self.connection.record_path(STATE_FILE_NAME)
    }
}

impl StateStorage for StateRepository {
    fn load_state(&self) -> Result<Option<RefillrState>> {
        let path = self.state_file_path();
        if !path.exists() {
            info!("No saved state at {:?}", path);
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&path)?;
        let persisted: PersistedState = serde_yaml::from_str(&yaml_content)?;

        if persisted.data_format_version != DATA_FORMAT_VERSION {
            return Err(anyhow::anyhow!(
                "Unsupported data format version '{}' in {:?} (expected '{}')",
                persisted.data_format_version,
                path,
                DATA_FORMAT_VERSION
            ));
        }

        debug!(
            "Loaded state from {:?}: {} items, {} usage records",
            path,
            persisted.state.items.len(),
            persisted.state.usage_records.len()
        );
        Ok(Some(persisted.state))
    }

    fn save_state(&self, state: &RefillrState) -> Result<()> {
        let path = self.state_file_path();
        let yaml_content = serde_yaml::to_string(&PersistedStateRef {
            data_format_version: DATA_FORMAT_VERSION,
            state,
        })?;

        self.connection.write_atomically(&path, &yaml_content)?;
        debug!("Saved state to {:?}", path);
        Ok(())
    }
}
