//! # Domain Module
//!
//! Business logic for the pantry inventory.
//!
//! - `state`: the aggregate and its pure state transitions
//! - `rollover`: once-per-day auto-subtraction and the usage streak
//! - `analytics` and `alerts`: read-only queries over the state
//! - `inventory_store`: the handle that ties state, clock and storage together
//! - `validation`: input checks callers run before mutating
//! - `export_service`: CSV and JSON renderings for data downloads

pub mod alerts;
pub mod analytics;
pub mod clock;
pub mod commands;
pub mod export_service;
pub mod inventory_store;
pub mod rollover;
pub mod state;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::items::{ItemUpdate, NewItem};
pub use commands::settings::{BudgetUpdate, SettingsUpdate};
pub use export_service::ExportService;
pub use inventory_store::InventoryStore;
pub use rollover::RolloverOutcome;
pub use state::RefillrState;
pub use validation::ValidationError;
