//! # Storage Traits
//!
//! The persistence seam between the inventory store and wherever its
//! snapshot lives. The store only ever loads once and saves whole snapshots.

use anyhow::Result;

use crate::domain::state::RefillrState;

/// Durable home for the inventory state
pub trait StateStorage: Send + Sync {
    /// Load the last saved snapshot; `Ok(None)` when nothing was saved yet
    fn load_state(&self) -> Result<Option<RefillrState>>;

    /// Replace the saved snapshot with `state`
    fn save_state(&self, state: &RefillrState) -> Result<()>;
}
