//! # File Storage Module
//!
//! Keeps the inventory state in a single human-readable YAML record inside
//! the data directory.
//!
//! ## File Structure
//!
//! ```text
//! <data dir>/
//! └── refillr-storage.yaml    ← the whole store snapshot
//! ```
//!
//! Writes go to `refillr-storage.tmp` first and are renamed into place, so
//! a crash mid-write leaves the previous snapshot intact.

pub mod connection;
pub mod state_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::FileConnection;
pub use state_repository::{StateRepository, DATA_FORMAT_VERSION, STATE_FILE_NAME};
