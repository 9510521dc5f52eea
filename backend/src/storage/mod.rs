//! # Storage Module
//!
//! Handles persistence of the inventory state.
//!
//! The domain layer talks to storage only through [`StateStorage`]: one load
//! when the store is opened and one whole-snapshot save after every state
//! transition. The file implementation here writes a YAML record; any other
//! backend only has to implement the same two methods.

pub mod file;
pub mod traits;

pub use file::{FileConnection, StateRepository};
pub use traits::StateStorage;
