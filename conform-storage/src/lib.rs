//! # conform-storage
//!
//! Durable, per-project memory for the Conform learning engine: one
//! versioned JSON document per project, guarded by an exclusive file
//! lock, written atomically at the end of a run.

pub mod memory;

pub use memory::document::{MemoryDocument, CURRENT_SCHEMA_VERSION};
pub use memory::store::{LoadStatus, MemoryStore};
