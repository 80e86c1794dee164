//! Memory document format, locking, and the store itself.

pub mod document;
pub mod lock;
pub mod store;
