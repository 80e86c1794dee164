//! # conform-core
//!
//! Core types, memory data model, errors, configuration, and events
//! for the Conform pattern-learning engine.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing_init;
pub mod types;
