//! Per-run observation aggregation and the additive merge into memory.

pub mod run_tallies;

pub use run_tallies::RunTallies;
