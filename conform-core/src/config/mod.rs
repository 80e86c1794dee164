//! Configuration system for Conform.
//! TOML-based, layered resolution: env > project > user > defaults.

pub mod conform_config;
pub mod engine_config;
pub mod memory_config;

pub use conform_config::ConformConfig;
pub use engine_config::EngineConfig;
pub use memory_config::MemoryConfig;
