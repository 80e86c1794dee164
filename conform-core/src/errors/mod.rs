//! Error handling for Conform.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod feedback_error;
pub mod memory_error;
pub mod normalize_error;

pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use error_code::ConformErrorCode;
pub use feedback_error::FeedbackError;
pub use memory_error::MemoryError;
pub use normalize_error::NormalizeError;
