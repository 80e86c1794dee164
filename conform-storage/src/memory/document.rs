//! Versioned on-disk envelope for a project's memory.

use conform_core::errors::MemoryError;
use conform_core::types::ProjectMemory;
use serde::{Deserialize, Serialize};

/// Current memory document schema version. Bumping it makes older
/// documents reset gracefully on load instead of failing to parse.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// The persisted document: schema version plus the memory itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub schema_version: u32,
    pub memory: ProjectMemory,
}

/// Minimal probe used to read the schema version out of a document
/// whose body may not match the current schema.
#[derive(Debug, Deserialize)]
struct SchemaProbe {
    schema_version: u32,
}

impl MemoryDocument {
    /// Wrap memory in the current envelope.
    pub fn current(memory: ProjectMemory) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            memory,
        }
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> Result<String, MemoryError> {
        serde_json::to_string_pretty(self).map_err(|e| MemoryError::Serialize {
            message: e.to_string(),
        })
    }

    /// Parse a document, checking the schema version before the body so
    /// an incompatible version surfaces as `SchemaMismatch` rather than
    /// a parse failure deep in the memory model.
    pub fn from_json(content: &str, path: &str) -> Result<Self, MemoryError> {
        let probe: SchemaProbe =
            serde_json::from_str(content).map_err(|e| MemoryError::Corrupt {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        if probe.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(MemoryError::SchemaMismatch {
                found: probe.schema_version,
                current: CURRENT_SCHEMA_VERSION,
            });
        }
        serde_json::from_str(content).map_err(|e| MemoryError::Corrupt {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
