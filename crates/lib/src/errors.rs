//! Error types for configuration tree operations.
//!
//! Path lookups and mutations never fail: a missing key or a traversal through
//! a scalar resolves to "absent" and mutators become no-ops. The variants here
//! cover the remaining failure surface, which is storing and loading trees
//! and typed reads of values.

use thiserror::Error;

/// Structured error types for configuration tree operations.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored tree data could not be decoded
    #[error("Config deserialization failed: {reason}")]
    DeserializationFailed { reason: String },

    /// Stored tree was written by an unknown format version
    #[error("Unsupported config format version {found}; only version {supported} is supported")]
    UnsupportedVersion { found: u8, supported: u8 },

    /// Cleaning policy bits outside the known flags
    #[error("Invalid cleaning policy bits: {bits:#04x}")]
    InvalidPolicy { bits: u8 },

    /// A float with no serialized form (infinity or NaN) was found while storing a tree
    #[error("Cannot serialize non-finite float at '{path}'")]
    NonFiniteFloat { path: String },

    /// Value has a different type than the one requested
    #[error("Config type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl ConfigError {
    /// Check if this error is related to decoding stored data
    pub fn is_deserialization_error(&self) -> bool {
        matches!(
            self,
            ConfigError::DeserializationFailed { .. }
                | ConfigError::UnsupportedVersion { .. }
                | ConfigError::InvalidPolicy { .. }
        )
    }

    /// Check if this error is related to encoding a tree for storage
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, ConfigError::NonFiniteFloat { .. })
    }

    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, ConfigError::TypeMismatch { .. })
    }

    /// Check if this error is caused by an unknown format version
    pub fn is_version_error(&self) -> bool {
        matches!(self, ConfigError::UnsupportedVersion { .. })
    }
}

// Conversion from ConfigError to the main Error type
impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}
