//!
//! dotconf: immutable configuration trees addressed by dot-separated paths.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: A closed sum type of null, booleans, numbers, text, lists and maps.
//!   Whether a container is a list or a map is decided structurally: a non-empty container whose keys
//!   are exactly `0..len-1` in order is a list, anything else (including an empty container) is a map.
//! * **Paths (`path::PathBuf`)**: Dot-separated keys such as `"server.tls.cert"`. Empty segments are ignored,
//!   so `"a..b."` addresses the same location as `"a.b"`.
//! * **Trees (`tree::ConfigTree`)**: The root container plus a cleaning policy. Trees are never mutated in place;
//!   every operation returns a new tree that shares untouched sub-trees with the original.
//! * **Cleaning policies (`policy::CleanPolicy`)**: Flags controlling whether nulls and empty containers are
//!   stripped after each change. The policy travels with every tree derived from the original.
//! * **Merge strategies (`merge::MergeStrategy`)**: Replace, keep or append when combining two trees.
//!
//! ## Example
//!
//! ```
//! use dotconf::{ConfigTree, MergeStrategy, Value};
//!
//! let tree = ConfigTree::new()
//!     .with("server.host", "localhost")
//!     .with("server.port", 8080);
//! assert_eq!(tree.get_as::<i64>("server.port"), Some(8080));
//!
//! let tree = tree.append("server.aliases", "example.org");
//! assert_eq!(tree.count(), 3);
//!
//! let defaults = Value::map([("server", Value::map([("timeout", 30)]))]);
//! let merged = tree.merge(defaults, MergeStrategy::Keep);
//! assert_eq!(merged.get_as::<i64>("server.timeout"), Some(30));
//! assert_eq!(merged.get_as::<&str>("server.host"), Some("localhost"));
//! ```

pub mod errors;
pub mod merge;
pub mod path;
pub mod policy;
pub mod tree;
pub mod value;

pub use errors::ConfigError;
pub use merge::MergeStrategy;
pub use path::PathBuf;
pub use policy::CleanPolicy;
pub use tree::ConfigTree;
pub use value::{Map, Value};

/// Result type used throughout the dotconf library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the dotconf library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from tree loading and typed reads
    #[error(transparent)]
    Config(ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Config(_) => "config",
        }
    }

    /// Check if this error happened while encoding or decoding a tree.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Config(config_err) => {
                config_err.is_serialization_error() || config_err.is_deserialization_error()
            }
        }
    }

    /// Check if this error is a type mismatch on a typed read.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_type_error(),
            _ => false,
        }
    }
}
