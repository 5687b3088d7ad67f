//! Error types for the Galaxy3D spatial partition subsystem
//!
//! Hot-path operations (insert, remove, queries, culling) are total and never
//! return errors. These types cover the configuration boundary and handle
//! lookups against the object registry.

use std::fmt;

/// Result type for partition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Spatial partition errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Partition or octree configuration rejected at construction
    InvalidConfig(String),

    /// Object handle no longer refers to a live object
    StaleHandle(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::StaleHandle(msg) => write!(f, "Stale object handle: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
