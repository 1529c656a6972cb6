//! Pool registry errors
//!
//! Every variant is recoverable: the registry is left consistent and the
//! caller may retry with corrected arguments.

use thiserror::Error;

/// Pool registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No pool is registered under the name
    #[error("There is no pool with the name: {name}")]
    PoolNotFound {
        /// Requested pool name
        name: String,
    },

    /// A pool with this name already exists
    #[error("There is already a pool with the name: {name}")]
    DuplicatePoolName {
        /// Conflicting pool name
        name: String,
    },

    /// The pool does not own the released resource and adoption is disabled
    #[error("Resource is not part of pool: {name}")]
    ResourceUnrecognized {
        /// Pool the resource was released to
        name: String,
    },

    /// Pool names must not be empty
    #[error("Pool name must not be empty")]
    InvalidPoolName,

    /// The name is reserved for the quarantine pool
    #[error("Pool name is reserved: {name}")]
    ReservedPoolName {
        /// Reserved name that was used
        name: String,
    },

    /// The pool has no free slot and no template to grow from
    #[error("Pool {name} is exhausted and has no template to grow from")]
    TemplateMissing {
        /// Exhausted pool name
        name: String,
    },

    /// The handle refers to a resource that has been destroyed
    #[error("Resource handle is stale or null")]
    StaleHandle,

    /// The resource is already free in its pool
    #[error("Resource was already released to pool: {name}")]
    DoubleRelease {
        /// Pool the resource belongs to
        name: String,
    },
}

impl PoolError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::PoolNotFound { name: name.to_string() }
    }
}

/// Result alias for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
