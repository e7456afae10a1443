//! Collection errors
//!
//! Only a few situations are hard failures: the Linux memory statistics call,
//! malformed requests, and a collector task that could not be joined.
//! Everything else degrades to default values inside the collectors.

/// Errors returned by the collection layer
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Memory statistics unavailable: {0}")]
    MemoryStats(#[source] std::io::Error),

    #[error("Unknown domain: {0} (expected os, cpu, memory, disk, network or process)")]
    UnknownDomain(String),

    #[error("Invalid sort key: {0} (must be cpu or memory)")]
    InvalidSortKey(String),

    #[error("Limit must be >= 1")]
    InvalidLimit,

    #[error("Collector task for {domain} failed: {reason}")]
    TaskFailed { domain: String, reason: String },
}
