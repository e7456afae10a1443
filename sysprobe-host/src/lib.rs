//! sysprobe - host metrics collection
//!
//! Collects point-in-time snapshots of the local host:
//! - OS identity and uptime
//! - CPU model, frequency and core counts
//! - Memory and swap usage
//! - Disk usage per mounted filesystem
//! - Network interfaces with their addresses
//! - Top processes by CPU or memory
//!
//! Each domain is normalized from platform-specific sources (kernel calls,
//! `/proc` files, output of diagnostic commands) into the records of
//! [`models`]. The [`metrics::Collector`] facade dispatches a [`metrics::Request`]
//! to the native [`platform`] implementation.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod output;
pub mod parse;
pub mod platform;
pub mod runner;
pub mod units;

pub use error::CollectError;
pub use metrics::{
    Collected, Collector, Domain, HostProbe, HostReport, ReportRequest, Request, SortKey,
};
pub use models::{
    CpuSnapshot, DiskEntry, MemorySnapshot, NetworkInterfaceEntry, OsSnapshot, ProcessEntry,
};
pub use platform::{NativeHost, ProbeSettings};
pub use runner::{CommandRunner, SystemRunner};
