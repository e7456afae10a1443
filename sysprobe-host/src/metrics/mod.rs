//! Host metrics collection
//!
//! Provides the per-domain collectors and the facade dispatching to them:
//! - [`os`]: hostname, OS family, release, uptime
//! - [`cpu`]: model, frequency, core counts, optional usage sampling
//! - [`memory`]: RAM and swap usage
//! - [`disk`]: usage per mounted filesystem
//! - [`network`]: interfaces, addresses, link state
//! - [`process`]: top processes by CPU or memory
//!
//! Platform sources live behind [`HostProbe`]; [`Collector`] adds the
//! platform-independent policy (disk filtering, process ranking, request
//! validation) on top.

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;
pub mod os;
pub mod process;

pub use process::SortKey;

use crate::error::CollectError;
use crate::models::{
    CpuSnapshot, DiskEntry, MemorySnapshot, NetworkInterfaceEntry, OsSnapshot, ProcessEntry,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// One collection method per domain, implemented once per platform
pub trait HostProbe: Send + Sync {
    fn os(&self) -> OsSnapshot;
    fn cpu(&self) -> CpuSnapshot;
    /// The only collector allowed to fail hard
    fn memory(&self) -> Result<MemorySnapshot, CollectError>;
    /// All disks, unfiltered
    fn disks(&self) -> Vec<DiskEntry>;
    fn network(&self) -> Vec<NetworkInterfaceEntry>;
    /// All processes in enumeration order, unranked
    fn processes(&self) -> Vec<ProcessEntry>;
}

/// Metric domain selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Os,
    Cpu,
    Memory,
    Disk,
    Network,
    Process,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Os,
        Domain::Cpu,
        Domain::Memory,
        Domain::Disk,
        Domain::Network,
        Domain::Process,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Os => "os",
            Domain::Cpu => "cpu",
            Domain::Memory => "memory",
            Domain::Disk => "disk",
            Domain::Network => "network",
            Domain::Process => "process",
        }
    }
}

impl std::str::FromStr for Domain {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CollectError::UnknownDomain(s.to_string()))
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single collection request
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub domain: Domain,
    /// Substring a disk's mount point must contain
    pub mount_filter: Option<String>,
    pub sort: SortKey,
    pub limit: usize,
}

pub const DEFAULT_PROCESS_LIMIT: usize = 10;

impl Request {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            mount_filter: None,
            sort: SortKey::default(),
            limit: DEFAULT_PROCESS_LIMIT,
        }
    }

    pub fn with_mount_filter(mut self, filter: impl Into<String>) -> Self {
        self.mount_filter = Some(filter.into());
        self
    }

    pub fn with_processes(mut self, sort: SortKey, limit: usize) -> Self {
        self.sort = sort;
        self.limit = limit;
        self
    }
}

/// Options for a whole-host report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub mount_filter: Option<String>,
    pub sort: SortKey,
    pub limit: usize,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            mount_filter: None,
            sort: SortKey::default(),
            limit: DEFAULT_PROCESS_LIMIT,
        }
    }
}

impl ReportRequest {
    pub fn with_mount_filter(mut self, filter: impl Into<String>) -> Self {
        self.mount_filter = Some(filter.into());
        self
    }

    pub fn with_processes(mut self, sort: SortKey, limit: usize) -> Self {
        self.sort = sort;
        self.limit = limit;
        self
    }

    /// The single-domain request carrying the same options
    pub fn for_domain(&self, domain: Domain) -> Request {
        Request {
            domain,
            mount_filter: self.mount_filter.clone(),
            sort: self.sort,
            limit: self.limit,
        }
    }
}

/// Result of one collection, shaped by its domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Collected {
    Os(OsSnapshot),
    Cpu(CpuSnapshot),
    Memory(MemorySnapshot),
    Disks(Vec<DiskEntry>),
    Network(Vec<NetworkInterfaceEntry>),
    Processes(Vec<ProcessEntry>),
}

impl Collected {
    pub fn domain(&self) -> Domain {
        match self {
            Collected::Os(_) => Domain::Os,
            Collected::Cpu(_) => Domain::Cpu,
            Collected::Memory(_) => Domain::Memory,
            Collected::Disks(_) => Domain::Disk,
            Collected::Network(_) => Domain::Network,
            Collected::Processes(_) => Domain::Process,
        }
    }
}

/// Every domain collected at once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostReport {
    pub os: OsSnapshot,
    pub cpu: CpuSnapshot,
    pub memory: MemorySnapshot,
    pub disk: Vec<DiskEntry>,
    pub network: Vec<NetworkInterfaceEntry>,
    pub process: Vec<ProcessEntry>,
}

impl HostReport {
    /// Sections in display order
    pub fn sections(&self) -> Vec<Collected> {
        vec![
            Collected::Os(self.os.clone()),
            Collected::Cpu(self.cpu.clone()),
            Collected::Memory(self.memory.clone()),
            Collected::Disks(self.disk.clone()),
            Collected::Network(self.network.clone()),
            Collected::Processes(self.process.clone()),
        ]
    }
}

/// Dispatches requests to a [`HostProbe`]
pub struct Collector<H> {
    host: Arc<H>,
}

impl<H> Clone for Collector<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<H: HostProbe> Collector<H> {
    pub fn new(host: H) -> Self {
        Self {
            host: Arc::new(host),
        }
    }

    /// Collect the requested domain
    pub fn collect(&self, request: &Request) -> Result<Collected, CollectError> {
        debug!("Collecting {} metrics", request.domain);

        let collected = match request.domain {
            Domain::Os => Collected::Os(self.host.os()),
            Domain::Cpu => Collected::Cpu(self.host.cpu()),
            Domain::Memory => Collected::Memory(self.host.memory()?),
            Domain::Disk => Collected::Disks(self.disks(request.mount_filter.as_deref())),
            Domain::Network => Collected::Network(self.host.network()),
            Domain::Process => {
                Collected::Processes(self.top_processes(request.sort, request.limit)?)
            }
        };

        Ok(collected)
    }

    /// Disks whose mount point contains `mount_filter`
    pub fn disks(&self, mount_filter: Option<&str>) -> Vec<DiskEntry> {
        disk::filter_by_mount(self.host.disks(), mount_filter)
    }

    /// Up to `limit` processes, descending by `sort`
    pub fn top_processes(
        &self,
        sort: SortKey,
        limit: usize,
    ) -> Result<Vec<ProcessEntry>, CollectError> {
        if limit == 0 {
            return Err(CollectError::InvalidLimit);
        }
        let processes = self.host.processes();
        debug!("Ranking {} processes by {} (limit {})", processes.len(), sort, limit);
        Ok(process::rank(processes, sort, limit))
    }
}

impl<H: HostProbe + 'static> Collector<H> {
    /// Collect all six domains concurrently on the blocking pool
    pub async fn report(&self, request: &ReportRequest) -> Result<HostReport, CollectError> {
        if request.limit == 0 {
            return Err(CollectError::InvalidLimit);
        }

        let os = self.spawn(Domain::Os, |c| c.host.os());
        let cpu = self.spawn(Domain::Cpu, |c| c.host.cpu());
        let memory = self.spawn(Domain::Memory, |c| c.host.memory());
        let filter = request.mount_filter.clone();
        let disk = self.spawn(Domain::Disk, move |c| c.disks(filter.as_deref()));
        let network = self.spawn(Domain::Network, |c| c.host.network());
        let (sort, limit) = (request.sort, request.limit);
        let process = self.spawn(Domain::Process, move |c| c.top_processes(sort, limit));

        let (os, cpu, memory, disk, network, process) =
            tokio::join!(os, cpu, memory, disk, network, process);

        Ok(HostReport {
            os: os?,
            cpu: cpu?,
            memory: memory??,
            disk: disk?,
            network: network?,
            process: process??,
        })
    }

    fn spawn<T, F>(
        &self,
        domain: Domain,
        f: F,
    ) -> impl std::future::Future<Output = Result<T, CollectError>>
    where
        T: Send + 'static,
        F: FnOnce(&Collector<H>) -> T + Send + 'static,
    {
        let collector = self.clone();
        let handle = tokio::task::spawn_blocking(move || f(&collector));
        async move {
            handle.await.map_err(|e| CollectError::TaskFailed {
                domain: domain.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_from_str() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert!(matches!(
            "gpu".parse::<Domain>(),
            Err(CollectError::UnknownDomain(name)) if name == "gpu"
        ));
    }

    #[test]
    fn test_request_builder() {
        let request = Request::new(Domain::Process).with_processes(SortKey::Memory, 3);
        assert_eq!(request.sort, SortKey::Memory);
        assert_eq!(request.limit, 3);
        assert!(request.mount_filter.is_none());

        let request = Request::new(Domain::Disk).with_mount_filter("/home");
        assert_eq!(request.mount_filter.as_deref(), Some("/home"));
        assert_eq!(request.limit, DEFAULT_PROCESS_LIMIT);
    }

    #[test]
    fn test_report_request_options_carry_to_domains() {
        let options = ReportRequest::default()
            .with_mount_filter("/var")
            .with_processes(SortKey::Cpu, 4);

        let request = options.for_domain(Domain::Disk);
        assert_eq!(request.domain, Domain::Disk);
        assert_eq!(request.mount_filter.as_deref(), Some("/var"));
        assert_eq!(request.sort, SortKey::Cpu);
        assert_eq!(request.limit, 4);

        let defaults = ReportRequest::default();
        assert_eq!(defaults.limit, DEFAULT_PROCESS_LIMIT);
        assert_eq!(defaults.for_domain(Domain::Process), Request::new(Domain::Process));
    }
}
