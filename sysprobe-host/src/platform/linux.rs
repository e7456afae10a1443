//! Linux host: procfs and sysfs files plus `sysinfo(2)` / `statvfs(3)`

use super::ProbeSettings;
use crate::error::CollectError;
use crate::metrics::cpu::{self, UsageSampler};
use crate::metrics::disk::{self, FsUsage};
use crate::metrics::{memory, network, os, process, HostProbe};
use crate::models::{
    CpuSnapshot, DiskEntry, MemorySnapshot, NetworkInterfaceEntry, OsSnapshot, ProcessEntry,
};
use std::path::PathBuf;
use tracing::debug;

/// Filesystem statistics lookup for a mount point
pub type StatFs = fn(&str) -> Option<FsUsage>;

/// Reads host state from the files under `root` (normally `/`)
#[derive(Debug, Clone)]
pub struct LinuxHost {
    root: PathBuf,
    sampler: UsageSampler,
    statfs: StatFs,
}

impl LinuxHost {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self::with_root("/", settings)
    }

    /// Read `proc/`, `sys/` and `etc/` below `root` instead of `/`
    pub fn with_root(root: impl Into<PathBuf>, settings: &ProbeSettings) -> Self {
        Self {
            root: root.into(),
            sampler: UsageSampler::new(settings.cpu_sample),
            statfs: disk::statvfs_usage,
        }
    }

    /// Replace the `statvfs` lookup
    pub fn with_statfs(mut self, statfs: StatFs) -> Self {
        self.statfs = statfs;
        self
    }

    fn read(&self, relative: &str) -> Option<String> {
        let path = self.root.join(relative);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn mount_table(&self) -> Option<String> {
        self.read("etc/mtab")
            .or_else(|| self.read("proc/self/mounts"))
    }

    fn mtu(&self, interface: &str) -> u32 {
        self.read(&format!("sys/class/net/{}/mtu", interface))
            .and_then(|content| network::parse_mtu(&content))
            .unwrap_or(0)
    }
}

impl HostProbe for LinuxHost {
    fn os(&self) -> OsSnapshot {
        let uptime = self
            .read("proc/uptime")
            .and_then(|content| os::parse_proc_uptime(&content))
            .unwrap_or(0);
        os::snapshot(uptime)
    }

    fn cpu(&self) -> CpuSnapshot {
        let identity = self
            .read("proc/cpuinfo")
            .map(|content| cpu::parse_cpuinfo(&content))
            .unwrap_or_default();
        cpu::snapshot(identity, cpu::logical_cores(), self.sampler.sample())
    }

    fn memory(&self) -> Result<MemorySnapshot, CollectError> {
        let counters = memory::read_kernel_counters().map_err(CollectError::MemoryStats)?;
        Ok(counters.into_snapshot())
    }

    fn disks(&self) -> Vec<DiskEntry> {
        let Some(table) = self.mount_table() else {
            return Vec::new();
        };

        disk::parse_mount_table(&table)
            .into_iter()
            .filter_map(|mount| {
                let usage = (self.statfs)(&mount.mount_point)?;
                Some(disk::entry(&mount.filesystem, &mount.mount_point, usage))
            })
            .collect()
    }

    fn network(&self) -> Vec<NetworkInterfaceEntry> {
        let links = network::unix_links(|name| self.mtu(name));
        network::assemble(links, &network::bound_addresses())
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        process::scan_procfs(&self.root.join("proc"))
    }
}
