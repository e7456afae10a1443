//! macOS and other non-Linux Unix hosts
//!
//! CPU identity and the process list come from `system_profiler` and `ps`
//! through a [`CommandRunner`]; memory and uptime come from sysinfo.

use super::ProbeSettings;
use crate::error::CollectError;
use crate::metrics::cpu::{self, CpuIdentity, UsageSampler};
use crate::metrics::disk::{self, FsUsage, WELL_KNOWN_MOUNTS};
use crate::metrics::{memory, network, os, process, HostProbe};
use crate::models::{
    CpuSnapshot, DiskEntry, MemorySnapshot, NetworkInterfaceEntry, OsSnapshot, ProcessEntry,
};
use crate::runner::{CommandRunner, SystemRunner};
use std::sync::Arc;

/// Filesystem label reported for the well-known mount points
pub const DISK_FILESYSTEM: &str = "disk";

pub struct MacHost {
    runner: Arc<dyn CommandRunner>,
    sampler: UsageSampler,
    statfs: fn(&str) -> Option<FsUsage>,
}

impl MacHost {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self::with_runner(Arc::new(SystemRunner::new(settings.command_timeout)), settings)
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>, settings: &ProbeSettings) -> Self {
        Self {
            runner,
            sampler: UsageSampler::new(settings.cpu_sample),
            statfs: disk::statvfs_usage,
        }
    }

    /// Replace the `statvfs` lookup
    pub fn with_statfs(mut self, statfs: fn(&str) -> Option<FsUsage>) -> Self {
        self.statfs = statfs;
        self
    }
}

impl HostProbe for MacHost {
    fn os(&self) -> OsSnapshot {
        os::snapshot(os::sysinfo_uptime())
    }

    fn cpu(&self) -> CpuSnapshot {
        let identity = self
            .runner
            .run("system_profiler", &["SPHardwareDataType"])
            .map(|output| cpu::parse_system_profiler(&output))
            .unwrap_or_else(CpuIdentity::default);
        cpu::snapshot(identity, cpu::logical_cores(), self.sampler.sample())
    }

    fn memory(&self) -> Result<MemorySnapshot, CollectError> {
        Ok(memory::sysinfo_snapshot())
    }

    fn disks(&self) -> Vec<DiskEntry> {
        WELL_KNOWN_MOUNTS
            .iter()
            .filter_map(|mount| {
                let usage = (self.statfs)(mount)?;
                Some(disk::entry(DISK_FILESYSTEM, mount, usage))
            })
            .collect()
    }

    fn network(&self) -> Vec<NetworkInterfaceEntry> {
        let links = network::unix_links(|name| network::ioctl_mtu(name).unwrap_or(0));
        network::assemble(links, &network::bound_addresses())
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        self.runner
            .run("ps", &["aux"])
            .map(|output| process::parse_ps_aux(&output))
            .unwrap_or_default()
    }
}
