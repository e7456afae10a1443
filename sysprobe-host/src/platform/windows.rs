//! Windows host: Win32 calls plus `wmic` and `tasklist`

use super::ProbeSettings;
use crate::error::CollectError;
use crate::metrics::cpu::{self, CpuIdentity, UsageSampler};
use crate::metrics::{disk, memory, network, os, process, HostProbe};
use crate::models::{
    CpuSnapshot, DiskEntry, MemorySnapshot, NetworkInterfaceEntry, OsSnapshot, ProcessEntry,
};
use crate::runner::{CommandRunner, SystemRunner};
use std::sync::Arc;
use tracing::debug;

pub struct WindowsHost {
    runner: Arc<dyn CommandRunner>,
    sampler: UsageSampler,
}

impl WindowsHost {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self::with_runner(Arc::new(SystemRunner::new(settings.command_timeout)), settings)
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>, settings: &ProbeSettings) -> Self {
        Self {
            runner,
            sampler: UsageSampler::new(settings.cpu_sample),
        }
    }
}

impl HostProbe for WindowsHost {
    fn os(&self) -> OsSnapshot {
        os::snapshot(os::sysinfo_uptime())
    }

    fn cpu(&self) -> CpuSnapshot {
        let identity = self
            .runner
            .run("wmic", &["cpu", "get", "Name,MaxClockSpeed", "/value"])
            .map(|output| cpu::parse_wmic_cpu(&output))
            .unwrap_or_else(CpuIdentity::default);
        cpu::snapshot(identity, cpu::logical_cores(), self.sampler.sample())
    }

    fn memory(&self) -> Result<MemorySnapshot, CollectError> {
        match memory::global_memory_status() {
            Some(snapshot) => Ok(snapshot),
            None => {
                debug!("GlobalMemoryStatusEx failed, reporting zeroed memory");
                Ok(MemorySnapshot::default())
            }
        }
    }

    fn disks(&self) -> Vec<DiskEntry> {
        ('C'..='Z')
            .filter_map(|letter| {
                let name = format!("{}:", letter);
                let root = format!("{}:\\", letter);
                let usage = disk::drive_usage(&root)?;
                Some(disk::entry(&name, &root, usage))
            })
            .collect()
    }

    fn network(&self) -> Vec<NetworkInterfaceEntry> {
        network::from_adapters(network::windows_adapters())
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        self.runner
            .run("tasklist", &["/v", "/fo", "csv", "/nh"])
            .map(|output| process::parse_tasklist_csv(&output))
            .unwrap_or_default()
    }
}
