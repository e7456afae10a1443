/*!
Fixture host and test harness

`FixtureHost` answers every `HostProbe` call with fixed data and counts the
calls, so facade policy (filtering, ranking, validation, the concurrent
report) can be tested without touching the real machine.
*/

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use sysprobe::models::LinkStatus;
use sysprobe::{
    CollectError, Collector, CpuSnapshot, DiskEntry, HostProbe, MemorySnapshot,
    NetworkInterfaceEntry, OsSnapshot, ProcessEntry, Request,
};

#[derive(Debug, Clone)]
pub struct FixtureHost {
    pub os: OsSnapshot,
    pub cpu: CpuSnapshot,
    /// `None` makes `memory()` fail like a failed kernel query
    pub memory: Option<MemorySnapshot>,
    pub disks: Vec<DiskEntry>,
    pub network: Vec<NetworkInterfaceEntry>,
    pub processes: Vec<ProcessEntry>,
    calls: Arc<AtomicUsize>,
}

pub fn disk(filesystem: &str, mount_point: &str, size_gb: f64, used_gb: f64) -> DiskEntry {
    DiskEntry {
        filesystem: filesystem.to_string(),
        mount_point: mount_point.to_string(),
        size_gb,
        used_gb,
        available_gb: size_gb - used_gb,
        usage_percent: if size_gb > 0.0 {
            used_gb / size_gb * 100.0
        } else {
            0.0
        },
    }
}

pub fn process(pid: u32, name: &str, cpu_percent: f64, memory_mb: f64) -> ProcessEntry {
    ProcessEntry {
        pid,
        name: name.to_string(),
        cpu_percent,
        memory_mb,
    }
}

impl FixtureHost {
    /// A small Linux-like machine
    pub fn sample() -> Self {
        Self {
            os: OsSnapshot {
                hostname: "fixture-01".to_string(),
                os: "linux".to_string(),
                platform: "Debian GNU/Linux".to_string(),
                release: "6.1.0-18-amd64".to_string(),
                arch: "x86_64".to_string(),
                uptime_seconds: 86400,
            },
            cpu: CpuSnapshot {
                cores: 4,
                threads: 8,
                model: "AMD EPYC 7B13".to_string(),
                frequency_ghz: 2.45,
                usage_percent: 0.0,
            },
            memory: Some(MemorySnapshot {
                total_gb: 16.0,
                available_gb: 12.0,
                used_gb: 4.0,
                usage_percent: 25.0,
                swap_total_gb: 2.0,
                swap_used_gb: 0.5,
            }),
            disks: vec![
                disk("/dev/sda1", "/", 100.0, 40.0),
                disk("/dev/sda2", "/home", 400.0, 360.0),
                disk("/dev/sdb1", "/mnt/backup", 1000.0, 10.0),
            ],
            network: vec![
                NetworkInterfaceEntry {
                    name: "lo".to_string(),
                    ip_addresses: vec!["127.0.0.1/8".to_string(), "::1/128".to_string()],
                    mac_address: "00:00:00:00:00:00".to_string(),
                    mtu: 65536,
                    status: LinkStatus::Up,
                },
                NetworkInterfaceEntry {
                    name: "eth0".to_string(),
                    ip_addresses: vec!["10.0.0.12/24".to_string()],
                    mac_address: "52:54:00:12:34:56".to_string(),
                    mtu: 1500,
                    status: LinkStatus::Up,
                },
                NetworkInterfaceEntry {
                    name: "wlan0".to_string(),
                    ip_addresses: Vec::new(),
                    mac_address: "a4:c3:f0:00:11:22".to_string(),
                    mtu: 1500,
                    status: LinkStatus::Down,
                },
            ],
            processes: vec![
                process(1, "systemd", 0.1, 12.0),
                process(412, "postgres", 35.0, 512.0),
                process(877, "nginx", 3.5, 48.0),
                process(1203, "cargo", 88.0, 900.0),
                process(1204, "rustc", 35.0, 1400.0),
            ],
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn without_memory(mut self) -> Self {
        self.memory = None;
        self
    }

    /// Total `HostProbe` calls across this host and its clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl HostProbe for FixtureHost {
    fn os(&self) -> OsSnapshot {
        self.hit();
        self.os.clone()
    }

    fn cpu(&self) -> CpuSnapshot {
        self.hit();
        self.cpu.clone()
    }

    fn memory(&self) -> Result<MemorySnapshot, CollectError> {
        self.hit();
        self.memory.clone().ok_or_else(|| {
            CollectError::MemoryStats(std::io::Error::new(
                std::io::ErrorKind::Other,
                "fixture memory query failed",
            ))
        })
    }

    fn disks(&self) -> Vec<DiskEntry> {
        self.hit();
        self.disks.clone()
    }

    fn network(&self) -> Vec<NetworkInterfaceEntry> {
        self.hit();
        self.network.clone()
    }

    fn processes(&self) -> Vec<ProcessEntry> {
        self.hit();
        self.processes.clone()
    }
}

/// Collector over a [`FixtureHost`] plus assertions used across tests
pub struct TestHarness {
    pub host: FixtureHost,
    pub collector: Collector<FixtureHost>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_host(FixtureHost::sample())
    }

    pub fn with_host(host: FixtureHost) -> Self {
        init_tracing();
        Self {
            collector: Collector::new(host.clone()),
            host,
        }
    }

    /// Collect `request` and return it as JSON
    pub fn collect_json(&self, request: &Request) -> Result<Value, CollectError> {
        let collected = self.collector.collect(request)?;
        Ok(serde_json::to_value(&collected).unwrap())
    }

    /// Two consecutive collections must serialize identically
    pub fn assert_idempotent(&self, request: &Request) {
        let first = self.collect_json(request).unwrap();
        let second = self.collect_json(request).unwrap();
        assert_eq!(first, second, "{} collection is not idempotent", request.domain);
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `tracing` output through the test writer (honours RUST_LOG)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysprobe::Domain;

    #[test]
    fn test_fixture_host_counts_calls() {
        let harness = TestHarness::new();
        harness.assert_idempotent(&Request::new(Domain::Os));
        assert_eq!(harness.host.call_count(), 2);
    }

    #[test]
    fn test_memory_failure_propagates() {
        let harness = TestHarness::with_host(FixtureHost::sample().without_memory());
        let result = harness.collect_json(&Request::new(Domain::Memory));
        assert!(matches!(result, Err(CollectError::MemoryStats(_))));
    }
}
