//! Snapshot records produced by the collectors
//!
//! Every record is a plain value created fresh per collection call. Field
//! names are the serialized (JSON / CSV header) names.

use serde::Serialize;

/// Operating system identity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsSnapshot {
    pub hostname: String,
    pub os: String,
    pub platform: String,
    pub release: String,
    pub arch: String,
    pub uptime_seconds: u64,
}

/// CPU identity and load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuSnapshot {
    pub cores: usize,
    pub threads: usize,
    pub model: String,
    pub frequency_ghz: f64,
    pub usage_percent: f64,
}

/// RAM and swap usage, in gigabytes
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MemorySnapshot {
    pub total_gb: f64,
    pub available_gb: f64,
    pub used_gb: f64,
    pub usage_percent: f64,
    pub swap_total_gb: f64,
    pub swap_used_gb: f64,
}

/// Usage of one mounted filesystem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskEntry {
    pub filesystem: String,
    pub mount_point: String,
    pub size_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub usage_percent: f64,
}

/// Network interface and the addresses bound to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInterfaceEntry {
    pub name: String,
    pub ip_addresses: Vec<String>,
    pub mac_address: String,
    pub mtu: u32,
    pub status: LinkStatus,
}

/// Administrative state of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Up,
    Down,
}

impl LinkStatus {
    pub fn from_up_flag(up: bool) -> Self {
        if up {
            LinkStatus::Up
        } else {
            LinkStatus::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Up => "up",
            LinkStatus::Down => "down",
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual process entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_status_serializes_lowercase() {
        let entry = NetworkInterfaceEntry {
            name: "eth0".to_string(),
            ip_addresses: vec!["10.0.0.2/24".to_string()],
            mac_address: "a1:b2:c3:d4:e5:f6".to_string(),
            mtu: 1500,
            status: LinkStatus::from_up_flag(true),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "up");
        assert_eq!(json["ip_addresses"][0], "10.0.0.2/24");
        assert_eq!(LinkStatus::from_up_flag(false).to_string(), "down");
    }
}
