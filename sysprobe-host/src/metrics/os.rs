//! Operating system identity and uptime

use crate::models::OsSnapshot;
use sysinfo::System;
use tracing::debug;

/// Build the OS snapshot; uptime is supplied by the platform
pub fn snapshot(uptime_seconds: u64) -> OsSnapshot {
    let hostname = match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            debug!("Hostname lookup failed: {}", e);
            String::new()
        }
    };

    let os = std::env::consts::OS.to_string();
    let platform = System::name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| os.clone());
    let release = System::kernel_version()
        .or_else(System::os_version)
        .unwrap_or_default();

    OsSnapshot {
        hostname,
        os,
        platform,
        release,
        arch: std::env::consts::ARCH.to_string(),
        uptime_seconds,
    }
}

/// Seconds since boot from `/proc/uptime` content ("12345.67 54321.00")
pub fn parse_proc_uptime(content: &str) -> Option<u64> {
    let seconds: f64 = content.split_whitespace().next()?.parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(seconds as u64)
    } else {
        None
    }
}

/// Uptime as reported by sysinfo (0 when unknown)
pub fn sysinfo_uptime() -> u64 {
    System::uptime()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proc_uptime() {
        assert_eq!(parse_proc_uptime("350735.47 234388.90\n"), Some(350735));
        assert_eq!(parse_proc_uptime("0.99 0.10"), Some(0));
        assert_eq!(parse_proc_uptime(""), None);
        assert_eq!(parse_proc_uptime("garbage"), None);
        assert_eq!(parse_proc_uptime("-1 0"), None);
    }

    #[test]
    fn test_snapshot_fields() {
        let os = snapshot(42);
        assert_eq!(os.uptime_seconds, 42);
        assert_eq!(os.os, std::env::consts::OS);
        assert_eq!(os.arch, std::env::consts::ARCH);
        assert!(!os.platform.is_empty());
    }
}
