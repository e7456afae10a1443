//! Memory and swap usage
//!
//! - Linux: one `sysinfo(2)` call; failure is a hard error
//! - macOS / other Unix: the sysinfo crate
//! - Windows: `GlobalMemoryStatusEx`; failure yields an all-zero snapshot

use crate::models::MemorySnapshot;
use crate::units::{bytes_to_gb, percent};

/// Counters as reported by the kernel, in units of `unit` bytes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMemoryCounters {
    pub total_ram: u64,
    pub free_ram: u64,
    pub total_swap: u64,
    pub free_swap: u64,
    pub unit: u64,
}

impl RawMemoryCounters {
    /// Scale by the unit size (0 is treated as 1) and derive the snapshot
    pub fn into_snapshot(self) -> MemorySnapshot {
        let unit = if self.unit == 0 { 1 } else { self.unit };
        let total = self.total_ram.saturating_mul(unit);
        let free = self.free_ram.saturating_mul(unit);
        let swap_total = self.total_swap.saturating_mul(unit);
        let swap_used = self
            .total_swap
            .saturating_sub(self.free_swap)
            .saturating_mul(unit);

        from_bytes(total, free, swap_total, swap_used)
    }
}

/// Build a snapshot from byte counts; used = total - available
pub fn from_bytes(total: u64, available: u64, swap_total: u64, swap_used: u64) -> MemorySnapshot {
    let used = total.saturating_sub(available);

    MemorySnapshot {
        total_gb: bytes_to_gb(total),
        available_gb: bytes_to_gb(available),
        used_gb: bytes_to_gb(used),
        usage_percent: percent(used as f64, total as f64),
        swap_total_gb: bytes_to_gb(swap_total),
        swap_used_gb: bytes_to_gb(swap_used),
    }
}

/// Read raw counters with `sysinfo(2)`
#[cfg(target_os = "linux")]
pub fn read_kernel_counters() -> std::io::Result<RawMemoryCounters> {
    use nix::libc;

    // SAFETY: `sysinfo` only writes into the zero-initialized struct we own.
    let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::sysinfo(&mut info) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(RawMemoryCounters {
        total_ram: info.totalram as u64,
        free_ram: info.freeram as u64,
        total_swap: info.totalswap as u64,
        free_swap: info.freeswap as u64,
        unit: info.mem_unit as u64,
    })
}

/// Memory counters from the sysinfo crate
pub fn sysinfo_snapshot() -> MemorySnapshot {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();

    from_bytes(
        sys.total_memory(),
        sys.available_memory(),
        sys.total_swap(),
        sys.used_swap(),
    )
}

#[cfg(windows)]
pub fn global_memory_status() -> Option<MemorySnapshot> {
    use winapi::um::sysinfoapi::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

    // SAFETY: the struct is zero-initialized with dwLength set as the API requires.
    let mut status: MEMORYSTATUSEX = unsafe { std::mem::zeroed() };
    status.dwLength = std::mem::size_of::<MEMORYSTATUSEX>() as u32;
    if unsafe { GlobalMemoryStatusEx(&mut status) } == 0 {
        return None;
    }

    Some(from_bytes(
        status.ullTotalPhys,
        status.ullAvailPhys,
        status.ullTotalPageFile,
        status.ullTotalPageFile.saturating_sub(status.ullAvailPageFile),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_counters_scaled_by_unit() {
        let counters = RawMemoryCounters {
            total_ram: 16 * 1024 * 1024,
            free_ram: 4 * 1024 * 1024,
            total_swap: 2 * 1024 * 1024,
            free_swap: 1024 * 1024,
            unit: 1024,
        };
        let memory = counters.into_snapshot();
        assert_eq!(memory.total_gb, 16.0);
        assert_eq!(memory.available_gb, 4.0);
        assert_eq!(memory.used_gb, 12.0);
        assert_eq!(memory.usage_percent, 75.0);
        assert_eq!(memory.swap_total_gb, 2.0);
        assert_eq!(memory.swap_used_gb, 1.0);
    }

    #[test]
    fn test_zero_unit_treated_as_bytes() {
        let counters = RawMemoryCounters {
            total_ram: 8 * GB,
            free_ram: 2 * GB,
            unit: 0,
            ..Default::default()
        };
        let memory = counters.into_snapshot();
        assert_eq!(memory.total_gb, 8.0);
        assert_eq!(memory.used_gb, 6.0);
    }

    #[test]
    fn test_zero_total_has_zero_usage() {
        let memory = RawMemoryCounters::default().into_snapshot();
        assert_eq!(memory, MemorySnapshot::default());
        assert_eq!(memory.usage_percent, 0.0);
    }

    #[test]
    fn test_available_above_total_saturates() {
        let memory = from_bytes(GB, 2 * GB, 0, 0);
        assert_eq!(memory.used_gb, 0.0);
        assert_eq!(memory.usage_percent, 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_kernel_counters() {
        let memory = read_kernel_counters().unwrap().into_snapshot();
        assert!(memory.total_gb > 0.0);
        assert!((0.0..=100.0).contains(&memory.usage_percent));
    }
}
