//! Platform implementations of [`HostProbe`](crate::metrics::HostProbe)
//!
//! The native host is selected at compile time:
//! - Linux: [`LinuxHost`] (procfs, sysfs, kernel calls)
//! - macOS and other Unix: [`MacHost`] (diagnostic commands, statvfs)
//! - Windows: [`WindowsHost`] (Win32 calls, wmic, tasklist)

use crate::runner::DEFAULT_COMMAND_TIMEOUT;
use std::time::Duration;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxHost;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::MacHost;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsHost;

#[cfg(target_os = "linux")]
pub type NativeHost = LinuxHost;

#[cfg(all(unix, not(target_os = "linux")))]
pub type NativeHost = MacHost;

#[cfg(windows)]
pub type NativeHost = WindowsHost;

#[cfg(not(any(unix, windows)))]
compile_error!("sysprobe supports Unix and Windows hosts only");

/// Knobs shared by every platform implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Time limit for each external diagnostic command
    pub command_timeout: Duration,
    /// CPU usage sampling window; zero disables sampling
    pub cpu_sample: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            cpu_sample: Duration::ZERO,
        }
    }
}
