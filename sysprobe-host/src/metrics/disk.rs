//! Disk usage per mounted filesystem
//!
//! - Linux: device-backed mounts from the mount table, sized with `statvfs`
//! - macOS / other Unix: a fixed list of well-known mount points
//! - Windows: drive letters C: through Z: via `GetDiskFreeSpaceExW`

use crate::models::DiskEntry;
use crate::units::{bytes_to_gb, percent};

/// Mount points probed where the mount table is not read
pub const WELL_KNOWN_MOUNTS: &[&str] = &["/", "/Volumes"];

/// One device-backed line of the mount table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub filesystem: String,
    pub mount_point: String,
}

/// Capacity of one filesystem in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsUsage {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Parse `/etc/mtab` / `/proc/mounts` content, keeping only `/dev` mounts
pub fn parse_mount_table(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let filesystem = fields.next()?;
            let mount_point = fields.next()?;
            if !filesystem.starts_with("/dev") {
                return None;
            }
            Some(MountEntry {
                filesystem: unescape_mount_field(filesystem),
                mount_point: unescape_mount_field(mount_point),
            })
        })
        .collect()
}

/// Decode the octal escapes the kernel uses for blanks (`\040`, `\011`, ...)
pub fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Build an entry; used = total - available, usage recomputed from used/total
pub fn entry(filesystem: &str, mount_point: &str, usage: FsUsage) -> DiskEntry {
    let used = usage.total_bytes.saturating_sub(usage.available_bytes);

    DiskEntry {
        filesystem: filesystem.to_string(),
        mount_point: mount_point.to_string(),
        size_gb: bytes_to_gb(usage.total_bytes),
        used_gb: bytes_to_gb(used),
        available_gb: bytes_to_gb(usage.available_bytes),
        usage_percent: percent(used as f64, usage.total_bytes as f64),
    }
}

/// Keep entries whose mount point contains `filter` (no filter keeps all)
pub fn filter_by_mount(entries: Vec<DiskEntry>, filter: Option<&str>) -> Vec<DiskEntry> {
    match filter {
        Some(filter) if !filter.is_empty() => entries
            .into_iter()
            .filter(|disk| disk.mount_point.contains(filter))
            .collect(),
        _ => entries,
    }
}

/// Query a mounted filesystem with `statvfs`
#[cfg(unix)]
pub fn statvfs_usage(mount_point: &str) -> Option<FsUsage> {
    let stat = match nix::sys::statvfs::statvfs(mount_point) {
        Ok(stat) => stat,
        Err(e) => {
            tracing::debug!("statvfs({}) failed: {}", mount_point, e);
            return None;
        }
    };

    let fragment = stat.fragment_size() as u64;
    Some(FsUsage {
        total_bytes: (stat.blocks() as u64).saturating_mul(fragment),
        available_bytes: (stat.blocks_available() as u64).saturating_mul(fragment),
    })
}

/// Query a drive root such as `C:\` with `GetDiskFreeSpaceExW`
#[cfg(windows)]
pub fn drive_usage(root: &str) -> Option<FsUsage> {
    use std::os::windows::ffi::OsStrExt;
    use winapi::shared::ntdef::ULARGE_INTEGER;
    use winapi::um::fileapi::GetDiskFreeSpaceExW;

    let wide: Vec<u16> = std::ffi::OsStr::new(root)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: all out-pointers reference zero-initialized locals and the path is NUL-terminated.
    unsafe {
        let mut available: ULARGE_INTEGER = std::mem::zeroed();
        let mut total: ULARGE_INTEGER = std::mem::zeroed();
        let mut total_free: ULARGE_INTEGER = std::mem::zeroed();
        let ok = GetDiskFreeSpaceExW(wide.as_ptr(), &mut available, &mut total, &mut total_free);
        if ok == 0 {
            return None;
        }
        Some(FsUsage {
            total_bytes: *total.QuadPart(),
            available_bytes: *total_free.QuadPart(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    fn disk(mount_point: &str) -> DiskEntry {
        entry("/dev/sda1", mount_point, FsUsage { total_bytes: GB, available_bytes: GB })
    }

    #[test]
    fn test_parse_mount_table_keeps_device_mounts() {
        let content = "\
# comment line
/dev/sda1 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev 0 0
/dev/nvme0n1p2 /home/user/My\\040Files ext4 rw 0 0
short
";
        let mounts = parse_mount_table(content);
        assert_eq!(
            mounts,
            vec![
                MountEntry {
                    filesystem: "/dev/sda1".to_string(),
                    mount_point: "/".to_string(),
                },
                MountEntry {
                    filesystem: "/dev/nvme0n1p2".to_string(),
                    mount_point: "/home/user/My Files".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unescape_mount_field() {
        assert_eq!(unescape_mount_field("/mnt/a\\040b"), "/mnt/a b");
        assert_eq!(unescape_mount_field("/mnt/tab\\011x"), "/mnt/tab\tx");
        assert_eq!(unescape_mount_field("/mnt/plain"), "/mnt/plain");
        assert_eq!(unescape_mount_field("/mnt/trailing\\04"), "/mnt/trailing\\04");
        assert_eq!(unescape_mount_field("/mnt/not\\999"), "/mnt/not\\999");
    }

    #[test]
    fn test_entry_usage() {
        let disk = entry(
            "/dev/sda1",
            "/",
            FsUsage {
                total_bytes: 100 * GB,
                available_bytes: 25 * GB,
            },
        );
        assert_eq!(disk.size_gb, 100.0);
        assert_eq!(disk.used_gb, 75.0);
        assert_eq!(disk.available_gb, 25.0);
        assert_eq!(disk.usage_percent, 75.0);
    }

    #[test]
    fn test_entry_zero_size() {
        let disk = entry("/dev/loop0", "/snap/core", FsUsage::default());
        assert_eq!(disk.usage_percent, 0.0);
        assert!(!disk.usage_percent.is_nan());
    }

    #[test]
    fn test_filter_by_mount() {
        let disks = vec![disk("/"), disk("/home"), disk("/boot/efi"), disk("/home/backup")];

        let filtered = filter_by_mount(disks.clone(), Some("home"));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|d| d.mount_point.contains("home")));

        assert_eq!(filter_by_mount(disks.clone(), None).len(), 4);
        assert_eq!(filter_by_mount(disks.clone(), Some("")).len(), 4);
        assert!(filter_by_mount(disks, Some("/mnt")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_statvfs_root() {
        let usage = statvfs_usage("/").unwrap();
        assert!(usage.total_bytes >= usage.available_bytes);
        assert!(statvfs_usage("/sysprobe/does/not/exist").is_none());
    }
}
