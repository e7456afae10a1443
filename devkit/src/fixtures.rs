/*!
Fixture trees and canned diagnostic output

`FixtureTree` lays out the subset of `/proc`, `/sys` and `/etc` the Linux
host reads, inside a temporary directory removed on drop.
*/

use anyhow::{Context, Result};
use std::path::Path;
use tempfile::TempDir;

pub const SAMPLE_CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cpu MHz\t\t: 2394.454
cache size\t: 35840 KB

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
cpu MHz\t\t: 1200.000
";

/// One real device and two virtual filesystems
pub const SAMPLE_MTAB: &str = "\
/dev/sda1 / ext4 rw,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev,mode=755 0 0
";

pub const SAMPLE_SYSTEM_PROFILER: &str = "\
Hardware:

    Hardware Overview:

      Model Name: MacBook Pro
      Processor Name: Quad-Core Intel Core i7
      Processor Speed: 2.3 GHz
      Number of Processors: 1
      Total Number of Cores: 4
";

pub const SAMPLE_PS_AUX: &str = "\
USER               PID  %CPU %MEM      VSZ    RSS   TT  STAT STARTED      TIME COMMAND
alice             1234  12.5  1.2  4500000 204800   ??  S     9:00AM   1:02.03 /Applications/Safari.app/Contents/MacOS/Safari
root                 1   0.0  0.1  4300000  10240   ??  Ss    8:00AM   0:10.00 /sbin/launchd
alice              501  45.0  3.4  5000000 512000   ??  R     9:05AM   3:00.00 /usr/local/bin/cargo build
";

pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create fixture directory")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `relative`, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> Result<&Self> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(self)
    }

    pub fn cpuinfo(&self, content: &str) -> Result<&Self> {
        self.write("proc/cpuinfo", content)
    }

    pub fn uptime(&self, seconds: f64) -> Result<&Self> {
        self.write("proc/uptime", &format!("{:.2} {:.2}\n", seconds, seconds * 2.0))
    }

    pub fn mtab(&self, content: &str) -> Result<&Self> {
        self.write("etc/mtab", content)
    }

    /// `/proc/<pid>/status`; `None` omits the VmRSS line like a kernel thread
    pub fn process(&self, pid: u32, name: &str, rss_kb: Option<u64>) -> Result<&Self> {
        let mut status = format!("Name:\t{}\nState:\tS (sleeping)\nPid:\t{}\n", name, pid);
        if let Some(kb) = rss_kb {
            status.push_str(&format!("VmRSS:\t{:>8} kB\n", kb));
        }
        self.write(&format!("proc/{}/status", pid), &status)
    }

    pub fn mtu(&self, interface: &str, mtu: u32) -> Result<&Self> {
        self.write(&format!("sys/class/net/{}/mtu", interface), &format!("{}\n", mtu))
    }

    /// CPU info, uptime, the sample mtab and three processes
    pub fn standard() -> Result<Self> {
        let tree = Self::new()?;
        tree.cpuinfo(SAMPLE_CPUINFO)?
            .uptime(12345.67)?
            .mtab(SAMPLE_MTAB)?
            .process(1, "systemd", Some(12288))?
            .process(2, "kthreadd", None)?
            .process(812, "postgres", Some(524288))?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tree_layout() {
        let tree = FixtureTree::standard().unwrap();
        let root = tree.root();
        assert!(root.join("proc/cpuinfo").is_file());
        assert!(root.join("etc/mtab").is_file());
        let status = std::fs::read_to_string(root.join("proc/812/status")).unwrap();
        assert!(status.starts_with("Name:\tpostgres\n"));
        assert!(status.contains("VmRSS:\t  524288 kB\n"));
        let uptime = std::fs::read_to_string(root.join("proc/uptime")).unwrap();
        assert_eq!(uptime, "12345.67 24691.34\n");
    }
}
