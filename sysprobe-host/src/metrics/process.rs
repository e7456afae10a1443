//! Process listing and ranking
//!
//! - Linux: `/proc/<pid>/status` ("Name:" and "VmRSS:" labels)
//! - macOS / other Unix: `ps aux`
//! - Windows: `tasklist /v /fo csv /nh`
//!
//! CPU percent is only available from `ps`; the other sources report 0.

use crate::models::ProcessEntry;
use crate::parse::{parse_memory_kb_to_mb, split_quoted_csv, strip_quotes};
use crate::units::kb_to_mb;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Minimum column count of a `ps aux` row
/// (USER PID %CPU %MEM VSZ RSS TT STAT STARTED TIME COMMAND)
pub const PS_AUX_MIN_COLUMNS: usize = 11;
/// Minimum field count of a `tasklist /fo csv` row
pub const TASKLIST_MIN_FIELDS: usize = 5;

/// Field the process list is ranked by, descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Cpu => "cpu",
            SortKey::Memory => "memory",
        }
    }

    fn value(&self, entry: &ProcessEntry) -> f64 {
        match self {
            SortKey::Cpu => entry.cpu_percent,
            SortKey::Memory => entry.memory_mb,
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = crate::CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(SortKey::Cpu),
            "memory" => Ok(SortKey::Memory),
            other => Err(crate::CollectError::InvalidSortKey(other.to_string())),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort descending by `key` (ties keep enumeration order) and keep `limit`
pub fn rank(mut entries: Vec<ProcessEntry>, key: SortKey, limit: usize) -> Vec<ProcessEntry> {
    entries.sort_by(|a, b| key.value(b).total_cmp(&key.value(a)));
    entries.truncate(limit);
    entries
}

/// Name and resident memory from `/proc/<pid>/status`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStatus {
    pub name: Option<String>,
    pub rss_kb: Option<f64>,
}

pub fn parse_proc_status(content: &str) -> ProcStatus {
    let mut status = ProcStatus::default();

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("Name:") {
            if status.name.is_none() {
                status.name = Some(rest.trim().to_string());
            }
        } else if let Some(rest) = line.strip_prefix("VmRSS:") {
            if status.rss_kb.is_none() {
                status.rss_kb = rest
                    .split_whitespace()
                    .next()
                    .and_then(|kb| kb.parse().ok());
            }
        }

        if status.name.is_some() && status.rss_kb.is_some() {
            break;
        }
    }

    status
}

/// Scan a procfs mount (normally `/proc`) for numeric PID directories
pub fn scan_procfs(proc_root: &Path) -> Vec<ProcessEntry> {
    let entries = match std::fs::read_dir(proc_root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read {}: {}", proc_root.display(), e);
            return Vec::new();
        }
    };

    let mut processes = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(pid) = file_name.to_str().and_then(|n| n.parse::<u32>().ok()) else {
            continue;
        };

        // Processes may exit between listing and reading
        let status = std::fs::read_to_string(entry.path().join("status"))
            .map(|content| parse_proc_status(&content))
            .unwrap_or_default();

        processes.push(ProcessEntry {
            pid,
            name: status.name.unwrap_or_else(|| format!("pid-{}", pid)),
            cpu_percent: 0.0,
            memory_mb: status.rss_kb.map(kb_to_mb).unwrap_or(0.0),
        });
    }

    debug!("Scanned {} processes under {}", processes.len(), proc_root.display());
    processes
}

/// Parse `ps aux` output
pub fn parse_ps_aux(output: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < PS_AUX_MIN_COLUMNS {
                return None;
            }

            let pid = fields[1].parse::<u32>().ok()?;
            let cpu_percent = fields[2]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0);
            let rss_kb = fields[5]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(0.0);

            let command = fields[10..].join(" ");
            let name = match command.rfind('/') {
                Some(idx) => command[idx + 1..].to_string(),
                None => command,
            };

            Some(ProcessEntry {
                pid,
                name,
                cpu_percent,
                memory_mb: kb_to_mb(rss_kb),
            })
        })
        .collect()
}

/// Parse `tasklist /v /fo csv /nh` output
pub fn parse_tasklist_csv(output: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let fields = split_quoted_csv(line);
            if fields.len() < TASKLIST_MIN_FIELDS {
                return None;
            }

            let pid = strip_quotes(&fields[1]).parse::<u32>().ok()?;

            Some(ProcessEntry {
                pid,
                name: strip_quotes(&fields[0]).to_string(),
                cpu_percent: 0.0,
                memory_mb: parse_memory_kb_to_mb(strip_quotes(&fields[4])),
            })
        })
        .collect()
}
