//! CPU identity and usage
//!
//! Model name and frequency come from a platform source:
//! - Linux: `/proc/cpuinfo`
//! - macOS: `system_profiler SPHardwareDataType`
//! - Windows: `wmic cpu get Name,MaxClockSpeed /value`
//!
//! Core count is the runtime's logical processor count; thread count is
//! derived from it.

use crate::models::CpuSnapshot;
use crate::parse::label_value;
use crate::units::mhz_to_ghz;
use std::time::Duration;
use sysinfo::System;
use tracing::debug;

pub const UNKNOWN_MODEL: &str = "Unknown";
/// Reported when no platform source yields a frequency
pub const DEFAULT_FREQUENCY_GHZ: f64 = 2.4;
/// Upper bound on the usage sampling window
pub const MAX_SAMPLE_INTERVAL: Duration = Duration::from_millis(5000);

/// Model and frequency as read from a platform source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuIdentity {
    pub model: Option<String>,
    pub frequency_ghz: Option<f64>,
}

impl CpuIdentity {
    fn set_model(&mut self, value: &str) {
        if self.model.is_none() && !value.is_empty() {
            self.model = Some(value.to_string());
        }
    }

    fn set_frequency(&mut self, ghz: Option<f64>) {
        if self.frequency_ghz.is_none() {
            self.frequency_ghz = ghz.filter(|f| f.is_finite() && *f > 0.0);
        }
    }
}

/// Parse `/proc/cpuinfo`; the first "model name" and first "cpu MHz" win
pub fn parse_cpuinfo(content: &str) -> CpuIdentity {
    let mut identity = CpuIdentity::default();

    for line in content.lines() {
        if let Some(value) = label_value(line, "model name", ':') {
            identity.set_model(value);
        } else if let Some(value) = label_value(line, "cpu MHz", ':') {
            identity.set_frequency(value.parse::<f64>().ok().map(mhz_to_ghz));
        }

        if identity.model.is_some() && identity.frequency_ghz.is_some() {
            break;
        }
    }

    identity
}

/// Parse `system_profiler SPHardwareDataType` output
pub fn parse_system_profiler(output: &str) -> CpuIdentity {
    let mut identity = CpuIdentity::default();

    for line in output.lines() {
        if let Some(value) = label_value(line, "Processor Name", ':') {
            identity.set_model(value);
        } else if let Some(value) = label_value(line, "Processor Speed", ':') {
            let value = value.strip_suffix(" GHz").unwrap_or(value);
            identity.set_frequency(value.trim().parse::<f64>().ok());
        }
    }

    identity
}

/// Parse `wmic cpu get Name,MaxClockSpeed /value` output (MaxClockSpeed in MHz)
pub fn parse_wmic_cpu(output: &str) -> CpuIdentity {
    let mut identity = CpuIdentity::default();

    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key.trim() {
            "Name" => identity.set_model(value.trim()),
            "MaxClockSpeed" => {
                identity.set_frequency(value.trim().parse::<f64>().ok().map(mhz_to_ghz))
            }
            _ => {}
        }
    }

    identity
}

/// Logical processors reported by the runtime (at least 1)
pub fn logical_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Assemble the snapshot, applying the model and frequency fallbacks
pub fn snapshot(identity: CpuIdentity, cores: usize, usage_percent: f64) -> CpuSnapshot {
    let cores = cores.max(1);

    let frequency_ghz = identity.frequency_ghz.unwrap_or_else(|| {
        debug!("No CPU frequency detected, using {} GHz", DEFAULT_FREQUENCY_GHZ);
        DEFAULT_FREQUENCY_GHZ
    });

    CpuSnapshot {
        cores,
        threads: cores * 2,
        model: identity
            .model
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
        frequency_ghz,
        usage_percent: if usage_percent.is_finite() {
            usage_percent.clamp(0.0, 100.0)
        } else {
            0.0
        },
    }
}

/// Point-in-time CPU usage measurement
///
/// Disabled (always 0) unless an interval is configured. When enabled, two
/// sysinfo refreshes are taken `interval` apart; the interval is raised to
/// sysinfo's minimum and capped at [`MAX_SAMPLE_INTERVAL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageSampler {
    interval: Option<Duration>,
}

impl UsageSampler {
    pub fn disabled() -> Self {
        Self { interval: None }
    }

    pub fn new(interval: Duration) -> Self {
        if interval.is_zero() {
            return Self::disabled();
        }
        let interval = interval
            .max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
            .min(MAX_SAMPLE_INTERVAL);
        Self {
            interval: Some(interval),
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn sample(&self) -> f64 {
        let Some(interval) = self.interval else {
            return 0.0;
        };

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        std::thread::sleep(interval);
        sys.refresh_cpu_usage();

        let usage = sys.global_cpu_info().cpu_usage() as f64;
        debug!("Sampled CPU usage over {:?}: {:.2}%", interval, usage);
        usage
    }
}
