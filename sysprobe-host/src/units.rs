//! Unit conversions shared by the collectors

pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
pub const KB_PER_MB: f64 = 1024.0;

/// Bytes to gigabytes (divide by 1024^3)
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Kilobytes to megabytes (divide by 1024)
pub fn kb_to_mb(kb: f64) -> f64 {
    kb / KB_PER_MB
}

pub fn mhz_to_ghz(mhz: f64) -> f64 {
    mhz / 1000.0
}

/// `part / total * 100`, 0 when total is not positive, clamped to [0, 100]
pub fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 && part.is_finite() {
        (part / total * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(0), 0.0);
        assert_eq!(bytes_to_gb(1024 * 1024 * 1024), 1.0);
        assert_eq!(bytes_to_gb(512 * 1024 * 1024), 0.5);
    }

    #[test]
    fn test_kb_to_mb() {
        assert_eq!(kb_to_mb(0.0), 0.0);
        assert_eq!(kb_to_mb(2048.0), 2.0);
        assert_eq!(kb_to_mb(512.0), 0.5);
    }

    #[test]
    fn test_percent_guards_zero_total() {
        assert_eq!(percent(10.0, 0.0), 0.0);
        assert_eq!(percent(0.0, 0.0), 0.0);
        assert_eq!(percent(25.0, 100.0), 25.0);
        assert_eq!(percent(150.0, 100.0), 100.0);
        assert!(!percent(f64::NAN, 10.0).is_nan());
    }
}
