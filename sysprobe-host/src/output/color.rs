//! ANSI palette for table output

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

/// Usage above this percentage is drawn in the alert colour
pub const ALERT_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour only when stdout is a terminal
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub reset: &'static str,
    pub bold: &'static str,
    pub header: &'static str,
    pub value: &'static str,
    pub percent: &'static str,
    pub alert: &'static str,
    pub dim: &'static str,
}

impl Palette {
    pub const ANSI: Palette = Palette {
        reset: "\x1b[0m",
        bold: "\x1b[1m",
        header: "\x1b[36m",
        value: "\x1b[32m",
        percent: "\x1b[33m",
        alert: "\x1b[31m",
        dim: "\x1b[90m",
    };

    pub const PLAIN: Palette = Palette {
        reset: "",
        bold: "",
        header: "",
        value: "",
        percent: "",
        alert: "",
        dim: "",
    };

    /// Resolve once per invocation; `Auto` checks whether stdout is a terminal
    pub fn resolve(mode: ColorMode) -> Palette {
        let enabled = match mode {
            ColorMode::On => true,
            ColorMode::Off => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        };
        if enabled {
            Palette::ANSI
        } else {
            Palette::PLAIN
        }
    }

    pub fn header(&self, text: &str) -> String {
        format!("{}{}{}{}", self.bold, self.header, text, self.reset)
    }

    pub fn value(&self, text: &str) -> String {
        format!("{}{}{}", self.value, text, self.reset)
    }

    pub fn dim(&self, text: &str) -> String {
        format!("{}{}{}", self.dim, text, self.reset)
    }

    /// Wrap already-padded text in the colour matching `value`
    pub fn percent(&self, value: f64, text: &str) -> String {
        let color = if value > ALERT_THRESHOLD {
            self.alert
        } else {
            self.percent
        };
        format!("{}{}{}", color, text, self.reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_modes() {
        assert_eq!(Palette::resolve(ColorMode::On), Palette::ANSI);
        assert_eq!(Palette::resolve(ColorMode::Off), Palette::PLAIN);
    }

    #[test]
    fn test_percent_threshold() {
        let palette = Palette::ANSI;
        assert!(palette.percent(50.0, "50.00%").starts_with(palette.percent));
        assert!(palette.percent(85.0, "85.00%").starts_with(palette.alert));
        assert!(palette.percent(80.0, "80.00%").starts_with(palette.percent));
        assert_eq!(Palette::PLAIN.percent(95.0, "95.00%"), "95.00%");
    }

    #[test]
    fn test_header() {
        assert_eq!(Palette::PLAIN.header("Disk Information:"), "Disk Information:");
        assert_ne!(Palette::ANSI.header("Disk Information:"), "Disk Information:");
    }

    #[test]
    fn test_value() {
        assert_eq!(Palette::PLAIN.value("8"), "8");
        assert_eq!(Palette::ANSI.value("8"), "\x1b[32m8\x1b[0m");
    }
}
