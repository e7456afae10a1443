//! Rendering collected metrics as JSON, aligned tables or CSV

pub mod color;
pub mod format;
pub mod writer;

pub use color::{ColorMode, Palette};
pub use format::Formatter;
pub use writer::Writer;

use serde::{Deserialize, Serialize};

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    #[default]
    Table,
    Csv,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Table => "table",
            Format::Csv => "csv",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
