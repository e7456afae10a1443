use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sysprobe::output::{ColorMode, Format};
use sysprobe::{Domain, SortKey};

#[derive(Parser, Debug)]
#[command(
    name = "sysprobe",
    author,
    version,
    about = "Point-in-time host metrics: OS, CPU, memory, disks, network, processes",
    long_about = None,
    after_help = r#"Examples:
  sysprobe os
  sysprobe disk --mount /home --format csv
  sysprobe process --sort memory --limit 5
  sysprobe report --format json --pretty --output host.json

Logging goes to stderr; set RUST_LOG=sysprobe=debug to see degraded lookups."#
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Output format [default: table, or the config file value]
    #[arg(long, global = true, value_enum)]
    pub format: Option<Format>,

    /// Write to FILE instead of stdout
    #[arg(long, short, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long, global = true, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Compact JSON, even when the config file enables pretty output
    #[arg(long, global = true, overrides_with = "pretty")]
    pub no_pretty: bool,

    /// Colourise table output [default: auto]
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    /// Configuration file path [default: <config dir>/sysprobe/config.toml]
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Hostname, OS family, release and uptime
    Os,
    /// CPU model, frequency, cores and usage
    Cpu,
    /// RAM and swap usage
    Memory,
    /// Usage per mounted filesystem
    Disk(DiskArgs),
    /// Network interfaces and their addresses
    Network,
    /// Top processes by CPU or memory
    Process(ProcessArgs),
    /// Every domain at once
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DiskArgs {
    /// Only disks whose mount point contains SUBSTR
    #[arg(long, value_name = "SUBSTR")]
    pub mount: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Ranking field: cpu or memory
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Number of processes to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub disk: DiskArgs,

    #[command(flatten)]
    pub process: ProcessArgs,
}

impl GlobalArgs {
    /// Pretty-print choice from the command line, `None` when neither flag was given
    pub fn pretty(&self) -> Option<bool> {
        match (self.pretty, self.no_pretty) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl Command {
    /// `None` for `report`
    pub fn domain(&self) -> Option<Domain> {
        match self {
            Command::Os => Some(Domain::Os),
            Command::Cpu => Some(Domain::Cpu),
            Command::Memory => Some(Domain::Memory),
            Command::Disk(_) => Some(Domain::Disk),
            Command::Network => Some(Domain::Network),
            Command::Process(_) => Some(Domain::Process),
            Command::Report(_) => None,
        }
    }

    pub fn disk_args(&self) -> DiskArgs {
        match self {
            Command::Disk(args) => args.clone(),
            Command::Report(args) => args.disk.clone(),
            _ => DiskArgs::default(),
        }
    }

    pub fn process_args(&self) -> ProcessArgs {
        match self {
            Command::Process(args) => args.clone(),
            Command::Report(args) => args.process.clone(),
            _ => ProcessArgs::default(),
        }
    }
}
