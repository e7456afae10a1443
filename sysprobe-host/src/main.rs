//! sysprobe - print a point-in-time snapshot of the local host
//!
//! Each subcommand collects one metric domain (`report` collects all of
//! them) and renders it as a table, JSON or CSV on stdout or into a file.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use sysprobe::config::ProbeConfig;
use sysprobe::output::{Formatter, Palette, Writer};
use sysprobe::{Collector, NativeHost, ReportRequest};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sysprobe=warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ProbeConfig::load(cli.global.config.as_deref()).await?;

    let format = cli.global.format.unwrap_or(config.output.format);
    let pretty = cli.global.pretty().unwrap_or(config.output.pretty);
    let palette = Palette::resolve(cli.global.color.unwrap_or(config.output.color));
    let formatter = Formatter::new(format, pretty, palette);

    let disk_args = cli.command.disk_args();
    let process_args = cli.command.process_args();
    let mut options = ReportRequest::default().with_processes(
        process_args.sort.unwrap_or(config.process.sort),
        process_args.limit.unwrap_or(config.process.limit),
    );
    if let Some(mount) = disk_args.mount {
        options = options.with_mount_filter(mount);
    }

    let settings = config.probe_settings();
    debug!("Probe settings: {:?}", settings);
    let collector = Collector::new(NativeHost::new(&settings));

    let rendered = match cli.command.domain() {
        Some(domain) => {
            let request = options.for_domain(domain);
            let task_collector = collector.clone();
            let collected = tokio::task::spawn_blocking(move || task_collector.collect(&request))
                .await
                .context("Collection task failed")?
                .with_context(|| format!("Failed to collect {} metrics", domain))?;
            formatter.render(&collected)
        }
        None => {
            let report = collector
                .report(&options)
                .await
                .context("Failed to collect host report")?;
            formatter.render_report(&report)
        }
    }
    .with_context(|| format!("Failed to render {} output", format))?;

    let writer = match &cli.global.output {
        Some(path) => Writer::file(path),
        None => Writer::stdout(),
    };
    writer.write(&rendered).await.with_context(|| match writer.path() {
        Some(path) => format!("Failed to write {}", path.display()),
        None => "Failed to write to stdout".to_string(),
    })?;

    Ok(())
}
