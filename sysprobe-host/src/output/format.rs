//! Per-domain renderers

use super::{Format, Palette};
use crate::metrics::{Collected, HostReport};
use crate::models::{
    CpuSnapshot, DiskEntry, MemorySnapshot, NetworkInterfaceEntry, OsSnapshot, ProcessEntry,
};
use serde::Serialize;

/// Renders collected metrics in one [`Format`]
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: Format,
    pretty: bool,
    palette: Palette,
}

impl Formatter {
    pub fn new(format: Format, pretty: bool, palette: Palette) -> Self {
        Self {
            format,
            pretty,
            palette,
        }
    }

    /// Render a single domain result
    pub fn render(&self, collected: &Collected) -> Result<String, serde_json::Error> {
        match self.format {
            Format::Json => self.json(collected),
            Format::Table => Ok(self.table(collected)),
            Format::Csv => Ok(csv(collected)),
        }
    }

    /// Render all six sections; table and CSV sections are separated by a blank line
    pub fn render_report(&self, report: &HostReport) -> Result<String, serde_json::Error> {
        match self.format {
            Format::Json => self.json(report),
            Format::Table => Ok(join_sections(
                report.sections().iter().map(|s| self.table(s)),
            )),
            Format::Csv => Ok(join_sections(report.sections().iter().map(csv))),
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        let mut rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        rendered.push('\n');
        Ok(rendered)
    }

    fn table(&self, collected: &Collected) -> String {
        match collected {
            Collected::Os(os) => self.os_table(os),
            Collected::Cpu(cpu) => self.cpu_table(cpu),
            Collected::Memory(memory) => self.memory_table(memory),
            Collected::Disks(disks) => self.disk_table(disks),
            Collected::Network(interfaces) => self.network_table(interfaces),
            Collected::Processes(processes) => self.process_table(processes),
        }
    }

    fn pct(&self, value: f64, width: usize) -> String {
        self.palette
            .percent(value, &format!("{:>width$.2}%", value, width = width))
    }

    fn os_table(&self, os: &OsSnapshot) -> String {
        let mut out = format!("{}\n", self.palette.header("OS Information:"));
        let p = &self.palette;
        out.push_str(&format!("  Hostname:      {}\n", p.value(&os.hostname)));
        out.push_str(&format!("  OS:            {}\n", p.value(&os.os)));
        out.push_str(&format!("  Platform:      {}\n", p.value(&os.platform)));
        out.push_str(&format!("  Release:       {}\n", p.value(&os.release)));
        out.push_str(&format!("  Architecture:  {}\n", p.value(&os.arch)));
        out.push_str(&format!("  Uptime:        {} seconds\n", p.value(&os.uptime_seconds.to_string())));
        out
    }

    fn cpu_table(&self, cpu: &CpuSnapshot) -> String {
        let mut out = format!("{}\n", self.palette.header("CPU Information:"));
        let p = &self.palette;
        out.push_str(&format!("  Cores:         {}\n", p.value(&cpu.cores.to_string())));
        out.push_str(&format!("  Threads:       {}\n", p.value(&cpu.threads.to_string())));
        out.push_str(&format!("  Model:         {}\n", p.value(&cpu.model)));
        out.push_str(&format!("  Frequency:     {} GHz\n", p.value(&format!("{:.2}", cpu.frequency_ghz))));
        out.push_str(&format!("  Usage:         {}\n", self.pct(cpu.usage_percent, 0)));
        out
    }

    fn memory_table(&self, memory: &MemorySnapshot) -> String {
        let mut out = format!("{}\n", self.palette.header("Memory Information:"));
        let gb = |value: f64| self.palette.value(&format!("{:.2}", value));
        out.push_str(&format!("  Total:         {} GB\n", gb(memory.total_gb)));
        out.push_str(&format!("  Available:     {} GB\n", gb(memory.available_gb)));
        out.push_str(&format!("  Used:          {} GB\n", gb(memory.used_gb)));
        out.push_str(&format!("  Usage:         {}\n", self.pct(memory.usage_percent, 0)));
        out.push_str(&format!("  Swap Total:    {} GB\n", gb(memory.swap_total_gb)));
        out.push_str(&format!("  Swap Used:     {} GB\n", gb(memory.swap_used_gb)));
        out
    }

    fn disk_table(&self, disks: &[DiskEntry]) -> String {
        let mut out = format!("{}\n", self.palette.header("Disk Information:"));
        out.push_str("  Filesystem          Mount Point        Size       Used   Available   Usage%\n");
        out.push_str(&format!(
            "  {}\n",
            self.palette
                .dim("------------------  -----------  ----------  ---------  ----------  -------")
        ));

        for d in disks {
            out.push_str(&format!(
                "  {:<18}  {:<11}  {:>10.2}  {:>9.2}  {:>10.2}  {}\n",
                d.filesystem,
                d.mount_point,
                d.size_gb,
                d.used_gb,
                d.available_gb,
                self.pct(d.usage_percent, 6)
            ));
        }
        out
    }

    fn network_table(&self, interfaces: &[NetworkInterfaceEntry]) -> String {
        let mut out = format!("{}\n", self.palette.header("Network Interfaces:"));
        out.push_str("  Name         Status   IP Addresses\n");
        out.push_str(&format!(
            "  {}\n",
            self.palette
                .dim("-----------  -------  ------------------------------------------")
        ));

        for i in interfaces {
            out.push_str(&format!(
                "  {:<11}  {:<7}  {}\n",
                i.name,
                i.status.as_str(),
                i.ip_addresses.join(", ")
            ));
        }
        out
    }

    fn process_table(&self, processes: &[ProcessEntry]) -> String {
        let mut out = format!("{}\n", self.palette.header("Top Processes:"));
        out.push_str("  PID     Name               CPU%  Memory(MB)\n");
        out.push_str(&format!(
            "  {}\n",
            self.palette.dim("------  ---------------  -------  ----------")
        ));

        for p in processes {
            out.push_str(&format!(
                "  {:<6}  {:<15}  {}  {:>10.2}\n",
                p.pid,
                p.name,
                self.pct(p.cpu_percent, 6),
                p.memory_mb
            ));
        }
        out
    }
}

fn join_sections(sections: impl Iterator<Item = String>) -> String {
    sections.collect::<Vec<_>>().join("\n")
}

/// Quote a CSV field when it contains a separator, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv(collected: &Collected) -> String {
    match collected {
        Collected::Os(os) => format!(
            "hostname,os,platform,release,architecture,uptime_seconds\n{},{},{},{},{},{}\n",
            csv_field(&os.hostname),
            csv_field(&os.os),
            csv_field(&os.platform),
            csv_field(&os.release),
            csv_field(&os.arch),
            os.uptime_seconds
        ),
        Collected::Cpu(cpu) => format!(
            "cores,threads,model,frequency_ghz,usage_percent\n{},{},{},{:.2},{:.2}\n",
            cpu.cores,
            cpu.threads,
            csv_field(&cpu.model),
            cpu.frequency_ghz,
            cpu.usage_percent
        ),
        Collected::Memory(m) => format!(
            "total_gb,available_gb,used_gb,usage_percent,swap_total_gb,swap_used_gb\n{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}\n",
            m.total_gb, m.available_gb, m.used_gb, m.usage_percent, m.swap_total_gb, m.swap_used_gb
        ),
        Collected::Disks(disks) => {
            let mut out =
                String::from("filesystem,mount_point,size_gb,used_gb,available_gb,usage_percent\n");
            for d in disks {
                out.push_str(&format!(
                    "{},{},{:.2},{:.2},{:.2},{:.2}\n",
                    csv_field(&d.filesystem),
                    csv_field(&d.mount_point),
                    d.size_gb,
                    d.used_gb,
                    d.available_gb,
                    d.usage_percent
                ));
            }
            out
        }
        Collected::Network(interfaces) => {
            let mut out = String::from("name,ip_addresses,mac_address,mtu,status\n");
            for i in interfaces {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    csv_field(&i.name),
                    csv_field(&i.ip_addresses.join(";")),
                    csv_field(&i.mac_address),
                    i.mtu,
                    i.status
                ));
            }
            out
        }
        Collected::Processes(processes) => {
            let mut out = String::from("pid,name,cpu_percent,memory_mb\n");
            for p in processes {
                out.push_str(&format!(
                    "{},{},{:.2},{:.2}\n",
                    p.pid,
                    csv_field(&p.name),
                    p.cpu_percent,
                    p.memory_mb
                ));
            }
            out
        }
    }
}
