use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use serde::Serialize;
use tracing::debug;

use proctop::config;
use proctop::format::{elapsed_time, format_bytes, truncate_unicode};
use proctop::procfs::Procfs;
use proctop::snapshot::{self, SystemSnapshot};

const COMMAND_COLUMN_WIDTH: usize = 60;

#[derive(Parser)]
#[command(
    name = "proctop",
    about = "One-shot procfs snapshot for terminal process monitors"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root of the process pseudo-filesystem
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// OS-release file
    #[arg(long)]
    os_release: Option<PathBuf>,

    /// Password database file
    #[arg(long)]
    passwd: Option<PathBuf>,

    /// Milliseconds between the two CPU samples (0 skips the second sample)
    #[arg(long)]
    sample_ms: Option<u64>,

    /// Emit the snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Show a detail block for one PID instead of the table
    #[arg(long)]
    pid: Option<u32>,

    /// Maximum number of table rows
    #[arg(long)]
    rows: Option<usize>,

    /// Log at debug level
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

/// What `--json` serializes: the snapshot plus the one figure derived from
/// the two CPU samples taken around the sampling interval.
#[derive(Serialize)]
struct Report {
    #[serde(flatten)]
    snapshot: SystemSnapshot,
    cpu_usage: Option<f64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let config = load_config_for_cli(&cli);
    let procfs = Procfs::with_roots(
        &config.paths.proc_root,
        &config.paths.os_release,
        &config.paths.passwd,
    );

    if let Some(pid) = cli.pid {
        return print_pid_detail(&procfs, pid);
    }

    // First CPU sample before the interval; the snapshot carries the second.
    let sample_ms = config.general.sample_ms;
    let first_cpu = procfs.cpu_times()?;
    if sample_ms > 0 {
        thread::sleep(Duration::from_millis(sample_ms));
    }

    let snapshot = snapshot::capture(&procfs)?;
    debug!(processes = snapshot.processes.len(), "captured snapshot");

    let cpu_usage = match (first_cpu, snapshot.cpu) {
        (Some(prev), Some(next)) if sample_ms > 0 => next.usage_since(&prev),
        _ => None,
    };

    if cli.json || config.general.output == "json" {
        let report = Report { snapshot, cpu_usage };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&snapshot, cpu_usage, config.general.rows);
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };

    if let Some(ms) = cli.sample_ms {
        config.general.sample_ms = ms;
    }
    if let Some(rows) = cli.rows {
        config.general.rows = rows;
    }
    if let Some(ref root) = cli.proc_root {
        config.paths.proc_root = root.clone();
    }
    if let Some(ref path) = cli.os_release {
        config.paths.os_release = path.clone();
    }
    if let Some(ref path) = cli.passwd {
        config.paths.passwd = path.clone();
    }

    config
}

fn print_table(snapshot: &SystemSnapshot, cpu_usage: Option<f64>, rows: usize) {
    if let Some(os) = &snapshot.os {
        println!("OS:      {os}");
    }
    if let Some(kernel) = &snapshot.kernel {
        println!("Kernel:  {kernel}");
    }
    if let Some(uptime) = snapshot.uptime_secs {
        println!("Uptime:  {}", elapsed_time(uptime));
    }
    if let Some(usage) = cpu_usage {
        println!("CPU:     {:.1}%", usage * 100.0);
    }
    if let Some(ratio) = snapshot.memory_utilization {
        println!("Memory:  {:.1}%", ratio * 100.0);
    }
    if let Some(mem) = snapshot.memory {
        println!(
            "         {} free of {} available",
            format_bytes(mem.free * 1024),
            format_bytes(mem.available * 1024)
        );
    }
    if let (Some(total), Some(running)) = (snapshot.total_processes, snapshot.running_processes) {
        println!("Procs:   {running} running / {total} forked");
    }

    println!();
    println!(
        "{:>7} {:<12} {:>8} {:>10}  COMMAND",
        "PID", "USER", "MEM(GB)", "AGE"
    );
    for row in snapshot.processes.iter().take(rows) {
        let user = row.user.as_deref().unwrap_or("-");
        let memory = row.memory_gb.as_deref().unwrap_or("-");
        let age = row.age_secs.map(elapsed_time).unwrap_or_else(|| "-".into());
        let command = match row.command.as_deref() {
            Some("") | None => "-".to_string(),
            Some(cmd) => truncate_unicode(cmd, COMMAND_COLUMN_WIDTH),
        };
        println!(
            "{:>7} {:<12} {:>8} {:>10}  {}",
            row.pid,
            truncate_unicode(user, 12),
            memory,
            age,
            command
        );
    }
}

fn print_pid_detail(procfs: &Procfs, pid: u32) -> Result<()> {
    let uptime = procfs.uptime_secs()?;
    let row = snapshot::process_row(procfs, pid, uptime)?;

    println!("PID:      {}", row.pid);
    println!("User:     {}", row.user.as_deref().unwrap_or("-"));
    println!("Command:  {}", row.command.as_deref().unwrap_or("-"));
    println!("Mem (GB): {}", row.memory_gb.as_deref().unwrap_or("-"));
    match row.age_secs {
        Some(age) => println!("Age:      {}", elapsed_time(age)),
        None => println!("Age:      -"),
    }

    Ok(())
}
