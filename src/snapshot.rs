use serde::Serialize;

use crate::error::Result;
use crate::procfs::{CpuTimes, MemInfo, Procfs};

/// One point-in-time reading of the system.
///
/// Every field is an independent snapshot value; `None` means the metric
/// was unavailable at capture time, not that it was zero. Rates (CPU
/// percentage) are deliberately absent: retain two snapshots and diff
/// their `cpu` samples.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub uptime_secs: Option<u64>,
    pub memory: Option<MemInfo>,
    pub memory_utilization: Option<f64>,
    pub total_processes: Option<u64>,
    pub running_processes: Option<u64>,
    pub cpu: Option<CpuTimes>,
    pub processes: Vec<ProcessRow>,
}

/// Identity and resource figures for a single process.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRow {
    pub pid: u32,
    pub user: Option<String>,
    pub command: Option<String>,
    pub memory_gb: Option<String>,
    pub age_secs: Option<u64>,
}

/// Read a full snapshot: system scalars plus one row per live PID.
///
/// Rows are sorted by PID so output is stable across the unspecified
/// directory iteration order. A process that exits mid-capture simply
/// yields `None` fields; a malformed numeric token anywhere aborts the
/// capture with a typed error.
pub fn capture(procfs: &Procfs) -> Result<SystemSnapshot> {
    let _span = tracing::debug_span!("snapshot.capture").entered();

    let uptime_secs = procfs.uptime_secs()?;
    let memory = procfs.mem_info()?;

    let mut pids = procfs.pids();
    pids.sort_unstable();

    let mut processes = Vec::with_capacity(pids.len());
    for pid in pids {
        processes.push(process_row(procfs, pid, uptime_secs)?);
    }

    Ok(SystemSnapshot {
        os: procfs.operating_system(),
        kernel: procfs.kernel(),
        uptime_secs,
        memory,
        memory_utilization: memory.and_then(|m| m.utilization()),
        total_processes: procfs.total_processes()?,
        running_processes: procfs.running_processes()?,
        cpu: procfs.cpu_times()?,
        processes,
    })
}

/// Read one process row. `uptime_secs` is the system uptime the age is
/// derived against; pass the value captured alongside the row.
pub fn process_row(procfs: &Procfs, pid: u32, uptime_secs: Option<u64>) -> Result<ProcessRow> {
    let start_secs = procfs.process_start_secs(pid)?;
    let age_secs = match (uptime_secs, start_secs) {
        (Some(uptime), Some(start)) => Some(uptime.saturating_sub(start)),
        _ => None,
    };
    Ok(ProcessRow {
        pid,
        user: procfs.user_name(pid),
        command: procfs.command(pid),
        memory_gb: procfs.resident_memory_gb(pid)?,
        age_secs,
    })
}
