use std::fs;

use serde::Serialize;

use crate::error::Result;

use super::{Procfs, parse_f64, parse_u64, read_opt};

/// System memory sample from the meminfo file, in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemInfo {
    pub available: u64,
    pub free: u64,
    pub buffers: u64,
}

impl MemInfo {
    /// Utilization ratio `1 - free / (available - buffers)`.
    ///
    /// `None` when the denominator is zero: the ratio is undefined, not
    /// zero.
    pub fn utilization(&self) -> Option<f64> {
        let denom = self.available as f64 - self.buffers as f64;
        if denom == 0.0 {
            return None;
        }
        Some(1.0 - self.free as f64 / denom)
    }
}

impl Procfs {
    /// OS display name: the `PRETTY_NAME` value of the OS-release file,
    /// quotes stripped, spaces intact. `None` when the key or file is
    /// absent.
    pub fn operating_system(&self) -> Option<String> {
        let contents = read_opt(&self.os_release)?;
        for line in contents.lines() {
            if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
                return Some(value.trim().trim_matches('"').to_string());
            }
        }
        None
    }

    /// Kernel release: the third whitespace token of the version file.
    pub fn kernel(&self) -> Option<String> {
        let contents = read_opt(&self.proc_root.join("version"))?;
        let line = contents.lines().next()?;
        line.split_whitespace().nth(2).map(str::to_string)
    }

    /// Every PID currently exposed under the proc root.
    ///
    /// A PID is a directory whose name is all ASCII digits; anything else
    /// (`self`, `net`, plain files) is skipped. Order is whatever the OS
    /// hands back from directory iteration.
    pub fn pids(&self) -> Vec<u32> {
        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            return Vec::new();
        };
        let mut pids = Vec::new();
        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let name = entry.file_name();
            if let Some(name) = name.to_str()
                && !name.is_empty()
                && name.bytes().all(|b| b.is_ascii_digit())
                && let Ok(pid) = name.parse::<u32>()
            {
                pids.push(pid);
            }
        }
        pids
    }

    /// Memory sample from the meminfo file.
    ///
    /// Scans for `MemAvailable:`, `MemFree:` and `Buffers:` and stops once
    /// all three are seen. `Ok(None)` when the file or any key is absent.
    pub fn mem_info(&self) -> Result<Option<MemInfo>> {
        let path = self.proc_root.join("meminfo");
        let Some(contents) = read_opt(&path) else {
            return Ok(None);
        };

        let mut available = None;
        let mut free = None;
        let mut buffers = None;
        for line in contents.lines() {
            let slot = if line.starts_with("MemAvailable:") {
                &mut available
            } else if line.starts_with("MemFree:") {
                &mut free
            } else if line.starts_with("Buffers:") {
                &mut buffers
            } else {
                continue;
            };
            if let Some(token) = line.split_whitespace().nth(1) {
                *slot = Some(parse_u64(token, &path, "memory kB")?);
            }
            if available.is_some() && free.is_some() && buffers.is_some() {
                break;
            }
        }

        match (available, free, buffers) {
            (Some(available), Some(free), Some(buffers)) => Ok(Some(MemInfo {
                available,
                free,
                buffers,
            })),
            _ => Ok(None),
        }
    }

    /// Seconds since boot: the first token of the uptime file, which the
    /// kernel writes with a fractional part, truncated to whole seconds.
    pub fn uptime_secs(&self) -> Result<Option<u64>> {
        let path = self.proc_root.join("uptime");
        let Some(contents) = read_opt(&path) else {
            return Ok(None);
        };
        let Some(token) = contents.split_whitespace().next() else {
            return Ok(None);
        };
        let secs = parse_f64(token, &path, "uptime seconds")?;
        Ok(Some(secs as u64))
    }

    /// Total number of processes forked since boot (`processes` line).
    pub fn total_processes(&self) -> Result<Option<u64>> {
        self.stat_counter("processes")
    }

    /// Number of processes currently runnable (`procs_running` line).
    pub fn running_processes(&self) -> Result<Option<u64>> {
        self.stat_counter("procs_running")
    }

    fn stat_counter(&self, key: &'static str) -> Result<Option<u64>> {
        let path = self.proc_root.join("stat");
        let Some(contents) = read_opt(&path) else {
            return Ok(None);
        };
        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            if fields.next() != Some(key) {
                continue;
            }
            let Some(token) = fields.next() else {
                return Ok(None);
            };
            return parse_u64(token, &path, key).map(Some);
        }
        Ok(None)
    }
}
