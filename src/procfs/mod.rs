//! Stateless readers over the kernel's process pseudo-filesystem.
//!
//! Every reader opens one file, scans it once, and returns a typed value.
//! Nothing is cached and nothing is retained between calls, so concurrent
//! callers polling the same metric are safe by construction. Absent files
//! and absent keys come back as `None`; a token that is present but not
//! numeric surfaces as [`MetricsError`](crate::error::MetricsError). The
//! readers never log and never retry; all signaling is by value.

mod cpu;
mod process;
mod system;

pub use cpu::CpuTimes;
pub use system::MemInfo;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MetricsError, Result};

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";
pub const DEFAULT_PASSWD: &str = "/etc/passwd";

/// Handle to the pseudo-filesystem roots the readers scan.
///
/// Holds paths only: no file handles, no cached contents. The roots are
/// overridable so tests (and containers with a bind-mounted `/proc`) can
/// point the readers at an arbitrary directory tree.
#[derive(Debug, Clone)]
pub struct Procfs {
    proc_root: PathBuf,
    os_release: PathBuf,
    passwd: PathBuf,
}

impl Default for Procfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Procfs {
    pub fn new() -> Self {
        Self::with_roots(DEFAULT_PROC_ROOT, DEFAULT_OS_RELEASE, DEFAULT_PASSWD)
    }

    pub fn with_roots(
        proc_root: impl Into<PathBuf>,
        os_release: impl Into<PathBuf>,
        passwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            proc_root: proc_root.into(),
            os_release: os_release.into(),
            passwd: passwd.into(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    fn pid_path(&self, pid: u32, file: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(file)
    }
}

/// Ticks-per-second conversion constant (`_SC_CLK_TCK`).
///
/// Falls back to the kernel's historical default of 100 when the lookup
/// fails.
pub fn clock_ticks_per_sec() -> u64 {
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 { ticks as u64 } else { 100 }
}

/// Fail-soft read: a missing or unreadable file is `None`, never an error.
fn read_opt(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

fn parse_u64(token: &str, file: &Path, what: &'static str) -> Result<u64> {
    token.parse().map_err(|_| MetricsError::Malformed {
        file: file.to_path_buf(),
        what,
        token: token.to_string(),
    })
}

fn parse_f64(token: &str, file: &Path, what: &'static str) -> Result<f64> {
    token.parse().map_err(|_| MetricsError::Malformed {
        file: file.to_path_buf(),
        what,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ticks_is_sane() {
        let ticks = clock_ticks_per_sec();
        assert!(ticks > 0);
    }

    #[test]
    fn parse_u64_reports_the_offending_token() {
        let err = parse_u64("12x4", Path::new("/proc/meminfo"), "memory kB").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("12x4"));
        assert!(msg.contains("meminfo"));
    }

    #[test]
    fn read_opt_missing_file_is_none() {
        assert!(read_opt(Path::new("/nonexistent/proctop/file")).is_none());
    }
}
