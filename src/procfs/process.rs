use crate::error::Result;

use super::{Procfs, clock_ticks_per_sec, parse_f64, parse_u64, read_opt};

/// Position of the start-time field in the stat line, counted after the
/// parenthesized comm field. Comm may contain spaces and parentheses, so
/// positional fields are indexed from the last `)`. This offset is field
/// 14 of the full line.
const STAT_START_TIME_AFTER_COMM: usize = 11;

impl Procfs {
    /// Full command line of a process, NUL separators collapsed to single
    /// spaces.
    ///
    /// `None` when the process (or its cmdline file) is gone; `Some("")`
    /// for kernel threads, whose cmdline is legitimately empty.
    pub fn command(&self, pid: u32) -> Option<String> {
        let raw = read_opt(&self.pid_path(pid, "cmdline"))?;
        Some(raw.replace('\0', " ").trim_end().to_string())
    }

    /// Resident data memory of a process, formatted in GB with one decimal.
    ///
    /// Reads the `VmData` line of the status file (kB) and divides by 1024.
    /// Kernel threads carry no `VmData` line and come back as `Ok(None)`.
    pub fn resident_memory_gb(&self, pid: u32) -> Result<Option<String>> {
        let path = self.pid_path(pid, "status");
        let Some(contents) = read_opt(&path) else {
            return Ok(None);
        };
        for line in contents.lines() {
            if !line.starts_with("VmData") {
                continue;
            }
            let Some(token) = line.split_whitespace().nth(1) else {
                continue;
            };
            let kb = parse_f64(token, &path, "VmData kB")?;
            return Ok(Some(format!("{:.1}", kb / 1024.0)));
        }
        Ok(None)
    }

    /// Real uid of a process: the second token of the `Uid:` line in its
    /// status file. When the key repeats, the last occurrence wins.
    pub fn user_id(&self, pid: u32) -> Option<String> {
        let contents = read_opt(&self.pid_path(pid, "status"))?;
        let mut uid = None;
        for line in contents.lines() {
            if let Some(rest) = line.strip_prefix("Uid:")
                && let Some(token) = rest.split_whitespace().next()
            {
                uid = Some(token.to_string());
            }
        }
        uid
    }

    /// Login name of the user owning a process, resolved through the
    /// password database.
    pub fn user_name(&self, pid: u32) -> Option<String> {
        let uid = self.user_id(pid)?;
        self.user_for_uid(&uid)
    }

    /// Resolve a uid to its login name.
    ///
    /// Matches the uid field (third colon-delimited field) exactly, so a
    /// uid that is a suffix of a longer id never matches. Last matching
    /// line wins.
    pub fn user_for_uid(&self, uid: &str) -> Option<String> {
        let contents = read_opt(&self.passwd)?;
        let mut name = None;
        for line in contents.lines() {
            let mut fields = line.split(':');
            let login = fields.next();
            let _password = fields.next();
            if fields.next() == Some(uid) {
                name = login.map(str::to_string);
            }
        }
        name
    }

    /// Start time of a process in whole seconds, relative to boot.
    ///
    /// This is the stat line's start-time field converted from clock ticks,
    /// NOT an age: subtract it from [`uptime_secs`](Procfs::uptime_secs) to
    /// get how long the process has been alive.
    pub fn process_start_secs(&self, pid: u32) -> Result<Option<u64>> {
        let path = self.pid_path(pid, "stat");
        let Some(contents) = read_opt(&path) else {
            return Ok(None);
        };
        let Some(after_comm) = contents.rfind(')').map(|i| i + 1) else {
            return Ok(None);
        };
        let Some(token) = contents[after_comm..]
            .split_whitespace()
            .nth(STAT_START_TIME_AFTER_COMM)
        else {
            return Ok(None);
        };
        let ticks = parse_u64(token, &path, "start time ticks")?;
        Ok(Some(ticks / clock_ticks_per_sec()))
    }
}
