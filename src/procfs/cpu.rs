use std::path::Path;

use serde::Serialize;

use crate::error::{MetricsError, Result};

use super::{Procfs, parse_u64, read_opt};

/// Number of counters on the aggregate CPU line.
const CPU_FIELDS: usize = 10;

/// Aggregate CPU time counters from the stat file, in kernel field order.
///
/// All values are cumulative jiffies since boot. A single sample says
/// nothing about utilization; retain two samples and use
/// [`usage_since`](CpuTimes::usage_since).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTimes {
    /// Build from the counter tokens following the `cpu` label.
    ///
    /// Requires at least ten tokens and consumes the first ten; trailing
    /// fields from newer kernels are ignored.
    fn parse(fields: &[&str], file: &Path) -> Result<Self> {
        if fields.len() < CPU_FIELDS {
            return Err(MetricsError::Truncated {
                file: file.to_path_buf(),
                need: CPU_FIELDS,
                got: fields.len(),
            });
        }
        let mut counters = [0u64; CPU_FIELDS];
        for (slot, token) in counters.iter_mut().zip(fields.iter().copied()) {
            *slot = parse_u64(token, file, "cpu counter")?;
        }
        let [user, nice, system, idle, iowait, irq, softirq, steal, guest, guest_nice] = counters;
        Ok(Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        })
    }

    /// Jiffies spent doing work: everything except idle and iowait.
    pub fn active(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
            + self.guest_nice
    }

    /// Jiffies spent idle, including time waiting for I/O.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    pub fn total(&self) -> u64 {
        self.active() + self.idle_total()
    }

    /// Utilization ratio over the interval since `prev`, in `[0, 1]`.
    ///
    /// `prev` must be the older sample. Returns `None` when no jiffies
    /// elapsed between the two samples (the ratio is undefined).
    pub fn usage_since(&self, prev: &CpuTimes) -> Option<f64> {
        let total = self.total().saturating_sub(prev.total());
        if total == 0 {
            return None;
        }
        let active = self.active().saturating_sub(prev.active());
        Some(active as f64 / total as f64)
    }
}

impl Procfs {
    /// Aggregate CPU counters from the stat file.
    ///
    /// Only the all-cores line (label exactly `cpu`) is matched; per-core
    /// lines (`cpu0`, `cpu1`, ...) never are. `Ok(None)` when the file or
    /// the line is absent.
    pub fn cpu_times(&self) -> Result<Option<CpuTimes>> {
        let path = self.proc_root().join("stat");
        let Some(contents) = read_opt(&path) else {
            return Ok(None);
        };
        for line in contents.lines() {
            let mut fields = line.split_whitespace();
            if fields.next() != Some("cpu") {
                continue;
            }
            let counters: Vec<&str> = fields.collect();
            return CpuTimes::parse(&counters, &path).map(Some);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample(fields: [u64; 10]) -> CpuTimes {
        let rendered: Vec<String> = fields.iter().map(u64::to_string).collect();
        let tokens: Vec<&str> = rendered.iter().map(String::as_str).collect();
        CpuTimes::parse(&tokens, Path::new("stat")).unwrap()
    }

    #[test]
    fn parse_assigns_fields_in_kernel_order() {
        let times = sample([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(times.user, 1);
        assert_eq!(times.idle, 4);
        assert_eq!(times.iowait, 5);
        assert_eq!(times.guest_nice, 10);
    }

    #[test]
    fn parse_rejects_short_lines() {
        let err = CpuTimes::parse(&["1", "2", "3"], Path::new("stat")).unwrap_err();
        assert!(matches!(err, MetricsError::Truncated { got: 3, .. }));
    }

    #[test]
    fn parse_rejects_non_numeric_counter() {
        let tokens = ["1", "2", "3", "4", "oops", "6", "7", "8", "9", "10"];
        let err = CpuTimes::parse(&tokens, Path::new("stat")).unwrap_err();
        assert!(matches!(err, MetricsError::Malformed { .. }));
    }

    #[test]
    fn usage_since_basic_ratio() {
        let prev = sample([100, 0, 100, 700, 100, 0, 0, 0, 0, 0]);
        let next = sample([200, 0, 200, 1200, 200, 0, 0, 0, 0, 0]);
        // 200 active out of 800 total elapsed jiffies
        let usage = next.usage_since(&prev).unwrap();
        assert!((usage - 0.25).abs() < 1e-9);
    }

    #[test]
    fn usage_since_no_elapsed_jiffies_is_undefined() {
        let t = sample([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(t.usage_since(&t), None);
    }

    proptest! {
        #[test]
        fn active_plus_idle_equals_sum(fields in proptest::array::uniform10(0u64..1 << 40)) {
            let times = sample(fields);
            let sum: u64 = fields.iter().sum();
            prop_assert_eq!(times.active() + times.idle_total(), sum);
            prop_assert_eq!(times.total(), sum);
        }
    }
}
