//! Data-acquisition layer for terminal process monitors.
//!
//! Parses the kernel's process pseudo-filesystem into typed metric values:
//! system scalars (OS name, kernel release, uptime, memory, process counts),
//! per-process identity (command line, owner, resident memory, start time)
//! and the aggregate CPU counter sample needed to derive utilization over
//! an interval. Everything is a point-in-time read; the display and
//! aggregation layers above this crate keep whatever state they need.

pub mod config;
pub mod error;
pub mod format;
pub mod procfs;
pub mod snapshot;
