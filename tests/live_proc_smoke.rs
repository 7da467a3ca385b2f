#![cfg(target_os = "linux")]

use proctop::procfs::Procfs;

#[test]
fn pids_include_current_process() {
    let procfs = Procfs::new();
    let current = std::process::id();
    assert!(
        procfs.pids().contains(&current),
        "current process should be listed"
    );
}

#[test]
fn system_readers_return_values() {
    let procfs = Procfs::new();
    assert!(procfs.uptime_secs().unwrap().is_some());
    assert!(procfs.total_processes().unwrap().is_some());

    let cpu = procfs.cpu_times().unwrap().expect("aggregate cpu line");
    assert!(cpu.total() > 0);

    let mem = procfs.mem_info().unwrap().expect("meminfo keys");
    assert!(mem.available > 0);
}

#[test]
fn current_process_identity_is_readable() {
    let procfs = Procfs::new();
    let pid = std::process::id();

    assert!(procfs.command(pid).is_some());
    assert!(procfs.user_id(pid).is_some());
    assert!(procfs.process_start_secs(pid).unwrap().is_some());
}

#[test]
fn snapshot_capture_includes_current_process() {
    let procfs = Procfs::new();
    let snapshot = proctop::snapshot::capture(&procfs).unwrap();
    let pid = std::process::id();
    assert!(snapshot.processes.iter().any(|p| p.pid == pid));
}
