// SPDX-License-Identifier: MIT

use std::process::Command;
use std::thread;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// True while the kernel still knows the pid (zombies included).
pub fn process_exists(pid: Pid) -> bool {
    signal::kill(pid, None::<Signal>).is_ok()
}

/// Terminates a process from outside the shell, through the `kill` program.
pub fn external_kill(pid: Pid) {
    let status = Command::new("kill")
        .arg(pid.to_string())
        .status()
        .expect("failed to run kill");
    assert!(status.success(), "kill {} failed", pid);
}

/// SIGTERM first, SIGKILL if the child does not go away in time. Reclaims
/// the child if it is ours.
pub fn terminate(pid: Pid) {
    let _ = signal::kill(pid, Signal::SIGTERM);
    // a stopped child never handles SIGTERM otherwise
    let _ = signal::kill(pid, Signal::SIGCONT);

    for _ in 0..10 {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => thread::sleep(Duration::from_millis(100)),
            _ => return,
        }
    }

    // Still alive → SIGKILL
    let _ = signal::kill(pid, Signal::SIGKILL);
    let _ = waitpid(pid, None);
}
