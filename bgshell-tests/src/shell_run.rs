// SPDX-License-Identifier: MIT

use std::time::Duration;

use bgshell::commands::handle_command::Flow;
use bgshell::job_engine::{LaunchCheck, LifecycleManager};
use bgshell::shell::repl::Shell;
use nix::unistd::Pid;

use crate::processes;

/// Grace period used by the harness. Long enough for a loaded machine to
/// observe a failing exec inside the window.
pub const TEST_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// An in-process shell with captured output. Jobs still tracked when the
/// harness is dropped get terminated.
pub struct ShellRun {
    shell: Shell<Vec<u8>, Vec<u8>>,
    stdout_seen: usize,
    stderr_seen: usize,
}

impl ShellRun {
    pub fn new() -> Self {
        Self::with_launch_check(LaunchCheck::GracePeriod(TEST_GRACE_PERIOD))
    }

    pub fn with_launch_check(launch_check: LaunchCheck) -> Self {
        Self {
            shell: Shell::new(
                LifecycleManager::new(launch_check),
                Duration::from_millis(1),
                Vec::new(),
                Vec::new(),
            ),
            stdout_seen: 0,
            stderr_seen: 0,
        }
    }

    /// Runs one line through the read-eval loop (dispatch + reap pass).
    pub fn line(&mut self, line: &str) -> Flow {
        self.shell
            .execute_line(line)
            .unwrap_or_else(|e| panic!("line {line:?} failed: {e}"))
    }

    /// Reap pass without a command, as the loop does after an empty line.
    pub fn reap(&mut self) {
        self.shell.reap().expect("reap pass failed");
    }

    /// Stdout written since the previous call.
    pub fn new_stdout(&mut self) -> String {
        let all = self.shell.out();
        let fresh = String::from_utf8_lossy(&all[self.stdout_seen..]).into_owned();
        self.stdout_seen = all.len();
        fresh
    }

    /// Stderr written since the previous call.
    pub fn new_stderr(&mut self) -> String {
        let all = self.shell.err();
        let fresh = String::from_utf8_lossy(&all[self.stderr_seen..]).into_owned();
        self.stderr_seen = all.len();
        fresh
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.shell.registry().identifiers()
    }

    pub fn job_count(&self) -> usize {
        self.shell.registry().len()
    }
}

impl Default for ShellRun {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ShellRun {
    fn drop(&mut self) {
        for pid in self.pids() {
            processes::terminate(pid);
        }
    }
}
