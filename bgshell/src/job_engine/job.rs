// SPDX-License-Identifier: MIT

use nix::unistd::Pid;

/// Lifecycle state of a tracked background job.
///
/// `Stopped` is derived from the signals the shell sent, the kernel is never
/// polled for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Running,
    Stopped,
    /// Terminal. A finished job is removed from the registry in the same pass.
    Finished,
}

/// A background-launched child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    identifier: Pid,
    label: String,
    state: JobState,
}

impl Job {
    pub fn new(identifier: Pid, label: impl Into<String>) -> Self {
        Self {
            identifier,
            label: label.into(),
            state: JobState::Running,
        }
    }

    pub fn identifier(&self) -> Pid {
        self.identifier
    }

    /// Program name as typed by the user (argv[0] only).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: JobState) {
        self.state = state;
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.identifier, self.label)
    }
}
