// SPDX-License-Identifier: MIT

use nix::errno::Errno;
use thiserror::Error;

use crate::job_engine::control::ControlAction;

/// Errors of a single job command. None of them is fatal to the shell.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Fork failed: {0}")]
    SpawnCreation(#[source] Errno),

    #[error("execution of {program} failed")]
    ExecutionFailure { program: String },

    #[error(transparent)]
    InvalidControlArgument(#[from] ArgumentError),

    #[error("Failed to {}/find process with p_id {pid}", .action.verb())]
    SignalDelivery { action: ControlAction, pid: i32 },

    #[error("waiting for process {pid} failed: {source}")]
    Wait {
        pid: i32,
        #[source]
        source: Errno,
    },

    #[error("no command given")]
    EmptyCommand,
}

/// Rejected identifier argument of `bgkill`, `bgstop` or `bgstart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("p_id argument is required")]
    Missing,

    #[error("too many arguments")]
    TooMany,

    #[error("p_id argument must be a number")]
    NotANumber,

    #[error("p_id argument is out of range")]
    OutOfRange,
}
