// SPDX-License-Identifier: MIT

use log::{debug, info, warn};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;
use std::io::{self, Write};

use crate::job_engine::error::{ArgumentError, JobError};
use crate::job_engine::job::JobState;
use crate::job_engine::registry::JobRegistry;

/// The signalling job control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Kill,
    Stop,
    Continue,
}

impl ControlAction {
    pub fn keyword(&self) -> &'static str {
        match self {
            ControlAction::Kill => "bgkill",
            ControlAction::Stop => "bgstop",
            ControlAction::Continue => "bgstart",
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            ControlAction::Kill => Signal::SIGKILL,
            ControlAction::Stop => Signal::SIGSTOP,
            ControlAction::Continue => Signal::SIGCONT,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ControlAction::Kill => "kill",
            ControlAction::Stop => "stop",
            ControlAction::Continue => "start",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ControlAction::Kill => "killed",
            ControlAction::Stop => "stopped",
            ControlAction::Continue => "started",
        }
    }
}

/// Validates the arguments following a control keyword: exactly one,
/// decimal digits only.
pub fn parse_identifier(args: &[String]) -> Result<Pid, ArgumentError> {
    let arg = match args {
        [] => return Err(ArgumentError::Missing),
        [arg] => arg,
        _ => return Err(ArgumentError::TooMany),
    };
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ArgumentError::NotANumber);
    }
    arg.parse::<i32>()
        .map(Pid::from_raw)
        .map_err(|_| ArgumentError::OutOfRange)
}

/// Prints every tracked job in launch order followed by the total.
pub fn list(registry: &JobRegistry, out: &mut impl Write) -> io::Result<()> {
    let mut result = Ok(());
    registry.for_each(|index, job| {
        if result.is_ok() {
            result = writeln!(out, "{}  {}", job, index);
        }
    });
    result?;
    writeln!(out, "Total background jobs: {}", registry.len())
}

/// Sends the signal of `action` to the tracked job named by `args`.
///
/// Only identifiers present in the registry are signalled. A successful kill
/// blocks until the child is reclaimed and then drops its record. Stop and
/// continue only update the recorded state. On any failure the registry is
/// left untouched.
pub fn control(
    registry: &mut JobRegistry,
    action: ControlAction,
    args: &[String],
) -> Result<Pid, JobError> {
    let pid = parse_identifier(args)?;
    let delivery_failed = JobError::SignalDelivery {
        action,
        pid: pid.as_raw(),
    };

    if !registry.contains(pid) {
        debug!("{}: pid {} is not a tracked job", action.keyword(), pid);
        return Err(delivery_failed);
    }
    if let Err(errno) = signal::kill(pid, action.signal()) {
        warn!("sending {} to pid {} failed: {}", action.signal(), pid, errno);
        return Err(delivery_failed);
    }

    match action {
        ControlAction::Kill => {
            wait_reclaimed(pid);
            registry.remove_by_identifier(pid);
            info!("killed background job with pid {}", pid);
        }
        ControlAction::Stop => {
            registry.set_state(pid, JobState::Stopped);
        }
        ControlAction::Continue => {
            registry.set_state(pid, JobState::Running);
        }
    }
    Ok(pid)
}

/// Blocks until a killed child has been reclaimed. Returns early if the
/// kernel reports it is not (or no longer) our child.
fn wait_reclaimed(pid: Pid) {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => return,
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(errno) => {
                debug!("waiting for killed pid {} failed: {}", pid, errno);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_engine::job::Job;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identifier_validation() {
        assert_eq!(parse_identifier(&args(&[])), Err(ArgumentError::Missing));
        assert_eq!(parse_identifier(&args(&["1", "2"])), Err(ArgumentError::TooMany));
        assert_eq!(parse_identifier(&args(&["abc"])), Err(ArgumentError::NotANumber));
        assert_eq!(parse_identifier(&args(&["-5"])), Err(ArgumentError::NotANumber));
        assert_eq!(parse_identifier(&args(&["12a"])), Err(ArgumentError::NotANumber));
        assert_eq!(
            parse_identifier(&args(&["99999999999"])),
            Err(ArgumentError::OutOfRange)
        );
        assert_eq!(parse_identifier(&args(&["0042"])), Ok(Pid::from_raw(42)));
    }

    #[test]
    fn list_format() {
        let mut registry = JobRegistry::new();
        registry.insert_at_end(Job::new(Pid::from_raw(100), "sleep"));
        registry.insert_at_end(Job::new(Pid::from_raw(200), "yes"));

        let mut out = Vec::new();
        list(&registry, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "100: sleep  1\n200: yes  2\nTotal background jobs: 2\n"
        );
    }

    #[test]
    fn list_empty() {
        let mut out = Vec::new();
        list(&JobRegistry::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Total background jobs: 0\n");
    }

    #[test]
    fn untracked_identifier_is_not_signalled() {
        let mut registry = JobRegistry::new();
        registry.insert_at_end(Job::new(Pid::from_raw(100), "sleep"));

        // pid 0 would address our whole process group if it were signalled
        let err = control(&mut registry, ControlAction::Kill, &args(&["0"])).unwrap_err();
        assert!(matches!(
            err,
            JobError::SignalDelivery {
                action: ControlAction::Kill,
                pid: 0
            }
        ));
        assert_eq!(err.to_string(), "Failed to kill/find process with p_id 0");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_arguments_leave_registry_alone() {
        let mut registry = JobRegistry::new();
        registry.insert_at_end(Job::new(Pid::from_raw(100), "sleep"));

        for bad in [args(&[]), args(&["100", "100"]), args(&["abc"])] {
            let err = control(&mut registry, ControlAction::Stop, &bad).unwrap_err();
            assert!(matches!(err, JobError::InvalidControlArgument(_)));
        }
        assert_eq!(registry.len(), 1);
        let mut states = Vec::new();
        registry.for_each(|_, job| states.push(job.state()));
        assert_eq!(states, vec![JobState::Running]);
    }
}
