// SPDX-License-Identifier: MIT

use log::{debug, info, warn};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, pipe2, ForkResult, Pid};
use std::ffi::CString;
use std::fs::File;
use std::io::Read;
use std::os::fd::{AsRawFd, OwnedFd};
use std::thread;
use std::time::Duration;

use crate::job_engine::error::JobError;
use crate::job_engine::job::{Job, JobState};
use crate::job_engine::registry::JobRegistry;

/// Exit status of a child whose `execvp` failed. Same value a POSIX shell
/// uses for "command not found".
pub const EXEC_FAILURE_STATUS: i32 = 127;

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(10);

/// How a background launch is told apart from an immediate exec failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchCheck {
    /// Sleep, then poll the child once. A child that fails after the window
    /// gets registered and is cleaned up by a later reap pass.
    GracePeriod(Duration),
    /// The child reports a failed exec through a close-on-exec pipe.
    ExecPipe,
}

impl Default for LaunchCheck {
    fn default() -> Self {
        LaunchCheck::GracePeriod(DEFAULT_GRACE_PERIOD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The child ran in the foreground and has terminated.
    Foreground,
    /// The child was registered as a background job.
    Background(Pid),
}

/// Owns the spawn/classify/reap protocol. The registry is passed in by the
/// owner, the manager itself holds no job state.
#[derive(Debug, Default, Clone)]
pub struct LifecycleManager {
    launch_check: LaunchCheck,
}

impl LifecycleManager {
    pub fn new(launch_check: LaunchCheck) -> Self {
        Self { launch_check }
    }

    /// Runs `argv[0]` with `argv`. Foreground commands block until the child
    /// terminates and are never tracked. Background commands are appended to
    /// `registry` unless the launch check saw the exec fail.
    pub fn spawn(
        &self,
        registry: &mut JobRegistry,
        argv: &[String],
        background: bool,
    ) -> Result<SpawnOutcome, JobError> {
        let program = argv.first().ok_or(JobError::EmptyCommand)?;

        // Everything the child needs is allocated before the fork.
        let c_argv = argv
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| JobError::ExecutionFailure {
                program: program.clone(),
            })?;
        let mut c_argv_ptrs: Vec<*const libc::c_char> = c_argv.iter().map(|a| a.as_ptr()).collect();
        c_argv_ptrs.push(std::ptr::null());
        let failure_message = format!("Error: execution of {} failed\n", program);

        let exec_pipe = match (background, self.launch_check) {
            (true, LaunchCheck::ExecPipe) => {
                Some(pipe2(OFlag::O_CLOEXEC).map_err(JobError::SpawnCreation)?)
            }
            _ => None,
        };

        match unsafe { fork() } {
            Err(errno) => Err(JobError::SpawnCreation(errno)),
            Ok(ForkResult::Child) => {
                let report = exec_pipe.map(|(_read_end, write_end)| write_end);
                exec_child(&c_argv_ptrs, failure_message.as_bytes(), report)
            }
            Ok(ForkResult::Parent { child }) => {
                debug!("forked {} as pid {}", program, child);
                if !background {
                    return wait_foreground(child, program);
                }

                let launched = match exec_pipe {
                    Some((read_end, write_end)) => {
                        drop(write_end);
                        confirm_by_exec_pipe(child, read_end)
                    }
                    None => match self.launch_check {
                        LaunchCheck::GracePeriod(grace) => confirm_by_grace_period(child, grace),
                        LaunchCheck::ExecPipe => true,
                    },
                };
                if !launched {
                    debug!("background launch of {} (pid {}) failed", program, child);
                    return Err(JobError::ExecutionFailure {
                        program: program.clone(),
                    });
                }

                if registry.insert_at_end(Job::new(child, program.as_str())) {
                    info!("registered background job {} with pid {}", program, child);
                } else {
                    warn!("pid {} is already tracked, not registering {}", child, program);
                }
                Ok(SpawnOutcome::Background(child))
            }
        }
    }

    /// One non-blocking sweep over all tracked jobs. Jobs whose process is
    /// gone are removed and returned, in registry order, with state
    /// `Finished`.
    pub fn reap_finished(&self, registry: &mut JobRegistry) -> Vec<Job> {
        let mut finished = Vec::new();
        registry.for_each(|_, job| {
            if has_terminated(job.identifier()) {
                let mut done = job.clone();
                done.set_state(JobState::Finished);
                finished.push(done);
            }
        });

        for job in &finished {
            registry.remove_by_identifier(job.identifier());
            info!("reaped background job {} with pid {}", job.label(), job.identifier());
        }
        finished
    }
}

/// Child side of the fork. Only async-signal-safe calls from here on, so
/// `argv` is the ready-made, null-terminated pointer array.
fn exec_child(argv: &[*const libc::c_char], failure_message: &[u8], report: Option<OwnedFd>) -> ! {
    unsafe {
        libc::execvp(argv[0], argv.as_ptr());
        let errno = Errno::last();
        if let Some(fd) = &report {
            let code = (errno as i32).to_ne_bytes();
            libc::write(fd.as_raw_fd(), code.as_ptr().cast(), code.len());
        }
        libc::write(
            libc::STDERR_FILENO,
            failure_message.as_ptr().cast(),
            failure_message.len(),
        );
        libc::_exit(EXEC_FAILURE_STATUS)
    }
}

fn wait_foreground(child: Pid, program: &str) -> Result<SpawnOutcome, JobError> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, EXEC_FAILURE_STATUS)) => {
                return Err(JobError::ExecutionFailure {
                    program: program.to_string(),
                })
            }
            Ok(WaitStatus::Exited(_, code)) => {
                debug!("foreground pid {} exited with {}", child, code);
                return Ok(SpawnOutcome::Foreground);
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                debug!("foreground pid {} terminated by {}", child, signal);
                return Ok(SpawnOutcome::Foreground);
            }
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(source) => {
                return Err(JobError::Wait {
                    pid: child.as_raw(),
                    source,
                })
            }
        }
    }
}

fn confirm_by_grace_period(child: Pid, grace: Duration) -> bool {
    thread::sleep(grace);
    match waitpid(child, Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::Exited(_, EXEC_FAILURE_STATUS)) => false,
        Ok(status) => {
            debug!("pid {} after grace period: {:?}", child, status);
            true
        }
        Err(errno) => {
            debug!("polling pid {} after grace period failed: {}", child, errno);
            true
        }
    }
}

fn confirm_by_exec_pipe(child: Pid, read_end: OwnedFd) -> bool {
    let mut report = Vec::new();
    if let Err(e) = File::from(read_end).read_to_end(&mut report) {
        debug!("reading exec report of pid {} failed: {}", child, e);
        return true;
    }
    if report.is_empty() {
        return true;
    }

    // The child is about to exit, reclaim it so it never shows up as a job.
    loop {
        match waitpid(child, None) {
            Err(Errno::EINTR) => continue,
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) | Err(_) => break,
            Ok(_) => continue,
        }
    }
    false
}

/// A job counts as terminated once the kernel no longer knows the child.
/// A wait that just collected its exit status counts as well, since the
/// process is gone after that call.
fn has_terminated(pid: Pid) -> bool {
    match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
        Err(Errno::ECHILD) => true,
        Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => true,
        Ok(_) => false,
        Err(errno) => {
            debug!("polling pid {} failed: {}", pid, errno);
            false
        }
    }
}
