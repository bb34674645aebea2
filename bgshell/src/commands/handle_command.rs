// SPDX-License-Identifier: MIT

use log::debug;
use std::io::Write;

use super::command::Command;
use crate::job_engine::{control, JobError, SpawnOutcome};
use crate::shell::directory;
use crate::shell::repl::Shell;

/// Whether the read-eval loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Runs one command against the shell state. Command failures are reported
/// on the error stream, only failures of the streams themselves are returned.
pub fn handle_command<O: Write, E: Write>(
    shell: &mut Shell<O, E>,
    command: Command,
) -> anyhow::Result<Flow> {
    match command {
        Command::Empty => {}
        Command::Exit { args } => {
            if !args.is_empty() {
                writeln!(shell.err, "exit: too many arguments")?;
            } else {
                writeln!(shell.out, "Good Bye")?;
                return Ok(Flow::Exit);
            }
        }
        Command::ChangeDirectory { args } => {
            if let Err(e) = directory::change_directory(&args) {
                writeln!(shell.err, "cd: {}", e)?;
            }
        }
        Command::ListJobs { args } => {
            if !args.is_empty() {
                writeln!(shell.err, "bglist: too many arguments")?;
            } else {
                control::list(&shell.registry, &mut shell.out)?;
            }
        }
        Command::Control { action, args } => {
            match control::control(&mut shell.registry, action, &args) {
                Ok(pid) => writeln!(
                    shell.out,
                    "Process with p_id {} has been {}",
                    pid,
                    action.past_tense()
                )?,
                Err(e) => writeln!(shell.err, "{}: {}", action.keyword(), e)?,
            }
        }
        Command::Spawn { argv, background } => {
            // nothing buffered may be duplicated into the child
            shell.out.flush()?;
            shell.err.flush()?;
            let program = argv.first().map(String::as_str).unwrap_or("bg");
            match shell.lifecycle.spawn(&mut shell.registry, &argv, background) {
                Ok(SpawnOutcome::Background(pid)) => {
                    debug!("{} running in background as {}", program, pid);
                }
                Ok(SpawnOutcome::Foreground) => {}
                // the child has already said so on stderr
                Err(JobError::ExecutionFailure { program }) => {
                    debug!("{} could not be executed", program);
                }
                Err(e @ JobError::SpawnCreation(_)) => writeln!(shell.err, "{}", e)?,
                Err(e) => writeln!(shell.err, "{}: {}", program, e)?,
            }
        }
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_engine::{LaunchCheck, LifecycleManager};
    use std::time::Duration;

    fn shell() -> Shell<Vec<u8>, Vec<u8>> {
        Shell::new(
            LifecycleManager::new(LaunchCheck::GracePeriod(Duration::from_millis(200))),
            Duration::from_millis(1),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn empty_spawn_is_reported_not_run() {
        let mut shell = shell();
        let flow = handle_command(
            &mut shell,
            Command::Spawn {
                argv: vec![],
                background: true,
            },
        )
        .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(String::from_utf8_lossy(shell.err()), "bg: no command given\n");
        assert!(shell.registry().is_empty());
    }

    #[test]
    fn empty_foreground_spawn_is_reported_not_run() {
        let mut shell = shell();
        handle_command(
            &mut shell,
            Command::Spawn {
                argv: vec![],
                background: false,
            },
        )
        .unwrap();
        assert_eq!(String::from_utf8_lossy(shell.err()), "bg: no command given\n");
        assert_eq!(String::from_utf8_lossy(shell.out()), "");
    }
}
