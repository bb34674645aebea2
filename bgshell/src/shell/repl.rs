// SPDX-License-Identifier: MIT

use log::debug;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::commands::command::Command;
use crate::commands::handle_command::{handle_command, Flow};
use crate::global_config;
use crate::job_engine::{JobRegistry, LifecycleManager};
use crate::shell::line_source::LineSource;
use crate::shell::{prompt, tokenizer};

/// The shell state driven by the read-eval loop. Owns the job registry,
/// nothing else holds on to it.
pub struct Shell<O: Write, E: Write> {
    pub(crate) registry: JobRegistry,
    pub(crate) lifecycle: LifecycleManager,
    reap_delay: Duration,
    pub(crate) out: O,
    pub(crate) err: E,
}

impl<O: Write, E: Write> Shell<O, E> {
    pub fn new(lifecycle: LifecycleManager, reap_delay: Duration, out: O, err: E) -> Self {
        Self {
            registry: JobRegistry::new(),
            lifecycle,
            reap_delay,
            out,
            err,
        }
    }

    /// A shell configured from the global config (or its defaults).
    pub fn from_config(out: O, err: E) -> Self {
        Self::new(
            LifecycleManager::new(global_config::get_launch_check()),
            global_config::get_reap_delay(),
            out,
            err,
        )
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn out(&self) -> &O {
        &self.out
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    /// Reads lines until end of input or an exit command.
    pub fn run(&mut self, lines: &mut dyn LineSource) -> anyhow::Result<()> {
        loop {
            let prompt = prompt::render();
            let line = match lines.read_line(&prompt)? {
                Some(line) => line,
                None => {
                    debug!("end of input");
                    writeln!(self.out, "Good Bye")?;
                    self.out.flush()?;
                    return Ok(());
                }
            };
            if self.execute_line(&line)? == Flow::Exit {
                self.out.flush()?;
                return Ok(());
            }
        }
    }

    /// One loop iteration: dispatch the command, then one reap pass.
    pub fn execute_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let command = Command::parse(tokenizer::tokenize(line));
        if handle_command(self, command)? == Flow::Exit {
            return Ok(Flow::Exit);
        }
        thread::sleep(self.reap_delay);
        self.reap()?;
        Ok(Flow::Continue)
    }

    /// Runs the reap pass and announces every finished job once.
    pub fn reap(&mut self) -> io::Result<()> {
        for job in self.lifecycle.reap_finished(&mut self.registry) {
            writeln!(
                self.out,
                "Command {} with pid {} has finished",
                job.label(),
                job.identifier()
            )?;
        }
        self.out.flush()
    }
}
