// SPDX-License-Identifier: MIT
// bgshell: interactive shell with background job control

use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use bgshell::global_config::{self, LaunchCheckKind};
use bgshell::shell::line_source::{BufferedLines, InteractiveLines, LineSource};
use bgshell::shell::repl::Shell;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// How long a background launch is given to fail before it is tracked
    #[arg(long = "grace-period-ms", value_name = "MS")]
    grace_period_ms: Option<u64>,

    /// Pause between running a command and checking for finished jobs
    #[arg(long = "reap-delay-ms", value_name = "MS", default_value_t = 10)]
    reap_delay_ms: u64,

    /// How a failed background launch is detected
    #[arg(long, value_enum, default_value_t)]
    launch_check: LaunchCheckKind,

    /// Read commands from a file instead of the terminal
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

fn validate_args(args: &Args) -> Result<(), String> {
    match (&args.launch_check, &args.grace_period_ms) {
        (LaunchCheckKind::ExecPipe, Some(_)) => {
            return Err("--grace-period-ms has no effect with --launch-check exec-pipe".into());
        }
        (_, Some(0)) => {
            return Err("--grace-period-ms must be greater than 0".into());
        }
        _ => {}
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let grace_period_ms = args
        .grace_period_ms
        .unwrap_or_else(global_config::default_grace_period_ms);
    global_config::initialize_global_config(
        &args.launch_check,
        Duration::from_millis(grace_period_ms),
        Duration::from_millis(args.reap_delay_ms),
    );

    let mut lines: Box<dyn LineSource> = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Box::new(BufferedLines::new(BufReader::new(file)))
        }
        None if io::stdin().is_terminal() => Box::new(InteractiveLines::new()?),
        None => Box::new(BufferedLines::new(io::stdin().lock())),
    };

    info!("Starting bgshell");
    let mut shell = Shell::from_config(io::stdout(), io::stderr());
    shell.run(lines.as_mut())?;
    info!("Stopping bgshell");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grace_period_conflicts_with_exec_pipe() {
        let args = Args::parse_from(["bgshell", "--launch-check", "exec-pipe", "--grace-period-ms", "5"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["bgshell", "--grace-period-ms", "0"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["bgshell", "--grace-period-ms", "50"]);
        assert!(validate_args(&args).is_ok());
        assert_eq!(args.launch_check, LaunchCheckKind::GracePeriod);
    }
}
