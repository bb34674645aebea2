// SPDX-License-Identifier: MIT

use clap::ValueEnum;
use std::sync::OnceLock;
use std::time::Duration;

use crate::job_engine::lifecycle::{LaunchCheck, DEFAULT_GRACE_PERIOD};

pub const DEFAULT_REAP_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct GlobalConfig {
    pub launch_check: LaunchCheckKind,
    pub grace_period: Duration,
    pub reap_delay: Duration,
}

// The actual static variable. It starts empty and is set once in main().
pub static CONFIG: OnceLock<GlobalConfig> = OnceLock::new();

/// How the shell decides whether a background command actually started.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
#[clap(rename_all = "kebab-case")]
pub enum LaunchCheckKind {
    #[default]
    /// Default: wait a short grace period, then poll the child once
    GracePeriod,
    /// Let the child report a failed exec through a close-on-exec pipe
    ExecPipe,
}

pub fn initialize_global_config(
    launch_check: &LaunchCheckKind,
    grace_period: Duration,
    reap_delay: Duration,
) {
    if CONFIG
        .set(GlobalConfig {
            launch_check: *launch_check,
            grace_period,
            reap_delay,
        })
        .is_err()
    {
        eprintln!("Failed to initialize global config");
        std::process::exit(1);
    }
}

/// Falls back to the defaults when `main` did not initialize the config,
/// e.g. when used as a library.
pub fn get_launch_check() -> LaunchCheck {
    match CONFIG.get() {
        None => LaunchCheck::default(),
        Some(config) => match config.launch_check {
            LaunchCheckKind::GracePeriod => LaunchCheck::GracePeriod(config.grace_period),
            LaunchCheckKind::ExecPipe => LaunchCheck::ExecPipe,
        },
    }
}

pub fn get_reap_delay() -> Duration {
    CONFIG
        .get()
        .map(|config| config.reap_delay)
        .unwrap_or(DEFAULT_REAP_DELAY)
}

pub fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD.as_millis() as u64
}
