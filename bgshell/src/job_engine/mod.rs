// SPDX-License-Identifier: MIT
//! # Design: Background Job Lifecycle
//!
//! ## Overview
//! Everything runs on the shell's control thread. There is no supervisor
//! thread per job, background children are observed by non-blocking polls.
//!
//! - `registry`: ordered job records, insertion order = launch order.
//! - `lifecycle`: fork/exec, foreground wait, launch check, reap pass.
//! - `control`: `bglist`, `bgkill`, `bgstop`, `bgstart`.
//!
//! ## Job states
//!
//! ```text
//!            spawn (background, launch check passed)
//!                 |
//!                 v
//!         +---------------+   bgstop   +---------------+
//!         |    Running    | ---------> |    Stopped    |
//!         |               | <--------- |               |
//!         +-------+-------+   bgstart  +-------+-------+
//!                 |                            |
//!                 |  bgkill / exit / reap pass |
//!                 v                            v
//!         +--------------------------------------------+
//!         |        Finished (record removed)           |
//!         +--------------------------------------------+
//! ```
//!
//! The only blocking points are the foreground wait and the wait after a
//! successful `bgkill`.

pub mod control;
pub mod error;
pub mod job;
pub mod lifecycle;
pub mod registry;

pub use control::ControlAction;
pub use error::{ArgumentError, JobError};
pub use job::{Job, JobState};
pub use lifecycle::{LaunchCheck, LifecycleManager, SpawnOutcome};
pub use registry::JobRegistry;
