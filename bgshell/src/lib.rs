// SPDX-License-Identifier: MIT
// bgshell: interactive shell with background job control
//
// - Runs commands in the foreground or, prefixed with `bg`, in the background.
// - Tracks background jobs and controls them with bglist/bgkill/bgstop/bgstart.

pub mod commands;
pub mod global_config;
pub mod job_engine;
pub mod shell;
