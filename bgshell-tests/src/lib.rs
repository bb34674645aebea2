// SPDX-License-Identifier: MIT

pub mod processes;
pub mod shell_run;
