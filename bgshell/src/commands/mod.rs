// SPDX-License-Identifier: MIT

pub mod command;
pub mod handle_command;
