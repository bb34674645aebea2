// SPDX-License-Identifier: MIT

use crate::job_engine::ControlAction;

/// One tokenized input line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line or a bare `bg`.
    Empty,

    /// `exit`, `quit` or `bye`. Extra arguments are an error.
    Exit { args: Vec<String> },

    /// `cd` (also accepted as `bg cd`).
    ChangeDirectory { args: Vec<String> },

    /// `bglist`. Extra arguments are an error.
    ListJobs { args: Vec<String> },

    /// `bgkill`, `bgstop`, `bgstart`.
    Control {
        action: ControlAction,
        args: Vec<String>,
    },

    /// Any other command, `background` when prefixed with `bg`.
    Spawn { argv: Vec<String>, background: bool },
}

impl Command {
    pub fn parse(mut tokens: Vec<String>) -> Command {
        if tokens.is_empty() {
            return Command::Empty;
        }
        let keyword = tokens.remove(0);
        match keyword.as_str() {
            "exit" | "quit" | "bye" => Command::Exit { args: tokens },
            "cd" => Command::ChangeDirectory { args: tokens },
            "bglist" => Command::ListJobs { args: tokens },
            "bgkill" => Command::Control {
                action: ControlAction::Kill,
                args: tokens,
            },
            "bgstop" => Command::Control {
                action: ControlAction::Stop,
                args: tokens,
            },
            "bgstart" => Command::Control {
                action: ControlAction::Continue,
                args: tokens,
            },
            "bg" => match tokens.first().map(String::as_str) {
                None => Command::Empty,
                Some("cd") => Command::ChangeDirectory {
                    args: tokens.split_off(1),
                },
                Some(_) => Command::Spawn {
                    argv: tokens,
                    background: true,
                },
            },
            _ => {
                tokens.insert(0, keyword);
                Command::Spawn {
                    argv: tokens,
                    background: false,
                }
            }
        }
    }
}
