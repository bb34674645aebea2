// SPDX-License-Identifier: MIT

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::io::BufRead;

/// Produces one line of user input per call. `None` signals end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Terminal input with line editing and in-memory history.
pub struct InteractiveLines {
    editor: DefaultEditor,
}

impl InteractiveLines {
    pub fn new() -> anyhow::Result<Self> {
        let editor = DefaultEditor::new().context("failed to initialize the line editor")?;
        Ok(Self { editor })
    }
}

impl LineSource for InteractiveLines {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl+C drops the current line, like any other shell
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e).context("failed to read from the terminal"),
        }
    }
}

/// Non-interactive input (piped stdin or `--script`). No prompt is shown.
pub struct BufferedLines<R: BufRead> {
    reader: R,
}

impl<R: BufRead> BufferedLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufferedLines<R> {
    fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("failed to read the next command")?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// A fixed list of lines. Records every prompt it was asked to show.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn buffered_lines_strip_line_endings() {
        let mut lines = BufferedLines::new(Cursor::new("bglist\r\nbg sleep 1\n\nexit"));
        assert_eq!(lines.read_line("> ").unwrap().as_deref(), Some("bglist"));
        assert_eq!(lines.read_line("> ").unwrap().as_deref(), Some("bg sleep 1"));
        assert_eq!(lines.read_line("> ").unwrap().as_deref(), Some(""));
        assert_eq!(lines.read_line("> ").unwrap().as_deref(), Some("exit"));
        assert_eq!(lines.read_line("> ").unwrap(), None);
    }

    #[test]
    fn scripted_lines_record_prompts() {
        let mut lines = ScriptedLines::new(["one"]);
        assert_eq!(lines.read_line("a > ").unwrap().as_deref(), Some("one"));
        assert_eq!(lines.read_line("b > ").unwrap(), None);
        assert_eq!(lines.prompts(), ["a > ", "b > "]);
    }
}
