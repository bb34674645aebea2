// SPDX-License-Identifier: MIT

pub mod directory;
pub mod line_source;
pub mod prompt;
pub mod repl;
pub mod tokenizer;
