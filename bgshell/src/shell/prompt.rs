// SPDX-License-Identifier: MIT

use nix::unistd::{gethostname, getuid, User};
use std::env;

/// `<user>@<host>: <cwd> > `
pub fn render() -> String {
    let user = match User::from_uid(getuid()) {
        Ok(Some(user)) => user.name,
        _ => env::var("USER").unwrap_or_else(|_| "?".to_string()),
    };
    let host = gethostname()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string());
    let cwd = env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    format!("{}@{}: {} > ", user, host, cwd)
}
