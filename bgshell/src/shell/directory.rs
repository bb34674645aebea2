// SPDX-License-Identifier: MIT

use log::debug;
use std::env;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("too many arguments")]
    TooManyArguments,

    #[error("HOME not set")]
    HomeNotSet,

    #[error("{}: {source}", .path.display())]
    Change {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves the argument of `cd`. No argument and `~` mean `home`, a
/// leading `~/` is replaced by `home`.
pub fn resolve_target(args: &[String], home: Option<&str>) -> Result<PathBuf, DirectoryError> {
    let home_dir = || home.map(PathBuf::from).ok_or(DirectoryError::HomeNotSet);
    match args {
        [] => home_dir(),
        [target] if target == "~" => home_dir(),
        [target] => match target.strip_prefix("~/") {
            Some(rest) => Ok(home_dir()?.join(rest)),
            None => Ok(PathBuf::from(target)),
        },
        _ => Err(DirectoryError::TooManyArguments),
    }
}

/// Changes the working directory of the shell process.
pub fn change_directory(args: &[String]) -> Result<PathBuf, DirectoryError> {
    let home = env::var("HOME").ok();
    let target = resolve_target(args, home.as_deref())?;
    env::set_current_dir(&target).map_err(|source| DirectoryError::Change {
        path: target.clone(),
        source,
    })?;
    debug!("changed directory to {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn home_shortcuts() {
        let home = Some("/home/user");
        assert_eq!(resolve_target(&args(&[]), home).unwrap(), PathBuf::from("/home/user"));
        assert_eq!(resolve_target(&args(&["~"]), home).unwrap(), PathBuf::from("/home/user"));
        assert_eq!(
            resolve_target(&args(&["~/src/bgshell"]), home).unwrap(),
            PathBuf::from("/home/user/src/bgshell")
        );
    }

    #[test]
    fn plain_paths_are_kept() {
        assert_eq!(resolve_target(&args(&["/tmp"]), None).unwrap(), PathBuf::from("/tmp"));
        assert_eq!(resolve_target(&args(&["../x"]), None).unwrap(), PathBuf::from("../x"));
        // only a leading "~/" is special
        assert_eq!(resolve_target(&args(&["~other"]), None).unwrap(), PathBuf::from("~other"));
    }

    #[test]
    fn errors() {
        assert!(matches!(
            resolve_target(&args(&["a", "b"]), Some("/home/user")),
            Err(DirectoryError::TooManyArguments)
        ));
        assert!(matches!(resolve_target(&args(&["~"]), None), Err(DirectoryError::HomeNotSet)));
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = change_directory(&args(&["/definitely/not/a/directory"])).unwrap_err();
        assert!(err.to_string().starts_with("/definitely/not/a/directory: "));
    }
}
