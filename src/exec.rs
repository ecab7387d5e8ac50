use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Look `command` up on `PATH`
pub fn find_executable(command: &str) -> Result<PathBuf> {
    which::which(command).map_err(|source| Error::CommandNotFound {
        command: command.to_string(),
        source,
    })
}

/// Run `argv` with exactly `env` as its environment.
///
/// On Unix the current process is replaced, so this only returns on failure.
/// Elsewhere the child is awaited and a non-zero exit becomes
/// [`Error::ChildExit`].
pub fn run_command(argv: &[String], env: &BTreeMap<OsString, OsString>) -> Result<()> {
    let Some((program, args)) = argv.split_first() else {
        return Err(Error::Usage);
    };

    let path = find_executable(program)?;
    info!("Running {}", path.display());
    debug!("Arguments: {:?}", args);

    let mut command = Command::new(&path);
    command.args(args).env_clear().envs(env);

    launch(command, program)
}

#[cfg(unix)]
fn launch(mut command: Command, program: &str) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let source = command.arg0(program).exec();
    Err(Error::Launch {
        command: program.to_string(),
        source,
    })
}

#[cfg(not(unix))]
fn launch(mut command: Command, program: &str) -> Result<()> {
    let status = command.status().map_err(|source| Error::Launch {
        command: program.to_string(),
        source,
    })?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(Error::ChildExit(code)),
        None => Err(Error::ChildExit(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_reported() {
        let err = find_executable("nonexistent-binary-for-awsenv-tests").unwrap_err();

        assert!(matches!(err, Error::CommandNotFound { .. }));
        assert!(
            err.to_string()
                .contains("nonexistent-binary-for-awsenv-tests")
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_run_missing_executable_does_not_launch() {
        let argv = vec!["nonexistent-binary-for-awsenv-tests".to_string()];
        let err = run_command(&argv, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { ref command, .. } if command == &argv[0]));
    }

    #[test]
    fn test_run_empty_argv_is_usage_error() {
        let err = run_command(&[], &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::Usage));
    }

    #[test]
    #[cfg(unix)]
    fn test_find_executable_on_path() {
        let path = find_executable("sh").unwrap();
        assert!(path.is_absolute());
    }
}
