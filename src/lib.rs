#![doc = include_str!("../README.md")]
#![warn(missing_docs, unreachable_pub, unused, rust_2021_compatibility)]
#![warn(clippy::all, clippy::pedantic, clippy::cargo, clippy::nursery)]

use colored::Colorize;
use std::{io, process::Command};
use tracing::{info, warn};

/// Resolves what to lint, where, and with which environment.
pub mod config;

/// Setup failures that keep the linter from running.
pub mod error;

/// The linter's status and the exit code derived from it.
pub mod report;

/// Activation of a Python virtual environment for a child process.
pub mod venv;

pub use config::{Config, LinterCommand, Overrides};
pub use error::Error;
pub use report::LintStatus;
pub use venv::Environment;

// ===========================
// ======== Execution ========
// ===========================

/// Activates the configured environment and runs the linter in the project directory.
///
/// The linter's output is passed straight through to the terminal. A linter that cannot be found
/// yields [`report::NOT_FOUND_STATUS`], like a shell would.
/// # Errors
/// Errors if the environment cannot be activated or the linter cannot be started.
pub fn run(config: &Config) -> Result<LintStatus, Error> {
    let environment = Environment::activate(&config.venv_dir)?;
    let mut cmd = command(config, &environment);

    info!(
        command = %config.linter,
        dir = %config.project_dir.display(),
        venv = %environment.root().display(),
        "running linter"
    );

    let status = match cmd.status() {
        Ok(status) => LintStatus::from(status),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            eprintln!("{}: {}: command not found", "error".bold().red(), config.linter.program);
            LintStatus::Exited(report::NOT_FOUND_STATUS)
        }
        Err(source) => {
            return Err(Error::Spawn { program: config.linter.program.clone(), source })
        }
    };

    if status.is_success() {
        info!("linter passed");
    } else {
        warn!(%status, "linter failed");
    }
    Ok(status)
}

// Builds the linter invocation without running it.
fn command(config: &Config, environment: &Environment) -> Command {
    let mut cmd = Command::new(environment.resolve_program(&config.linter.program));
    cmd.args(&config.linter.args).current_dir(&config.project_dir);
    environment.apply(&mut cmd);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ffi::OsStr, fs, path::PathBuf};
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_in_project_with_environment() {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("venv").join("bin")).unwrap();
        fs::write(project.path().join("venv").join("bin").join("flake8"), "").unwrap();

        let config = Config::build(&Overrides {
            project: Some(project.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();
        let environment = Environment::activate(&config.venv_dir).unwrap();
        let cmd = command(&config, &environment);

        assert_eq!(cmd.get_program(), config.venv_dir.join("bin").join("flake8").as_os_str());
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), [OsStr::new(".")]);
        assert_eq!(cmd.get_current_dir(), Some(config.project_dir.as_path()));

        let envs: Vec<_> = cmd.get_envs().collect();
        assert!(envs.contains(&(OsStr::new("VIRTUAL_ENV"), Some(config.venv_dir.as_os_str()))));
        assert!(envs.contains(&(OsStr::new("PYTHONHOME"), None)));
    }

    #[test]
    fn test_run_requires_environment() {
        let project = TempDir::new().unwrap();
        let config = Config::build(&Overrides {
            project: Some(project.path().to_path_buf()),
            venv: Some(PathBuf::from("missing")),
            ..Default::default()
        })
        .unwrap();

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::MissingEnvironment { .. }), "{err}");
    }
}
