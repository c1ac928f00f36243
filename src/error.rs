use std::{io, path::PathBuf};

/// Everything that can stop the linter from running at all.
///
/// A linter that runs and reports findings is not an error, see [`crate::report::LintStatus`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The project directory could not be resolved.
    #[error("Project directory {} is not accessible: {source}", path.display())]
    ProjectDir {
        /// The directory that was requested.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// The project path exists but is not a directory.
    #[error("Project path {} is not a directory", path.display())]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// No virtual environment at the configured location.
    #[error("No virtual environment found at {}", path.display())]
    MissingEnvironment {
        /// Where the environment was expected.
        path: PathBuf,
    },

    /// The environment exists but has neither a `bin` nor a `Scripts` directory.
    #[error("Virtual environment at {} has no `bin` or `Scripts` directory", path.display())]
    BrokenEnvironment {
        /// The environment root.
        path: PathBuf,
    },

    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadConfig {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// The config file is not valid.
    #[error("Invalid config file {}: {source}", path.display())]
    ParseConfig {
        /// Path to the config file.
        path: PathBuf,
        /// Parser error with location details.
        source: toml::de::Error,
    },

    /// The config names an empty linter program.
    #[error("Linter program must not be empty")]
    EmptyLinter,

    /// The linter exists but could not be started.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// Underlying OS error.
        source: io::Error,
    },
}
