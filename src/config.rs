use crate::error::Error;
use itertools::Itertools;
use serde::Deserialize;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Name of the optional config file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "venvlint.toml";

/// Environment directory used when nothing else is configured, relative to the project.
pub const DEFAULT_VENV: &str = "venv";

/// Linter program used when nothing else is configured.
pub const DEFAULT_LINTER: &str = "flake8";

/// The external linter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterCommand {
    /// Program name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl Default for LinterCommand {
    fn default() -> Self {
        Self { program: DEFAULT_LINTER.to_string(), args: vec![".".to_string()] }
    }
}

impl fmt::Display for LinterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.program)
        } else {
            write!(f, "{} {}", self.program, self.args.iter().join(" "))
        }
    }
}

impl LinterCommand {
    fn from_parts(mut parts: Vec<String>) -> Result<Self, Error> {
        if parts.is_empty() {
            return Err(Error::EmptyLinter)
        }
        let program = parts.remove(0);
        Self::new(program, parts)
    }

    fn new(program: String, args: Vec<String>) -> Result<Self, Error> {
        if program.trim().is_empty() {
            return Err(Error::EmptyLinter)
        }
        Ok(Self { program, args })
    }
}

/// Values supplied on the command line. Every field is optional; an empty `Overrides` yields the
/// zero-argument behavior.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Project directory to lint.
    pub project: Option<PathBuf>,
    /// Virtual environment location, relative paths resolve against the project.
    pub venv: Option<PathBuf>,
    /// Explicit config file, relative paths resolve against the project. Unlike the default
    /// one, it must exist.
    pub config: Option<PathBuf>,
    /// Replacement linter command line, program first.
    pub linter: Vec<String>,
}

// Shape of `venvlint.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    venv: Option<PathBuf>,
    linter: Option<FileLinter>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLinter {
    program: String,
    #[serde(default)]
    args: Vec<String>,
}

/// Program configuration: where to lint, which environment to activate, what to run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the project directory the linter runs in.
    pub project_dir: PathBuf,
    /// Path of the virtual environment root.
    pub venv_dir: PathBuf,
    /// The linter to run.
    pub linter: LinterCommand,
}

impl Config {
    /// Resolves the configuration from command line overrides, the project's config file, and
    /// the built-in defaults, in that order of precedence.
    /// # Errors
    /// Errors if the project directory is not accessible, if the config file cannot be read or
    /// parsed, or if the resulting linter command is empty.
    pub fn build(overrides: &Overrides) -> Result<Self, Error> {
        let project = overrides.project.as_deref().unwrap_or_else(|| Path::new("."));
        let project_dir = resolve_project_dir(project)?;

        let file = match &overrides.config {
            Some(path) => load_file(&project_dir.join(path))?,
            None => {
                let path = project_dir.join(CONFIG_FILE_NAME);
                match fs::read_to_string(&path) {
                    Ok(content) => parse_file(&path, &content)?,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {
                        debug!(path = %path.display(), "no config file, using defaults");
                        FileConfig::default()
                    }
                    Err(source) => return Err(Error::ReadConfig { path, source }),
                }
            }
        };

        let venv = overrides
            .venv
            .clone()
            .or(file.venv)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VENV));
        let venv_dir = project_dir.join(venv);

        let linter = if !overrides.linter.is_empty() {
            LinterCommand::from_parts(overrides.linter.clone())?
        } else if let Some(FileLinter { program, args }) = file.linter {
            LinterCommand::new(program, args)?
        } else {
            LinterCommand::default()
        };

        Ok(Self { project_dir, venv_dir, linter })
    }
}

// Equivalent of the `cd` step: the directory has to exist and be a directory.
fn resolve_project_dir(path: &Path) -> Result<PathBuf, Error> {
    let dir = path
        .canonicalize()
        .map_err(|source| Error::ProjectDir { path: path.to_path_buf(), source })?;
    if !dir.is_dir() {
        return Err(Error::NotADirectory { path: dir })
    }
    Ok(dir)
}

fn load_file(path: &Path) -> Result<FileConfig, Error> {
    let content = fs::read_to_string(path)
        .map_err(|source| Error::ReadConfig { path: path.to_path_buf(), source })?;
    parse_file(path, &content)
}

fn parse_file(path: &Path, content: &str) -> Result<FileConfig, Error> {
    debug!(path = %path.display(), "loading config file");
    toml::from_str(content)
        .map_err(|source| Error::ParseConfig { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn overrides_for(dir: &TempDir) -> Overrides {
        Overrides { project: Some(dir.path().to_path_buf()), ..Default::default() }
    }

    #[test]
    fn test_build_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::build(&overrides_for(&dir)).unwrap();

        let project = dir.path().canonicalize().unwrap();
        assert_eq!(config.project_dir, project);
        assert_eq!(config.venv_dir, project.join("venv"));
        assert_eq!(config.linter, LinterCommand::default());
        assert_eq!(config.linter.to_string(), "flake8 .");
    }

    #[test]
    fn test_build_reads_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "venv = \".venv\"\n[linter]\nprogram = \"ruff\"\nargs = [\"check\", \".\"]\n",
        )
        .unwrap();

        let config = Config::build(&overrides_for(&dir)).unwrap();
        assert!(config.venv_dir.ends_with(".venv"));
        assert_eq!(config.linter.to_string(), "ruff check .");
    }

    #[test]
    fn test_build_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "venv = \".venv\"\n[linter]\nprogram = \"ruff\"\n",
        )
        .unwrap();

        let overrides = Overrides {
            venv: Some(PathBuf::from("env")),
            linter: vec!["pylint".to_string(), "src".to_string()],
            ..overrides_for(&dir)
        };
        let config = Config::build(&overrides).unwrap();
        assert!(config.venv_dir.ends_with("env"));
        assert_eq!(config.linter, LinterCommand::new("pylint".into(), vec!["src".into()]).unwrap());
    }

    #[test]
    fn test_build_keeps_absolute_venv() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let overrides =
            Overrides { venv: Some(elsewhere.path().to_path_buf()), ..overrides_for(&dir) };

        let config = Config::build(&overrides).unwrap();
        assert_eq!(config.venv_dir, elsewhere.path());
    }

    #[test]
    fn test_build_rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "venvv = \"typo\"\n").unwrap();

        let err = Config::build(&overrides_for(&dir)).unwrap_err();
        assert!(matches!(err, Error::ParseConfig { .. }), "{err}");
    }

    #[test]
    fn test_build_requires_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let overrides =
            Overrides { config: Some(dir.path().join("missing.toml")), ..overrides_for(&dir) };

        let err = Config::build(&overrides).unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }), "{err}");
    }

    #[test]
    fn test_build_explicit_config_relative_to_project() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("ci")).unwrap();
        fs::write(dir.path().join("ci").join("lint.toml"), "venv = \".venv\"\n").unwrap();
        let overrides =
            Overrides { config: Some(PathBuf::from("ci/lint.toml")), ..overrides_for(&dir) };

        let config = Config::build(&overrides).unwrap();
        assert_eq!(config.venv_dir, dir.path().canonicalize().unwrap().join(".venv"));
    }

    #[test]
    fn test_build_missing_project_dir() {
        let dir = TempDir::new().unwrap();
        let overrides =
            Overrides { project: Some(dir.path().join("nope")), ..Default::default() };

        let err = Config::build(&overrides).unwrap_err();
        assert!(matches!(err, Error::ProjectDir { .. }), "{err}");
    }

    #[test]
    fn test_build_project_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.py");
        fs::write(&file, "").unwrap();
        let overrides = Overrides { project: Some(file), ..Default::default() };

        let err = Config::build(&overrides).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }), "{err}");
    }

    #[test]
    fn test_build_rejects_empty_program() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[linter]\nprogram = \"  \"\n").unwrap();

        let err = Config::build(&overrides_for(&dir)).unwrap_err();
        assert!(matches!(err, Error::EmptyLinter), "{err}");
    }
}
