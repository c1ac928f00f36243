use crate::error::Error;
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, warn};

/// An existing virtual environment, ready to be applied to commands. Sourcing `bin/activate` only
/// changes environment variables, so the same effect is applied to the [`Command`] directly.
#[derive(Debug, Clone)]
pub struct Environment {
    root: PathBuf,
    scripts_dir: PathBuf,
}

impl Environment {
    /// Locates the environment rooted at `root`, accepting both the Unix (`bin`) and Windows
    /// (`Scripts`) layouts.
    /// # Errors
    /// Errors if `root` does not exist or has no scripts directory.
    pub fn activate(root: &Path) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::MissingEnvironment { path: root.to_path_buf() })
        }

        let scripts_dir = ["bin", "Scripts"]
            .iter()
            .map(|name| root.join(name))
            .find(|dir| dir.is_dir())
            .ok_or_else(|| Error::BrokenEnvironment { path: root.to_path_buf() })?;

        debug!(root = %root.display(), scripts = %scripts_dir.display(), "activated environment");
        Ok(Self { root: root.to_path_buf(), scripts_dir })
    }

    /// Root directory of the environment.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    #[must_use]
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Resolves a linter program against the environment. Bare names installed in the
    /// environment resolve to their full path; anything else is returned unchanged and left to
    /// the `PATH` lookup.
    #[must_use]
    pub fn resolve_program(&self, program: &str) -> PathBuf {
        let as_path = Path::new(program);
        if as_path.components().count() != 1 {
            return as_path.to_path_buf()
        }

        let candidates = [program.to_string(), format!("{program}.exe")];
        candidates
            .iter()
            .map(|name| self.scripts_dir.join(name))
            .find(|path| path.is_file())
            .unwrap_or_else(|| as_path.to_path_buf())
    }

    /// The `PATH` value a child should see: the scripts directory first, then the inherited
    /// entries.
    #[must_use]
    pub fn search_path(&self) -> OsString {
        let inherited = env::var_os("PATH").unwrap_or_default();
        let dirs = std::iter::once(self.scripts_dir.clone()).chain(env::split_paths(&inherited));
        env::join_paths(dirs).unwrap_or_else(|err| {
            warn!("inherited PATH could not be joined ({err}), using the environment only");
            self.scripts_dir.clone().into_os_string()
        })
    }

    /// Applies the activation to `cmd`.
    pub fn apply(&self, cmd: &mut Command) {
        cmd.env("VIRTUAL_ENV", &self.root).env("PATH", self.search_path()).env_remove("PYTHONHOME");
    }
}
