use std::{fmt, process::ExitStatus};

/// Status shells report for a command that could not be found.
pub const NOT_FOUND_STATUS: i32 = 127;

/// How the linter process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintStatus {
    /// Exited normally with the given code.
    Exited(i32),
    /// Killed by a signal before it could exit.
    Signaled(i32),
}

impl From<ExitStatus> for LintStatus {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code)
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal)
            }
        }

        // Only reachable on platforms without signals, where `code()` is always set.
        Self::Exited(1)
    }
}

impl fmt::Display for LintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit code {code}"),
            Self::Signaled(signal) => write!(f, "signal {signal}"),
        }
    }
}

impl LintStatus {
    /// Returns true if the linter found nothing to report.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// The wrapper's own exit code. Any failure collapses to `1`.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
