use clap::{ArgAction, Parser};
use colored::Colorize;
use std::{path::PathBuf, process::ExitCode};
use tracing::{debug, level_filters::LevelFilter};
use venvlint::{Config, Overrides};

/// Run a linter inside a project's virtual environment. Exits 0 if the linter passes and 1
/// otherwise.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Project directory to lint.
    #[arg(long, env = "VENVLINT_PROJECT", value_name = "DIR")]
    project: Option<PathBuf>,

    /// Virtual environment to activate, relative to the project directory.
    #[arg(long, env = "VENVLINT_VENV", value_name = "DIR")]
    venv: Option<PathBuf>,

    /// Config file to read instead of `<project>/venvlint.toml`, relative to the project
    /// directory.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output, repeat for more.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,

    /// Linter command to run instead of the configured one.
    #[arg(last = true, value_name = "LINTER")]
    linter: Vec<String>,
}

impl Cli {
    fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }

    fn overrides(self) -> Overrides {
        Overrides {
            project: self.project,
            venv: self.venv,
            config: self.config,
            linter: self.linter,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(cli.level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = Config::build(&cli.overrides()).and_then(|config| {
        debug!(?config, "resolved configuration");
        venvlint::run(&config)
    });

    match result {
        Ok(status) => {
            if !status.is_success() {
                eprintln!("{}: Lint checks failed, see details above", "error".bold().red());
            }
            ExitCode::from(status.exit_code())
        }
        Err(err) => {
            eprintln!("{}: {err}", "error".bold().red());
            ExitCode::from(1)
        }
    }
}
