//! Unioned error kind for the parse / child-process / I/O failure domains.

/// Top level error propagated out of [`crate::repo`] and [`crate::app`].
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    ChildProcess(#[from] ChildProcessError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while parsing `git status --porcelain=v2` / `git branch` output.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("expected a two-character XY field, got {0:?}")]
    InvalidXY(String),

    #[error("missing field `{0}` in porcelain line: {1:?}")]
    MissingField(&'static str, String),

    #[error("invalid change type character {0:?}")]
    InvalidChangeType(char),

    #[error("rename/copy score must start with 'R' or 'C', got {0:?}")]
    InvalidScoreType(String),
}

/// Failures launching or waiting on a `git` child process. `Command::output`
/// and `Command::status` don't distinguish spawn failure from a failure
/// waiting on / reading back from the child, so both surface as `Spawn`.
#[derive(thiserror::Error, Debug)]
pub enum ChildProcessError {
    #[error("failed to run `git {0}`: {1}")]
    Spawn(String, #[source] std::io::Error),

    #[error("`git {args}` exited with {status}: {stderr}")]
    NonZeroExit {
        args: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}
