//! # Interfaces to External Solvers
//!
//! A solver takes a MathProg model file and a data file and produces a textual
//! solution report. Solvers are run as external processes, see
//! [`external::Glpsol`].

use std::{fmt, io, path::Path, process::ExitStatus, time::Duration};

pub mod external;
pub use external::Glpsol;

/// Trait for solvers of MathProg models
pub trait Solve {
    /// Gets a signature of the solver implementation
    fn signature(&self) -> &'static str;

    /// Solves the model in `model` with the data in `data` and returns the
    /// text of the solution report
    ///
    /// # Errors
    ///
    /// If the solver cannot be run or does not produce a report
    fn solve(&self, model: &Path, data: &Path) -> Result<String, Error>;
}

/// Output a solver process wrote to `stdout` and `stderr`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Whether the solver did not write anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stdout.trim().is_empty() && self.stderr.trim().is_empty()
    }
}

impl fmt::Display for CapturedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "STDOUT:\n{}", self.stdout.trim_end())?;
        write!(f, "STDERR:\n{}", self.stderr.trim_end())
    }
}

/// Errors from running a solver
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The solver executable does not exist
    #[error("solver executable `{0}` not found, check that it is installed and in PATH")]
    NotFound(String),
    /// The solver process could not be started for another reason
    #[error("failed to start solver `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The solver terminated unsuccessfully
    #[error("solver terminated unsuccessfully ({status})")]
    Failed {
        status: ExitStatus,
        output: CapturedOutput,
    },
    /// The solver terminated successfully but did not write its report
    #[error("solver did not write a solution report")]
    MissingReport { output: CapturedOutput },
    /// The solver was killed after running for too long
    #[error("solver did not finish within {limit:?}")]
    Timeout {
        limit: Duration,
        output: CapturedOutput,
    },
    /// Setting up the solver call or reading its report failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Gets the output of the solver, if it ran
    #[must_use]
    pub fn output(&self) -> Option<&CapturedOutput> {
        match self {
            Error::Failed { output, .. }
            | Error::MissingReport { output }
            | Error::Timeout { output, .. } => Some(output),
            Error::NotFound(_) | Error::Spawn { .. } | Error::Io(_) => None,
        }
    }
}
