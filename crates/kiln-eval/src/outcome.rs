//! Classification of one target run.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a crashed target terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Killed by a signal (e.g. 11 for SIGSEGV).
    Signal(i32),
    /// Exited with a non-zero status after printing the crash marker.
    Exit(i32),
}

/// Result of running one program against a target. Structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    Succeeded,
    /// Recoverable script error (uncaught exception and the like).
    Failed { diagnostic: String },
    Crashed { termination: Termination },
    TimedOut,
}

impl ExecutionOutcome {
    pub fn is_crash(&self) -> bool {
        matches!(self, ExecutionOutcome::Crashed { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionOutcome::TimedOut)
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Succeeded => write!(f, "succeeded"),
            ExecutionOutcome::Failed { diagnostic } => write!(f, "failed ({diagnostic})"),
            ExecutionOutcome::Crashed {
                termination: Termination::Signal(signal),
            } => write!(f, "crashed (signal {signal})"),
            ExecutionOutcome::Crashed {
                termination: Termination::Exit(status),
            } => write!(f, "crashed (exit status {status})"),
            ExecutionOutcome::TimedOut => write!(f, "timed out"),
        }
    }
}

/// What the external driver observed for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExecution {
    /// Exit status, if the process exited normally.
    pub exit_status: Option<i32>,
    /// Terminating signal, if the process was killed by one.
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
    /// Set by the driver when it hit its wall-clock cutoff.
    pub timed_out: bool,
}

impl RawExecution {
    fn lines(&self) -> impl Iterator<Item = &str> {
        self.stderr.lines().chain(self.stdout.lines())
    }

    fn output_contains(&self, marker: &str) -> bool {
        self.stderr.contains(marker) || self.stdout.contains(marker)
    }
}

/// Turns raw run results into [`ExecutionOutcome`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    /// Printed by the target when a crash test fires.
    pub crash_marker: String,
    /// Any of these in the output marks a script error.
    pub error_markers: Vec<String>,
    /// Runs taking at least this long count as timed out. Unset by default:
    /// the driver's `timed_out` flag is then the only cutoff.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            crash_marker: "FUZZILLI_CRASH".to_string(),
            error_markers: vec![
                "Uncaught".to_string(),
                "SyntaxError".to_string(),
                "ReferenceError".to_string(),
                "TypeError".to_string(),
            ],
            timeout: None,
        }
    }
}

impl Classifier {
    /// Map a raw result onto exactly one outcome.
    ///
    /// Precedence: timeout, then crash, then script error, then success. A
    /// run that printed a crash marker and then hit the cutoff is a timeout.
    pub fn classify(&self, raw: &RawExecution) -> ExecutionOutcome {
        let over_budget = self.timeout.is_some_and(|budget| raw.elapsed >= budget);
        if raw.timed_out || over_budget {
            return ExecutionOutcome::TimedOut;
        }

        if let Some(signal) = raw.signal {
            return ExecutionOutcome::Crashed {
                termination: Termination::Signal(signal),
            };
        }

        let status = raw.exit_status.unwrap_or(0);
        if status != 0 && raw.output_contains(&self.crash_marker) {
            return ExecutionOutcome::Crashed {
                termination: Termination::Exit(status),
            };
        }

        if let Some(line) = raw
            .lines()
            .find(|line| self.error_markers.iter().any(|m| line.contains(m.as_str())))
        {
            return ExecutionOutcome::Failed {
                diagnostic: line.trim().to_string(),
            };
        }

        if status != 0 {
            return ExecutionOutcome::Failed {
                diagnostic: format!("exit status {status}"),
            };
        }

        ExecutionOutcome::Succeeded
    }
}
