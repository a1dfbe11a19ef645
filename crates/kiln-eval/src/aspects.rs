use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::outcome::ExecutionOutcome;

/// Coverage edges first observed during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTrace {
    pub new_edges: Vec<u64>,
}

impl CoverageTrace {
    pub fn new(new_edges: Vec<u64>) -> Self {
        Self { new_edges }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// What made a run special: its outcome plus the new coverage it reached.
///
/// Immutable once built. Two aspects are the same signal iff outcome and
/// edge set both match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramAspects {
    outcome: ExecutionOutcome,
    edges: BTreeSet<u64>,
}

impl ProgramAspects {
    /// Combine an outcome with the run's coverage trace.
    ///
    /// A crashed run records no edges: coverage collected up to a crash is
    /// not trusted.
    pub fn new(outcome: ExecutionOutcome, trace: &CoverageTrace) -> Self {
        let edges = if outcome.is_crash() {
            BTreeSet::new()
        } else {
            trace.new_edges.iter().copied().collect()
        };
        Self { outcome, edges }
    }

    /// Aspects for runs where coverage was not collected at all.
    pub fn without_coverage(outcome: ExecutionOutcome) -> Self {
        Self {
            outcome,
            edges: BTreeSet::new(),
        }
    }

    pub fn outcome(&self) -> &ExecutionOutcome {
        &self.outcome
    }

    pub fn edges(&self) -> &BTreeSet<u64> {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_new_coverage(&self) -> bool {
        !self.edges.is_empty()
    }

    /// Edge identifiers in ascending order. Order carries no meaning.
    pub fn to_edges(&self) -> Vec<u64> {
        self.edges.iter().copied().collect()
    }
}

impl fmt::Display for ProgramAspects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "execution outcome {} ({} new edges)",
            self.outcome,
            self.edges.len()
        )
    }
}
