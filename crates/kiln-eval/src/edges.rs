use std::collections::HashSet;

use crate::aspects::CoverageTrace;

/// Edges seen so far by one worker.
///
/// Turns the raw edge hits of a run into the edges never observed before,
/// which is what [`ProgramAspects`](crate::aspects::ProgramAspects) records.
#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    known: HashSet<u64>,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self {
            known: HashSet::new(),
        }
    }

    /// Record a run's edge hits and return the ones not seen before,
    /// ascending, without duplicates.
    pub fn observe(&mut self, hits: impl IntoIterator<Item = u64>) -> CoverageTrace {
        let mut new_edges: Vec<u64> = hits
            .into_iter()
            .filter(|edge| self.known.insert(*edge))
            .collect();
        new_edges.sort_unstable();
        if !new_edges.is_empty() {
            tracing::trace!(new = new_edges.len(), known = self.known.len(), "new coverage");
        }
        CoverageTrace::new(new_edges)
    }

    pub fn known_edges(&self) -> usize {
        self.known.len()
    }

    pub fn is_known(&self, edge: u64) -> bool {
        self.known.contains(&edge)
    }

    pub fn reset(&mut self) {
        self.known.clear();
    }
}
