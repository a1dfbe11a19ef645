//! Synthesis and execution loop.
//!
//! Each worker owns its builder, RNG, runner, and edge tracker. The
//! generator registry, profile, and classifier are shared read-only.

use std::collections::HashSet;

use kiln_codegen::generator::Emission;
use kiln_codegen::registry::{GeneratorRegistry, RegistryError};
use kiln_codegen::rng::program_rng;
use kiln_eval::aspects::{CoverageTrace, ProgramAspects};
use kiln_eval::edges::EdgeTracker;
use kiln_eval::outcome::{Classifier, ExecutionOutcome};
use kiln_ir::lift::lift;
use kiln_ir::program::Program;
use kiln_profile::profile::Profile;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::runner::ScriptRunner;

#[derive(Debug, thiserror::Error)]
pub enum FuzzerError {
    #[error("Generator selection failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid fuzzer configuration: {details}")]
    Config { details: String },
}

/// Configuration for a fuzzing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzerConfig {
    /// RNG seed. Each program draws from a stream derived from
    /// `(seed, worker, iteration)`.
    pub seed: u64,
    /// Programs synthesized and executed per worker.
    pub iterations: u64,
    /// Successful generator invocations per program.
    pub program_size: usize,
    /// Skipped invocations tolerated per program before giving up on it.
    pub max_skips: usize,
    /// Independent workers for [`Fuzzer::run_parallel`].
    pub workers: usize,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 1_000,
            program_size: 12,
            max_skips: 64,
            workers: 1,
        }
    }
}

impl FuzzerConfig {
    fn validate(&self) -> Result<(), FuzzerError> {
        if self.program_size == 0 {
            return Err(FuzzerError::Config {
                details: "program_size must be positive".to_string(),
            });
        }
        if self.workers == 0 {
            return Err(FuzzerError::Config {
                details: "workers must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// One synthesized program.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub program: Program,
    /// Generator invocations that emitted code.
    pub emitted: usize,
    /// Generator invocations that found no compatible inputs.
    pub skipped: usize,
}

/// A program worth keeping, with what made it special.
#[derive(Debug, Clone)]
pub struct Finding {
    /// Sequential within the worker that found it.
    pub id: u64,
    pub worker: u64,
    pub iteration: u64,
    /// The full script as executed (profile prefix and suffix included).
    pub script: String,
    pub aspects: ProgramAspects,
}

/// Outcome tallies across a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub succeeded: u64,
    pub failed: u64,
    pub crashed: u64,
    pub timed_out: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Succeeded => self.succeeded += 1,
            ExecutionOutcome::Failed { .. } => self.failed += 1,
            ExecutionOutcome::Crashed { .. } => self.crashed += 1,
            ExecutionOutcome::TimedOut => self.timed_out += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.crashed + self.timed_out
    }

    fn merge(&mut self, other: &OutcomeCounts) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.crashed += other.crashed;
        self.timed_out += other.timed_out;
    }
}

/// Result of a complete session (one or more workers).
#[derive(Debug, Default)]
pub struct SessionResult {
    pub findings: Vec<Finding>,
    pub outcomes: OutcomeCounts,
    pub generators_emitted: u64,
    pub generators_skipped: u64,
    /// Distinct edges discovered, summed over workers.
    pub edges_discovered: usize,
}

impl SessionResult {
    pub fn executions(&self) -> u64 {
        self.outcomes.total()
    }

    fn merge(&mut self, other: SessionResult) {
        self.findings.extend(other.findings);
        self.outcomes.merge(&other.outcomes);
        self.generators_emitted += other.generators_emitted;
        self.generators_skipped += other.generators_skipped;
        self.edges_discovered += other.edges_discovered;
    }
}

/// Decides which runs are worth keeping.
///
/// A run is kept if its aspects were not seen before and it crashed, reached
/// new edges, or failed with a diagnostic not seen before.
#[derive(Debug, Default)]
struct Triage {
    seen_aspects: HashSet<ProgramAspects>,
    seen_diagnostics: HashSet<String>,
}

impl Triage {
    fn is_interesting(&mut self, aspects: &ProgramAspects) -> bool {
        if self.seen_aspects.contains(aspects) {
            return false;
        }
        let interesting = match aspects.outcome() {
            ExecutionOutcome::Crashed { .. } => true,
            ExecutionOutcome::Failed { diagnostic } => {
                self.seen_diagnostics.insert(diagnostic.clone()) || aspects.has_new_coverage()
            }
            ExecutionOutcome::Succeeded | ExecutionOutcome::TimedOut => {
                aspects.has_new_coverage()
            }
        };
        if interesting {
            self.seen_aspects.insert(aspects.clone());
        }
        interesting
    }
}

/// Drives synthesis runs for one target.
pub struct Fuzzer<'a> {
    profile: &'a Profile,
    registry: &'a GeneratorRegistry,
    classifier: &'a Classifier,
}

impl<'a> Fuzzer<'a> {
    pub fn new(
        profile: &'a Profile,
        registry: &'a GeneratorRegistry,
        classifier: &'a Classifier,
    ) -> Self {
        Self {
            profile,
            registry,
            classifier,
        }
    }

    /// Build one program by repeatedly selecting generators.
    ///
    /// Stops after `program_size` emissions or `max_skips` skips, whichever
    /// comes first.
    pub fn synthesize(
        &self,
        rng: &mut ChaCha8Rng,
        config: &FuzzerConfig,
    ) -> Result<Synthesis, FuzzerError> {
        let mut b = self.profile.builder();
        let mut emitted = 0;
        let mut skipped = 0;

        while emitted < config.program_size && skipped < config.max_skips {
            let generator = self.registry.select(rng)?;
            match generator.generate(&mut b, rng) {
                Emission::Emitted => emitted += 1,
                Emission::Skipped => skipped += 1,
            }
        }

        Ok(Synthesis {
            program: b.finalize(),
            emitted,
            skipped,
        })
    }

    /// Re-synthesize the program a worker built at a given iteration.
    ///
    /// Uses the same RNG stream as the session did, so a [`Finding`]'s script
    /// can be rebuilt from its `worker` and `iteration` alone.
    pub fn reproduce(
        &self,
        worker: u64,
        iteration: u64,
        config: &FuzzerConfig,
    ) -> Result<Synthesis, FuzzerError> {
        let mut rng = program_rng(config.seed, worker, iteration);
        self.synthesize(&mut rng, config)
    }

    /// Single-worker session.
    pub fn run<R: ScriptRunner>(
        &self,
        runner: &mut R,
        config: &FuzzerConfig,
    ) -> Result<SessionResult, FuzzerError> {
        config.validate()?;
        self.run_worker(0, runner, config)
    }

    /// Independent workers on the rayon pool, one runner each.
    pub fn run_parallel<R, F>(
        &self,
        make_runner: F,
        config: &FuzzerConfig,
    ) -> Result<SessionResult, FuzzerError>
    where
        R: ScriptRunner,
        F: Fn(u64) -> R + Sync,
    {
        config.validate()?;
        tracing::info!(workers = config.workers, seed = config.seed, "starting parallel session");

        let results = (0..config.workers as u64)
            .into_par_iter()
            .map(|worker| {
                let mut runner = make_runner(worker);
                self.run_worker(worker, &mut runner, config)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut merged = SessionResult::default();
        for result in results {
            merged.merge(result);
        }
        Ok(merged)
    }

    fn run_worker<R: ScriptRunner>(
        &self,
        worker: u64,
        runner: &mut R,
        config: &FuzzerConfig,
    ) -> Result<SessionResult, FuzzerError> {
        let mut tracker = EdgeTracker::new();
        let mut triage = Triage::default();
        let mut result = SessionResult::default();

        tracing::info!(worker, iterations = config.iterations, "worker started");

        for iteration in 0..config.iterations {
            let mut rng = program_rng(config.seed, worker, iteration);
            let synthesis = self.synthesize(&mut rng, config)?;
            result.generators_emitted += synthesis.emitted as u64;
            result.generators_skipped += synthesis.skipped as u64;

            let script = self.profile.wrap(&lift(&synthesis.program));
            let execution = runner.run(&script);
            let outcome = self.classifier.classify(&execution.raw);
            result.outcomes.record(&outcome);

            // Edges hit before a crash are not trusted, so they are not marked known either.
            let trace = if outcome.is_crash() {
                CoverageTrace::empty()
            } else {
                tracker.observe(execution.edges)
            };
            let aspects = ProgramAspects::new(outcome, &trace);

            if !triage.is_interesting(&aspects) {
                continue;
            }
            if aspects.outcome().is_crash() {
                tracing::warn!(worker, iteration, %aspects, "target crashed");
            } else {
                tracing::debug!(worker, iteration, %aspects, "retained program");
            }
            result.findings.push(Finding {
                id: result.findings.len() as u64,
                worker,
                iteration,
                script,
                aspects,
            });
        }

        result.edges_discovered = tracker.known_edges();
        tracing::info!(
            worker,
            executions = result.executions(),
            findings = result.findings.len(),
            edges = result.edges_discovered,
            "worker finished"
        );
        Ok(result)
    }
}
