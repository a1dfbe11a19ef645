use kiln_eval::outcome::RawExecution;

/// Everything the driver reports back for one script.
#[derive(Debug, Clone, Default)]
pub struct Execution {
    pub raw: RawExecution,
    /// Coverage edges hit during the run (not yet deduplicated against
    /// earlier runs).
    pub edges: Vec<u64>,
}

/// Trait abstracting script execution against the target engine.
///
/// Launching the engine and collecting its coverage is the implementor's
/// business; the fuzzer only ever sees a completed run. Closures
/// `FnMut(&str) -> Execution` implement it, which is what tests use.
pub trait ScriptRunner {
    fn run(&mut self, script: &str) -> Execution;
}

impl<F: FnMut(&str) -> Execution> ScriptRunner for F {
    fn run(&mut self, script: &str) -> Execution {
        self(script)
    }
}

/// Runner that reports a clean exit and no coverage for every script.
/// Used for exercising synthesis without a target.
pub struct NullRunner;

impl ScriptRunner for NullRunner {
    fn run(&mut self, _script: &str) -> Execution {
        Execution {
            raw: RawExecution {
                exit_status: Some(0),
                ..RawExecution::default()
            },
            edges: Vec::new(),
        }
    }
}
