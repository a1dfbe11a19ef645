use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use kiln_core::runner::Execution;
use kiln_eval::outcome::RawExecution;

/// Stand-in for a d8 process: crashes on the crash marker or an
/// `OptimizeOsr` load, throws on modulo, and reports one edge per distinct
/// line of the script.
pub fn fake_engine(script: &str) -> Execution {
    let edges = script
        .lines()
        .map(|line| {
            let mut hasher = DefaultHasher::new();
            line.trim().hash(&mut hasher);
            hasher.finish() % 4096
        })
        .collect();

    let raw = if script.contains("FUZZILLI_CRASH") || script.contains("= OptimizeOsr;") {
        RawExecution {
            signal: Some(11),
            elapsed: Duration::from_millis(2),
            ..RawExecution::default()
        }
    } else if script.contains(" % ") {
        RawExecution {
            exit_status: Some(1),
            stderr: "Uncaught RangeError: fake modulo failure".to_string(),
            elapsed: Duration::from_millis(2),
            ..RawExecution::default()
        }
    } else {
        RawExecution {
            exit_status: Some(0),
            elapsed: Duration::from_millis(2),
            ..RawExecution::default()
        }
    };

    Execution { raw, edges }
}
