use std::time::Duration;

use kiln_eval::outcome::{Classifier, ExecutionOutcome, RawExecution, Termination};

const SIGSEGV: i32 = 11;

fn clean_exit() -> RawExecution {
    RawExecution {
        exit_status: Some(0),
        elapsed: Duration::from_millis(5),
        ..RawExecution::default()
    }
}

#[test]
fn test_clean_run_succeeds() {
    assert_eq!(
        Classifier::default().classify(&clean_exit()),
        ExecutionOutcome::Succeeded
    );
}

#[test]
fn test_timeout_dominates_crash_marker() {
    let raw = RawExecution {
        exit_status: Some(1),
        stderr: "FUZZILLI_CRASH: 0\n".to_string(),
        timed_out: true,
        ..clean_exit()
    };
    assert_eq!(Classifier::default().classify(&raw), ExecutionOutcome::TimedOut);
}

#[test]
fn test_timeout_dominates_signal() {
    let raw = RawExecution {
        exit_status: None,
        signal: Some(SIGSEGV),
        timed_out: true,
        ..clean_exit()
    };
    assert_eq!(Classifier::default().classify(&raw), ExecutionOutcome::TimedOut);
}

#[test]
fn test_elapsed_over_budget_is_timeout() {
    let classifier = Classifier {
        timeout: Some(Duration::from_millis(100)),
        ..Classifier::default()
    };
    let raw = RawExecution {
        elapsed: Duration::from_millis(100),
        ..clean_exit()
    };
    assert_eq!(classifier.classify(&raw), ExecutionOutcome::TimedOut);

    let unlimited = Classifier {
        timeout: None,
        ..Classifier::default()
    };
    assert_eq!(unlimited.classify(&raw), ExecutionOutcome::Succeeded);
}

#[test]
fn test_fatal_signal_is_crash() {
    let raw = RawExecution {
        exit_status: None,
        signal: Some(SIGSEGV),
        ..clean_exit()
    };
    assert_eq!(
        Classifier::default().classify(&raw),
        ExecutionOutcome::Crashed {
            termination: Termination::Signal(SIGSEGV)
        }
    );
}

#[test]
fn test_slow_crash_without_timeout_flag_is_crash() {
    let raw = RawExecution {
        exit_status: None,
        signal: Some(SIGSEGV),
        elapsed: Duration::from_millis(300),
        timed_out: false,
        ..clean_exit()
    };
    assert_eq!(
        Classifier::default().classify(&raw),
        ExecutionOutcome::Crashed {
            termination: Termination::Signal(SIGSEGV)
        }
    );

    let budgeted = Classifier {
        timeout: Some(Duration::from_millis(250)),
        ..Classifier::default()
    };
    assert_eq!(budgeted.classify(&raw), ExecutionOutcome::TimedOut);
}

#[test]
fn test_nonzero_exit_with_crash_marker_is_crash() {
    let raw = RawExecution {
        exit_status: Some(134),
        stdout: "FUZZILLI_CRASH\n".to_string(),
        ..clean_exit()
    };
    assert_eq!(
        Classifier::default().classify(&raw),
        ExecutionOutcome::Crashed {
            termination: Termination::Exit(134)
        }
    );
}

#[test]
fn test_crash_marker_with_clean_exit_is_not_crash() {
    let raw = RawExecution {
        stdout: "FUZZILLI_CRASH\n".to_string(),
        ..clean_exit()
    };
    assert_eq!(Classifier::default().classify(&raw), ExecutionOutcome::Succeeded);
}

#[test]
fn test_script_error_marker_is_failure_with_diagnostic() {
    let raw = RawExecution {
        exit_status: Some(1),
        stderr: "\n  Uncaught TypeError: v3 is not a function  \n".to_string(),
        ..clean_exit()
    };
    assert_eq!(
        Classifier::default().classify(&raw),
        ExecutionOutcome::Failed {
            diagnostic: "Uncaught TypeError: v3 is not a function".to_string()
        }
    );
}

#[test]
fn test_nonzero_exit_without_marker_is_failure() {
    let raw = RawExecution {
        exit_status: Some(3),
        ..clean_exit()
    };
    assert_eq!(
        Classifier::default().classify(&raw),
        ExecutionOutcome::Failed {
            diagnostic: "exit status 3".to_string()
        }
    );
}

#[test]
fn test_outcomes_compare_structurally() {
    let a = ExecutionOutcome::Failed {
        diagnostic: "x".to_string(),
    };
    let b = ExecutionOutcome::Failed {
        diagnostic: "x".to_string(),
    };
    let c = ExecutionOutcome::Failed {
        diagnostic: "y".to_string(),
    };
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(
        ExecutionOutcome::Crashed {
            termination: Termination::Signal(6)
        },
        ExecutionOutcome::Crashed {
            termination: Termination::Exit(6)
        }
    );
}

#[test]
fn test_classifier_config_from_json() {
    let classifier: Classifier = serde_json::from_str(
        r#"{ "crash_marker": "BOOM", "error_markers": ["Error"], "timeout": null }"#,
    )
    .unwrap();
    let raw = RawExecution {
        exit_status: Some(1),
        stderr: "BOOM".to_string(),
        ..clean_exit()
    };
    assert!(classifier.classify(&raw).is_crash());
}

#[test]
fn test_classifier_config_without_timeout_has_no_budget() {
    let classifier: Classifier =
        serde_json::from_str(r#"{ "crash_marker": "BOOM", "error_markers": [] }"#).unwrap();
    assert_eq!(classifier.timeout, None);
}
