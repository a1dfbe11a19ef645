mod common;

use kiln_core::runner::{Execution, NullRunner};
use kiln_core::self_test::{check_crash_tests, SelfTestError};
use kiln_eval::outcome::{Classifier, RawExecution};
use kiln_profile::profiles::v8::v8_profile;

use common::fake_engine;

#[test]
fn test_v8_crash_tests_detected() {
    let profile = v8_profile();
    let result = check_crash_tests(&profile, &mut fake_engine, &Classifier::default());
    assert!(result.is_ok(), "self-test failed: {:?}", result.unwrap_err());
}

#[test]
fn test_target_that_never_crashes_fails_self_test() {
    let profile = v8_profile();
    match check_crash_tests(&profile, &mut NullRunner, &Classifier::default()) {
        Err(SelfTestError::CrashNotDetected { snippet, .. }) => {
            assert_eq!(snippet, "fuzzilli('FUZZILLI_CRASH', 0)");
        }
        other => panic!("expected CrashNotDetected, got {other:?}"),
    }
}

#[test]
fn test_broken_baseline_fails_self_test() {
    let profile = v8_profile();
    let mut broken = |_: &str| Execution {
        raw: RawExecution {
            exit_status: Some(1),
            stderr: "SyntaxError: Unexpected token '%'".to_string(),
            ..RawExecution::default()
        },
        edges: vec![],
    };
    assert!(matches!(
        check_crash_tests(&profile, &mut broken, &Classifier::default()),
        Err(SelfTestError::BaselineFailed { .. })
    ));
}
