use std::collections::BTreeMap;

use kiln_codegen::generators::{base_registry, for_loop_generator, integer_generator};
use kiln_codegen::registry::GeneratorRegistry;
use kiln_profile::profile::{EcmaVersion, Profile, ProfileError};

fn empty_profile() -> Profile {
    Profile {
        process_arguments: vec![],
        process_env: BTreeMap::new(),
        code_prefix: String::new(),
        code_suffix: String::new(),
        ecma_version: EcmaVersion::Es6,
        crash_tests: vec![],
        additional_code_generators: vec![],
        disabled_code_generators: vec![],
        additional_builtins: BTreeMap::new(),
    }
}

#[test]
fn test_build_registry_leaves_base_untouched() {
    let base = base_registry();
    let before = base.names().len();
    let profile = Profile {
        disabled_code_generators: vec!["ForLoopGenerator".to_string()],
        ..empty_profile()
    };

    let registry = profile.build_registry(&base).unwrap();
    assert!(!registry.contains("ForLoopGenerator"));
    assert!(base.contains("ForLoopGenerator"));
    assert_eq!(base.names().len(), before);
}

#[test]
fn test_disable_wins_over_base_entry() {
    let profile = Profile {
        disabled_code_generators: vec![
            "IntegerGenerator".to_string(),
            "FunctionCallGenerator".to_string(),
        ],
        ..empty_profile()
    };
    let registry = profile.build_registry(&base_registry()).unwrap();
    assert!(!registry.contains("IntegerGenerator"));
    assert!(!registry.contains("FunctionCallGenerator"));
}

#[test]
fn test_additions_applied_after_disables() {
    let profile = Profile {
        disabled_code_generators: vec!["IntegerGenerator".to_string()],
        additional_code_generators: vec![(integer_generator(), 9)],
        ..empty_profile()
    };
    let registry = profile.build_registry(&base_registry()).unwrap();
    assert_eq!(registry.weight("IntegerGenerator"), Some(9));
}

#[test]
fn test_addition_replaces_base_weight() {
    let profile = Profile {
        additional_code_generators: vec![(for_loop_generator(), 42)],
        ..empty_profile()
    };
    let base = base_registry();
    let registry = profile.build_registry(&base).unwrap();
    assert_eq!(registry.len(), base.len());
    assert_eq!(registry.weight("ForLoopGenerator"), Some(42));
}

#[test]
fn test_disabling_undeclared_generator_is_config_error() {
    let profile = Profile {
        disabled_code_generators: vec!["NoSuchGenerator".to_string()],
        ..empty_profile()
    };
    match profile.build_registry(&base_registry()) {
        Err(ProfileError::UnknownGenerator { name }) => assert_eq!(name, "NoSuchGenerator"),
        other => panic!("expected UnknownGenerator, got {other:?}"),
    }
}

#[test]
fn test_empty_result_is_config_error() {
    let profile = empty_profile();
    assert!(matches!(
        profile.build_registry(&GeneratorRegistry::new()),
        Err(ProfileError::EmptyRegistry)
    ));
}

#[test]
fn test_wrap_is_exact_concatenation() {
    let profile = Profile {
        code_prefix: "function helper(){}\nfunction main() {".to_string(),
        code_suffix: "}\nmain();".to_string(),
        ..empty_profile()
    };
    assert_eq!(
        profile.wrap("let v0 = 1;"),
        "function helper(){}\nfunction main() {let v0 = 1;}\nmain();"
    );
    assert_eq!(profile.wrap(""), "function helper(){}\nfunction main() {}\nmain();");
}

#[test]
fn test_ecma_versions_are_ordered() {
    assert!(EcmaVersion::Es5 < EcmaVersion::Es6);
    assert!(EcmaVersion::Es6 < EcmaVersion::Es2020);
}
