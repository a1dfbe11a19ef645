use std::collections::BTreeMap;

use kiln_codegen::builder::{random_call_arguments, Builder};
use kiln_codegen::generator::{CodeGenerator, Emission};
use kiln_ir::program::{BinaryOperator, Comparator, Variable};
use kiln_ir::types::ValueType;
use rand_chacha::ChaCha8Rng;

use crate::profile::{EcmaVersion, Profile};

const OPTIMIZATION_LOOP_END: i64 = 100;

/// Call a function in a hot counting loop so V8 tiers it up to Turbofan.
fn force_turbofan(b: &mut dyn Builder, inputs: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    let f = inputs[0];
    let Some(arguments) = random_call_arguments(b, f, rng) else {
        return Emission::Skipped;
    };

    let start = b.load_int(0);
    let end = b.load_int(OPTIMIZATION_LOOP_END);
    let step = b.load_int(1);
    b.for_loop(
        start,
        Comparator::LessThan,
        end,
        BinaryOperator::Add,
        step,
        &mut |b, _| {
            b.call_function(f, &arguments);
        },
    );
    Emission::Emitted
}

pub fn force_turbofan_generator() -> CodeGenerator {
    CodeGenerator::new(
        "ForceV8TurbofanGenerator",
        vec![ValueType::any_function()],
        force_turbofan,
    )
}

const CODE_PREFIX: &str = "\
function placeholder(){}
function PrepareFunctionForOptimization(a){%PrepareFunctionForOptimization(a);}
function OptimizeFunctionOnNextCall(a){%OptimizeFunctionOnNextCall(a);}
function NeverOptimizeFunction(a){%NeverOptimizeFunction(a);}
function DeoptimizeFunction(a){%DeoptimizeFunction(a);}
function DeoptimizeNow(){%DeoptimizeNow();}
function OptimizeOsr(){%OptimizeOsr();}
function main() {
";

const CODE_SUFFIX: &str = "\
}
%NeverOptimizeFunction(main);
main();
";

pub fn v8_profile() -> Profile {
    let process_arguments = [
        "--debug-code",
        "--expose-gc",
        "--single-threaded",
        "--predictable",
        "--allow-natives-syntax",
        "--interrupt-budget=1024",
        "--assert-types",
        "--fuzzing",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    let nullary = || ValueType::function(vec![], ValueType::Undefined);
    let on_function = || ValueType::function(vec![ValueType::any_function()], ValueType::Undefined);

    let additional_builtins = BTreeMap::from([
        ("gc".to_string(), nullary()),
        ("PrepareFunctionForOptimization".to_string(), on_function()),
        ("OptimizeFunctionOnNextCall".to_string(), on_function()),
        ("NeverOptimizeFunction".to_string(), on_function()),
        ("DeoptimizeFunction".to_string(), on_function()),
        ("DeoptimizeNow".to_string(), nullary()),
        ("OptimizeOsr".to_string(), nullary()),
        ("placeholder".to_string(), nullary()),
    ]);

    Profile {
        process_arguments,
        process_env: BTreeMap::new(),
        code_prefix: CODE_PREFIX.to_string(),
        code_suffix: CODE_SUFFIX.to_string(),
        ecma_version: EcmaVersion::Es6,
        crash_tests: (0..3)
            .map(|kind| format!("fuzzilli('FUZZILLI_CRASH', {kind})"))
            .collect(),
        additional_code_generators: vec![(force_turbofan_generator(), 10)],
        disabled_code_generators: Vec::new(),
        additional_builtins,
    }
}
