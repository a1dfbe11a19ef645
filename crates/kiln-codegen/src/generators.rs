//! Base generator catalog shared by every target.

use kiln_ir::program::{BinaryOperator, Comparator, Variable};
use kiln_ir::types::{Signature, ValueType};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::builder::{random_call_arguments, Builder};
use crate::generator::{CodeGenerator, Emission};
use crate::registry::GeneratorRegistry;

/// Integers that tend to sit on engine fast-path boundaries. All of them
/// are exact JS numbers, so the lifted literal is the value the engine sees.
const INTERESTING_INTEGERS: &[i64] = &[
    -9_007_199_254_740_991,
    -2_147_483_649,
    -2_147_483_648,
    -1_073_741_824,
    -65_536,
    -4_096,
    -1,
    0,
    1,
    2,
    16,
    64,
    1_024,
    65_535,
    1_073_741_823,
    2_147_483_647,
    4_294_967_295,
    9_007_199_254_740_991,
];

const MAX_LOOP_ITERATIONS: i64 = 16;
const MAX_FUNCTION_PARAMS: usize = 3;

fn random_integer(rng: &mut ChaCha8Rng) -> i64 {
    if rng.gen_bool(0.5) {
        *INTERESTING_INTEGERS
            .choose(rng)
            .expect("interesting integer table is non-empty")
    } else {
        rng.gen_range(-256..=256)
    }
}

fn integer(b: &mut dyn Builder, _: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    b.load_int(random_integer(rng));
    Emission::Emitted
}

fn builtin(b: &mut dyn Builder, _: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    match b.builtins().choose(rng) {
        Some(name) => {
            b.load_builtin(name);
            Emission::Emitted
        }
        None => Emission::Skipped,
    }
}

fn binary_operation(b: &mut dyn Builder, inputs: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    let op = *BinaryOperator::ALL
        .choose(rng)
        .expect("operator table is non-empty");
    b.binary(inputs[0], op, inputs[1]);
    Emission::Emitted
}

fn function_definition(b: &mut dyn Builder, _: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    let arity = rng.gen_range(0..=MAX_FUNCTION_PARAMS);
    let signature = Signature::new(vec![ValueType::Anything; arity], ValueType::Anything);
    let value = random_integer(rng);
    b.define_function(signature, &mut |b, params| {
        let constant = b.load_int(value);
        match params.first() {
            Some(&first) => Some(b.binary(first, BinaryOperator::Add, constant)),
            None => Some(constant),
        }
    });
    Emission::Emitted
}

fn function_call(b: &mut dyn Builder, inputs: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    let function = inputs[0];
    let Some(arguments) = random_call_arguments(b, function, rng) else {
        return Emission::Skipped;
    };
    b.call_function(function, &arguments);
    Emission::Emitted
}

fn for_loop(b: &mut dyn Builder, _: &[Variable], rng: &mut ChaCha8Rng) -> Emission {
    let start = b.load_int(0);
    let end = b.load_int(rng.gen_range(1..=MAX_LOOP_ITERATIONS));
    let step = b.load_int(1);
    b.for_loop(
        start,
        Comparator::LessThan,
        end,
        BinaryOperator::Add,
        step,
        &mut |b, i| {
            b.binary(i, BinaryOperator::Mul, i);
        },
    );
    Emission::Emitted
}

pub fn integer_generator() -> CodeGenerator {
    CodeGenerator::new("IntegerGenerator", vec![], integer)
}

pub fn builtin_generator() -> CodeGenerator {
    CodeGenerator::new("BuiltinGenerator", vec![], builtin)
}

pub fn binary_operation_generator() -> CodeGenerator {
    CodeGenerator::new(
        "BinaryOperationGenerator",
        vec![ValueType::Integer, ValueType::Integer],
        binary_operation,
    )
}

pub fn function_definition_generator() -> CodeGenerator {
    CodeGenerator::new("FunctionDefinitionGenerator", vec![], function_definition)
}

pub fn function_call_generator() -> CodeGenerator {
    CodeGenerator::new(
        "FunctionCallGenerator",
        vec![ValueType::any_function()],
        function_call,
    )
}

pub fn for_loop_generator() -> CodeGenerator {
    CodeGenerator::new("ForLoopGenerator", vec![], for_loop)
}

/// Every base generator with its default weight.
pub fn base_generators() -> Vec<(CodeGenerator, u32)> {
    vec![
        (integer_generator(), 2),
        (builtin_generator(), 5),
        (binary_operation_generator(), 4),
        (function_definition_generator(), 3),
        (function_call_generator(), 10),
        (for_loop_generator(), 5),
    ]
}

pub fn base_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    registry.add_generators(base_generators());
    registry
}
