use kiln_codegen::builder::{Builder, ProgramBuilder};
use kiln_codegen::generator::{CodeGenerator, Emission};
use kiln_codegen::generators::{
    base_generators, binary_operation_generator, builtin_generator, for_loop_generator,
    function_call_generator, function_definition_generator, integer_generator,
};
use kiln_codegen::rng::worker_rng;
use kiln_ir::lift::lift;
use kiln_ir::types::ValueType;

fn counts(b: &ProgramBuilder) -> (usize, usize) {
    (b.instruction_count(), b.variable_count())
}

#[test]
fn test_skip_leaves_builder_untouched() {
    let mut rng = worker_rng(11, 0);
    for generator in [binary_operation_generator(), function_call_generator()] {
        let mut b = ProgramBuilder::default();
        let before = counts(&b);
        assert_eq!(generator.generate(&mut b, &mut rng), Emission::Skipped);
        assert_eq!(counts(&b), before, "{} touched the builder", generator.name());
    }
}

#[test]
fn test_builtin_generator_skips_without_catalog() {
    let mut b = ProgramBuilder::default();
    let mut rng = worker_rng(11, 0);
    assert_eq!(builtin_generator().generate(&mut b, &mut rng), Emission::Skipped);
    assert_eq!(counts(&b), (0, 0));
}

#[test]
fn test_function_call_skips_when_arguments_unsatisfiable() {
    let mut b = ProgramBuilder::default();
    let mut rng = worker_rng(5, 0);
    // A function demanding a string, with no string in scope.
    b.define_function(
        kiln_ir::types::Signature::new(vec![ValueType::String], ValueType::Undefined),
        &mut |_, _| None,
    );
    let before = counts(&b);
    assert_eq!(
        function_call_generator().generate(&mut b, &mut rng),
        Emission::Skipped
    );
    assert_eq!(counts(&b), before);
}

#[test]
fn test_generators_without_inputs_always_emit() {
    let mut rng = worker_rng(2, 0);
    for generator in [
        integer_generator(),
        function_definition_generator(),
        for_loop_generator(),
    ] {
        let mut b = ProgramBuilder::default();
        assert_eq!(generator.generate(&mut b, &mut rng), Emission::Emitted);
        assert!(b.instruction_count() > 0);
    }
}

#[test]
fn test_same_seed_same_program() {
    let synthesize = |seed| {
        let mut rng = worker_rng(seed, 0);
        let mut b = ProgramBuilder::default();
        for (generator, _) in base_generators().iter().cycle().take(30) {
            generator.generate(&mut b, &mut rng);
        }
        lift(&b.finalize())
    };
    assert_eq!(synthesize(99), synthesize(99));
}

#[test]
#[should_panic(expected = "reported a skip")]
fn test_skip_after_emission_is_a_contract_violation() {
    fn lying(
        b: &mut dyn Builder,
        _: &[kiln_ir::program::Variable],
        _: &mut rand_chacha::ChaCha8Rng,
    ) -> Emission {
        b.load_int(1);
        Emission::Skipped
    }
    let generator = CodeGenerator::new("Lying", vec![], lying);
    let mut b = ProgramBuilder::default();
    generator.generate(&mut b, &mut worker_rng(0, 0));
}

#[test]
#[should_panic(expected = "BinaryOperationGenerator takes 2 inputs")]
fn test_wrong_input_count_is_a_contract_violation() {
    let mut b = ProgramBuilder::default();
    let n = b.load_int(1);
    binary_operation_generator().generate_with(&mut b, &[n], &mut worker_rng(0, 0));
}
