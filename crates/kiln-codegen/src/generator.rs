use kiln_ir::program::Variable;
use kiln_ir::types::ValueType;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::builder::Builder;

/// What a generator did with the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// At least one instruction was emitted.
    Emitted,
    /// Inputs were not satisfiable; the builder was not touched.
    Skipped,
}

/// Generation procedure: builder, resolved inputs (one per declared input
/// type, in order), random source.
///
/// A procedure that returns [`Emission::Skipped`] must not have emitted
/// anything.
pub type GenerateFn = fn(&mut dyn Builder, &[Variable], &mut ChaCha8Rng) -> Emission;

/// A named, weighted unit of synthesis logic.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    name: String,
    inputs: Vec<ValueType>,
    procedure: GenerateFn,
}

impl CodeGenerator {
    pub fn new(name: impl Into<String>, inputs: Vec<ValueType>, procedure: GenerateFn) -> Self {
        Self {
            name: name.into(),
            inputs,
            procedure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[ValueType] {
        &self.inputs
    }

    /// Resolve one visible variable per declared input and run the procedure.
    ///
    /// If any input has no compatible variable the generator is skipped
    /// before anything is emitted.
    pub fn generate(&self, b: &mut dyn Builder, rng: &mut ChaCha8Rng) -> Emission {
        let mut resolved = Vec::with_capacity(self.inputs.len());
        for ty in &self.inputs {
            match b.visible_variables(ty).choose(rng) {
                Some(&v) => resolved.push(v),
                None => {
                    tracing::debug!(
                        generator = %self.name,
                        input = %ty,
                        "no compatible input, skipping"
                    );
                    return Emission::Skipped;
                }
            }
        }
        self.generate_with(b, &resolved, rng)
    }

    /// Run the procedure with caller-chosen inputs.
    pub fn generate_with(
        &self,
        b: &mut dyn Builder,
        inputs: &[Variable],
        rng: &mut ChaCha8Rng,
    ) -> Emission {
        assert_eq!(
            inputs.len(),
            self.inputs.len(),
            "generator {} takes {} inputs",
            self.name,
            self.inputs.len()
        );
        let before = (b.instruction_count(), b.variable_count());
        let emission = (self.procedure)(b, inputs, rng);
        if emission == Emission::Skipped {
            assert_eq!(
                before,
                (b.instruction_count(), b.variable_count()),
                "generator {} emitted code but reported a skip",
                self.name
            );
        }
        emission
    }
}
