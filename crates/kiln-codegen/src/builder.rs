//! The builder contract generators emit code through, and the reference
//! in-memory implementation.

use std::collections::BTreeMap;

use kiln_ir::program::{BinaryOperator, Comparator, Instruction, Program, Variable};
use kiln_ir::types::{Signature, ValueType};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Body of a `for` loop. Receives the induction variable.
pub type LoopBody<'a> = &'a mut dyn FnMut(&mut dyn Builder, Variable);

/// Body of a function definition. Receives the parameters and may return a
/// value from the function.
pub type FunctionBody<'a> = &'a mut dyn FnMut(&mut dyn Builder, &[Variable]) -> Option<Variable>;

/// Sole mutator of an in-progress program during synthesis.
///
/// Single-threaded and cooperative: block bodies run synchronously before the
/// emitting call returns. Every returned handle stays valid (while its scope
/// is open) for the rest of the run and is never reused for another value.
pub trait Builder {
    fn load_int(&mut self, value: i64) -> Variable;

    /// Load a global the target exposes. Typed from the builtin catalog,
    /// `Anything` for names the catalog does not declare.
    fn load_builtin(&mut self, name: &str) -> Variable;

    fn binary(&mut self, lhs: Variable, op: BinaryOperator, rhs: Variable) -> Variable;

    fn define_function(&mut self, signature: Signature, body: FunctionBody<'_>) -> Variable;

    fn for_loop(
        &mut self,
        start: Variable,
        comparator: Comparator,
        end: Variable,
        op: BinaryOperator,
        step: Variable,
        body: LoopBody<'_>,
    );

    fn call_function(&mut self, function: Variable, arguments: &[Variable]) -> Variable;

    /// Handles in scope whose type is compatible with `ty`. Possibly empty.
    fn visible_variables(&self, ty: &ValueType) -> Vec<Variable>;

    fn type_of(&self, variable: Variable) -> ValueType;

    /// Names of the builtins the target declares.
    fn builtins(&self) -> Vec<String>;

    fn instruction_count(&self) -> usize;

    fn variable_count(&self) -> usize;
}

/// Pick call arguments for `function` from the visible variables.
///
/// With a known signature every parameter must be satisfiable or `None` is
/// returned. With an unknown signature up to two arbitrary visible values
/// are passed. The callee itself is never passed to itself.
pub fn random_call_arguments(
    b: &dyn Builder,
    function: Variable,
    rng: &mut ChaCha8Rng,
) -> Option<Vec<Variable>> {
    match b.type_of(function).signature() {
        Some(signature) => signature
            .params
            .iter()
            .map(|param| {
                let candidates: Vec<Variable> = b
                    .visible_variables(param)
                    .into_iter()
                    .filter(|&v| v != function)
                    .collect();
                candidates.choose(rng).copied()
            })
            .collect(),
        None => {
            let candidates: Vec<Variable> = b
                .visible_variables(&ValueType::Anything)
                .into_iter()
                .filter(|&v| v != function)
                .collect();
            let count = rng.gen_range(0..=2).min(candidates.len());
            Some(
                candidates
                    .choose_multiple(rng, count)
                    .copied()
                    .collect(),
            )
        }
    }
}

/// In-memory builder producing a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
    /// Declared type per variable, indexed by handle number.
    types: Vec<ValueType>,
    /// Variables visible in each open block, outermost first.
    scopes: Vec<Vec<Variable>>,
    builtins: BTreeMap<String, ValueType>,
}

impl ProgramBuilder {
    pub fn new(builtins: BTreeMap<String, ValueType>) -> Self {
        Self {
            instructions: Vec::new(),
            types: Vec::new(),
            scopes: vec![Vec::new()],
            builtins,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn finalize(self) -> Program {
        Program {
            instructions: self.instructions,
        }
    }

    fn allocate(&mut self, ty: ValueType) -> Variable {
        let variable = Variable(self.types.len() as u32);
        self.types.push(ty);
        variable
    }

    fn define(&mut self, ty: ValueType) -> Variable {
        let variable = self.allocate(ty);
        self.current_scope().push(variable);
        variable
    }

    fn current_scope(&mut self) -> &mut Vec<Variable> {
        self.scopes
            .last_mut()
            .expect("builder always has an outermost scope")
    }

    fn is_visible(&self, variable: Variable) -> bool {
        self.scopes.iter().any(|scope| scope.contains(&variable))
    }

    fn expect_visible(&self, variable: Variable) {
        assert!(
            self.is_visible(variable),
            "{variable} is not visible in the current scope"
        );
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl Builder for ProgramBuilder {
    fn load_int(&mut self, value: i64) -> Variable {
        let output = self.define(ValueType::Integer);
        self.instructions
            .push(Instruction::LoadInteger { output, value });
        output
    }

    fn load_builtin(&mut self, name: &str) -> Variable {
        let ty = self
            .builtins
            .get(name)
            .cloned()
            .unwrap_or(ValueType::Anything);
        let output = self.define(ty);
        self.instructions.push(Instruction::LoadBuiltin {
            output,
            name: name.to_string(),
        });
        output
    }

    fn binary(&mut self, lhs: Variable, op: BinaryOperator, rhs: Variable) -> Variable {
        self.expect_visible(lhs);
        self.expect_visible(rhs);
        let both_integers =
            self.type_of(lhs) == ValueType::Integer && self.type_of(rhs) == ValueType::Integer;
        let ty = if both_integers {
            ValueType::Integer
        } else {
            ValueType::Anything
        };
        let output = self.define(ty);
        self.instructions.push(Instruction::BinaryOperation {
            output,
            lhs,
            op,
            rhs,
        });
        output
    }

    fn define_function(&mut self, signature: Signature, body: FunctionBody<'_>) -> Variable {
        // Declared in the enclosing scope first so the body may recurse.
        let output = self.define(ValueType::Function {
            signature: Some(Box::new(signature.clone())),
        });
        let params: Vec<Variable> = signature
            .params
            .iter()
            .map(|ty| self.allocate(ty.clone()))
            .collect();

        self.instructions.push(Instruction::BeginFunction {
            output,
            params: params.clone(),
            signature,
        });
        self.scopes.push(params.clone());
        let b: &mut dyn Builder = self;
        if let Some(value) = body(b, &params) {
            self.expect_visible(value);
            self.instructions.push(Instruction::Return { value });
        }
        self.scopes.pop();
        self.instructions.push(Instruction::EndFunction);
        output
    }

    fn for_loop(
        &mut self,
        start: Variable,
        comparator: Comparator,
        end: Variable,
        op: BinaryOperator,
        step: Variable,
        body: LoopBody<'_>,
    ) {
        for v in [start, end, step] {
            self.expect_visible(v);
        }
        let induction = self.allocate(ValueType::Integer);
        self.instructions.push(Instruction::BeginFor {
            induction,
            start,
            comparator,
            end,
            op,
            step,
        });
        self.scopes.push(vec![induction]);
        let b: &mut dyn Builder = self;
        body(b, induction);
        self.scopes.pop();
        self.instructions.push(Instruction::EndFor);
    }

    fn call_function(&mut self, function: Variable, arguments: &[Variable]) -> Variable {
        self.expect_visible(function);
        for &arg in arguments {
            self.expect_visible(arg);
        }
        let returns = self
            .type_of(function)
            .signature()
            .map(|sig| sig.returns.clone())
            .unwrap_or(ValueType::Anything);
        let output = self.define(returns);
        self.instructions.push(Instruction::CallFunction {
            output,
            function,
            arguments: arguments.to_vec(),
        });
        output
    }

    fn visible_variables(&self, ty: &ValueType) -> Vec<Variable> {
        self.scopes
            .iter()
            .flatten()
            .copied()
            .filter(|v| self.types[v.index()].is_compatible_with(ty))
            .collect()
    }

    fn type_of(&self, variable: Variable) -> ValueType {
        self.types
            .get(variable.index())
            .cloned()
            .unwrap_or_else(|| panic!("{variable} was never allocated by this builder"))
    }

    fn builtins(&self) -> Vec<String> {
        self.builtins.keys().cloned().collect()
    }

    fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    fn variable_count(&self) -> usize {
        self.types.len()
    }
}
