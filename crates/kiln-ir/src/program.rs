use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Signature;

/// Handle to a value produced by an instruction.
///
/// Handles are numbered in creation order and never reused within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable(pub u32);

impl Variable {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Comparator {
    pub const ALL: [Comparator; 6] = [
        Comparator::Equal,
        Comparator::NotEqual,
        Comparator::LessThan,
        Comparator::LessThanOrEqual,
        Comparator::GreaterThan,
        Comparator::GreaterThanOrEqual,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    Xor,
    LShift,
    RShift,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 10] = [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Mod,
        BinaryOperator::BitAnd,
        BinaryOperator::BitOr,
        BinaryOperator::Xor,
        BinaryOperator::LShift,
        BinaryOperator::RShift,
    ];

    pub fn token(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::Xor => "^",
            BinaryOperator::LShift => "<<",
            BinaryOperator::RShift => ">>",
        }
    }
}

/// One instruction of a synthesized program.
///
/// Blocks are flat: a `Begin*` instruction opens a block that the matching
/// `End*` instruction closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    LoadInteger {
        output: Variable,
        value: i64,
    },
    LoadBuiltin {
        output: Variable,
        name: String,
    },
    BinaryOperation {
        output: Variable,
        lhs: Variable,
        op: BinaryOperator,
        rhs: Variable,
    },
    BeginFunction {
        output: Variable,
        params: Vec<Variable>,
        signature: Signature,
    },
    Return {
        value: Variable,
    },
    EndFunction,
    CallFunction {
        output: Variable,
        function: Variable,
        arguments: Vec<Variable>,
    },
    BeginFor {
        induction: Variable,
        start: Variable,
        comparator: Comparator,
        end: Variable,
        op: BinaryOperator,
        step: Variable,
    },
    EndFor,
}

impl Instruction {
    pub fn is_block_begin(&self) -> bool {
        matches!(
            self,
            Instruction::BeginFunction { .. } | Instruction::BeginFor { .. }
        )
    }

    pub fn is_block_end(&self) -> bool {
        matches!(self, Instruction::EndFunction | Instruction::EndFor)
    }
}

/// A synthesized program: a flat list of instructions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn loop_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::BeginFor { .. }))
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::CallFunction { .. }))
            .count()
    }

    /// Call instructions nested (at any depth) inside a `for` loop.
    pub fn calls_inside_loops(&self) -> Vec<&Instruction> {
        let mut open = Vec::new();
        let mut calls = Vec::new();
        for instr in &self.instructions {
            match instr {
                Instruction::BeginFor { .. } | Instruction::BeginFunction { .. } => {
                    open.push(matches!(instr, Instruction::BeginFor { .. }));
                }
                Instruction::EndFor | Instruction::EndFunction => {
                    open.pop();
                }
                Instruction::CallFunction { .. } if open.iter().any(|&is_loop| is_loop) => {
                    calls.push(instr);
                }
                _ => {}
            }
        }
        calls
    }
}
