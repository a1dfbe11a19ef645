//! JavaScript lifting.
//!
//! Renders a [`Program`] as the body text that a target profile wraps with
//! its prefix and suffix. One statement per line, four spaces per block.

use std::fmt::Write;

use crate::program::{Instruction, Program};

const INDENT: &str = "    ";

pub fn lift(program: &Program) -> String {
    let mut out = String::new();
    let mut depth = 0usize;

    for instr in &program.instructions {
        if instr.is_block_end() {
            depth = depth.saturating_sub(1);
        }
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        // Writing into a String cannot fail.
        let _ = match instr {
            Instruction::LoadInteger { output, value } => {
                writeln!(out, "let {output} = {value};")
            }
            Instruction::LoadBuiltin { output, name } => {
                writeln!(out, "let {output} = {name};")
            }
            Instruction::BinaryOperation {
                output,
                lhs,
                op,
                rhs,
            } => writeln!(out, "let {output} = {lhs} {} {rhs};", op.token()),
            Instruction::BeginFunction { output, params, .. } => {
                writeln!(out, "function {output}({}) {{", join(params))
            }
            Instruction::Return { value } => writeln!(out, "return {value};"),
            Instruction::CallFunction {
                output,
                function,
                arguments,
            } => writeln!(out, "let {output} = {function}({});", join(arguments)),
            Instruction::BeginFor {
                induction,
                start,
                comparator,
                end,
                op,
                step,
            } => writeln!(
                out,
                "for (let {induction} = {start}; {induction} {} {end}; {induction} = {induction} {} {step}) {{",
                comparator.token(),
                op.token()
            ),
            Instruction::EndFunction | Instruction::EndFor => writeln!(out, "}}"),
        };
        if instr.is_block_begin() {
            depth += 1;
        }
    }

    out
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
