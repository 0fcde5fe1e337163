use crate::parser::prelude::BinaryOperator;
use super::instruction::{Instruction, Operand};

fn mnemonic(operator: BinaryOperator) -> &'static str {
    match operator {
        BinaryOperator::Add => "ADD",
        BinaryOperator::Sub => "SUB",
        BinaryOperator::Mul => "MUL",
        BinaryOperator::Div => "DIV",
        BinaryOperator::Eq => "EQ",
        BinaryOperator::Ne => "NE",
        BinaryOperator::Lt => "LT",
        BinaryOperator::Le => "LE",
        BinaryOperator::Gt => "GT",
        BinaryOperator::Ge => "GE",
    }
}

/// Translates three-address code into an assembly-like listing with a
/// stack for call arguments. Function ends and parameter declarations
/// produce no lines.
pub fn target_code(code: &[Instruction]) -> Vec<String> {
    let mut lines = vec![];

    for instruction in code {
        match instruction {
            Instruction::Func { name } => lines.push(format!("{name}:")),
            Instruction::EndFunc { .. } | Instruction::ParamDecl { .. } => {},
            Instruction::Move { dest, src } => {
                if dest != src {
                    lines.push(format!("MOV {dest}, {src}"));
                }
            },
            Instruction::Binary { operator, dest, left, right } => {
                lines.push(format!("{} {dest}, {left}, {right}", mnemonic(*operator)));
            },
            Instruction::Negate { dest, operand } => lines.push(format!("NEG {dest}, {operand}")),
            Instruction::Return { value } => {
                let value = value.clone().unwrap_or(Operand::Int(0));
                lines.push(format!("RET {value}"));
            },
            Instruction::Print { value } => lines.push(format!("PRINT {value}")),
            Instruction::IfZero { condition, label } => {
                lines.push(format!("CMP {condition}, 0"));
                lines.push(format!("JE {label}"));
            },
            Instruction::Goto { label } => lines.push(format!("JMP {label}")),
            Instruction::Label { label } => lines.push(format!("{label}:")),
            Instruction::Param { value } => lines.push(format!("PUSH {value}")),
            Instruction::Call { function, arguments } => lines.push(format!("CALL {function}, {arguments}")),
            Instruction::Pop { dest } => lines.push(format!("POP {dest}")),
        }
    }

    lines
}
