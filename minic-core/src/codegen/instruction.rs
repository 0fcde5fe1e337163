use std::fmt::Display;

use crate::parser::prelude::BinaryOperator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Temp(usize),
    Name(String),
    Int(i64),
    Str(String),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Temp(index) => write!(f, "t{index}"),
            Operand::Name(name) => write!(f, "{name}"),
            Operand::Int(value) => write!(f, "{value}"),
            Operand::Str(value) => write!(f, "\"{value}\""),
        }
    }
}

/// A three-address instruction. Each one reads at most two operands and
/// writes at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Func { name: String },
    EndFunc { name: String },
    ParamDecl { name: String },
    Move { dest: Operand, src: Operand },
    Binary {
        operator: BinaryOperator,
        dest: Operand,
        left: Operand,
        right: Operand,
    },
    Negate { dest: Operand, operand: Operand },
    Return { value: Option<Operand> },
    Print { value: Operand },
    /// Jumps to `label` when `condition` is zero.
    IfZero { condition: Operand, label: String },
    Goto { label: String },
    Label { label: String },
    /// Pushes one call argument.
    Param { value: Operand },
    Call { function: String, arguments: usize },
    /// Stores the result of the last call.
    Pop { dest: Operand },
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Func { name } => write!(f, "{name}:"),
            Instruction::EndFunc { name } => write!(f, "END {name}"),
            Instruction::ParamDecl { name } => write!(f, "  PARAM_DECL {name}"),
            Instruction::Move { dest, src } => write!(f, "  {dest} = {src}"),
            Instruction::Binary { operator, dest, left, right } => {
                write!(f, "  {dest} = {left} {operator} {right}")
            },
            Instruction::Negate { dest, operand } => write!(f, "  {dest} = -{operand}"),
            Instruction::Return { value: Some(value) } => write!(f, "  return {value}"),
            Instruction::Return { value: None } => write!(f, "  return"),
            Instruction::Print { value } => write!(f, "  print {value}"),
            Instruction::IfZero { condition, label } => write!(f, "  IFZ {condition} -> {label}"),
            Instruction::Goto { label } => write!(f, "  GOTO {label}"),
            Instruction::Label { label } => write!(f, "{label}:"),
            Instruction::Param { value } => write!(f, "  PARAM {value}"),
            Instruction::Call { function, arguments } => write!(f, "  CALL {function}, {arguments}"),
            Instruction::Pop { dest } => write!(f, "  POP {dest}"),
        }
    }
}
