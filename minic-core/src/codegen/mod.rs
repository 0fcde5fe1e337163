pub mod codegen;
pub mod instruction;
pub mod target;

pub mod prelude {
    pub use super::{
        codegen::*,
        instruction::*,
        target::*,
        listing
    };
}

use self::instruction::Instruction;

/// One instruction per line, labels and function names flush left.
pub fn listing(code: &[Instruction]) -> String {
    code.iter()
        .map(|instruction| instruction.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}
