use std::collections::HashMap;

use crate::{
    parser::prelude::{Block, Identifier, Program, BUILTIN_PRINT},
    utils::prelude::SrcSpan
};
use super::prelude::EnvironmentError;

/// A top-level function, borrowed from the program it was declared in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Function<'p> {
    pub name: &'p Identifier,
    pub parameters: &'p [Identifier],
    pub body: &'p Block,
    pub location: SrcSpan,
}

impl Function<'_> {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

#[derive(Debug, Default, Clone)]
pub struct FunctionTable<'p> {
    functions: HashMap<&'p str, Function<'p>>,
}

impl<'p> FunctionTable<'p> {
    /// Registers every function of the program before anything runs, which
    /// is what lets functions call each other regardless of textual order.
    pub fn register(program: &'p Program) -> Result<Self, EnvironmentError> {
        let mut functions: HashMap<&'p str, Function<'p>> = HashMap::new();

        for decl in &program.functions {
            let name = decl.name.value.as_str();

            if name == BUILTIN_PRINT {
                return Err(EnvironmentError::BuiltinRedefinition {
                    name: name.to_string(),
                    location: decl.name.location
                });
            }

            if let Some(existing) = functions.get(name) {
                return Err(EnvironmentError::DuplicateFunction {
                    name: name.to_string(),
                    first: existing.name.location,
                    second: decl.name.location
                });
            }

            functions.insert(name, Function {
                name: &decl.name,
                parameters: &decl.parameters,
                body: &decl.body,
                location: decl.location,
            });
        }

        Ok(Self { functions })
    }

    pub fn resolve(&self, name: &str, location: SrcSpan) -> Result<Function<'p>, EnvironmentError> {
        self.functions.get(name)
            .copied()
            .ok_or_else(|| EnvironmentError::UndeclaredFunction {
                name: name.to_string(),
                location
            })
    }
}
