//! Lexer, parser, scope resolver and tree-walking evaluator for a small
//! C-like language, with a three-address code listing.

pub mod lexer;
pub mod parser;
pub mod environment;
pub mod analyzer;
pub mod eval;
pub mod codegen;
pub mod utils;
