//! Crate root: wires together the compilation pipeline.
//!
//! An arithmetic expression flows through three pure stages:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` builds a binary expression tree honouring precedence.
//! - `codegen` lowers the tree into x86-64 stack-machine assembly.
//!
//! `error` holds the diagnostics shared by the stages and `dump` renders the
//! intermediate results for debugging.

pub mod codegen;
pub mod dump;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use codegen::Syntax;
pub use error::{CompileError, CompileResult};
pub use parser::{BinaryOp, Node};

/// Tokenize and parse a source string into its expression tree.
pub fn parse_expression(expr: &str) -> CompileResult<Node> {
  let tokens = tokenizer::tokenize(expr)?;
  parser::parse(tokens, expr)
}

/// Compile a source string into Intel-syntax assembly.
pub fn generate_assembly(expr: &str) -> CompileResult<String> {
  generate_assembly_with(expr, Syntax::Intel)
}

/// Compile a source string into assembly of the requested dialect.
pub fn generate_assembly_with(expr: &str, syntax: Syntax) -> CompileResult<String> {
  let tree = parse_expression(expr)?;
  Ok(codegen::generate(&tree, syntax))
}
