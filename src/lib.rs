pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod token;

pub use compiler::{Compilation, Compiler};
