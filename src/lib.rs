// Zy Language Interpreter Library
//
// Lexer, parser and tree-walking evaluator for Zy, a small dynamically typed,
// expression-oriented functional language with curried functions and
// rebindable operators.

// Public modules
pub mod ast;
pub mod builtins;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{BinaryOp, Expr, UnaryOp};
pub use config::Config;
pub use environment::Environment;
pub use error::{ErrorKind, Position, Severity, ZyError};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_source, Parser};
pub use value::{Callable, Value};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
