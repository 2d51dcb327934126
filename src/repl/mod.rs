//! The line-oriented interface: tokenizer, `$expr$` evaluator, prompts,
//! completion, and the read-dispatch loop.

pub mod completer;
pub mod expr;
pub mod lexer;
pub mod prompt;
pub mod session;

pub use expr::Evaluator;
pub use lexer::tokenize;
