pub mod bank;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exam;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod semantics;
pub mod symbols;
pub mod token;
pub mod utils;

pub use lexer::lex;
pub use parser::{Parser, parse_tokens};
pub use pipeline::check_document;
pub use semantics::{SemanticAnalyzer, analyze_tokens};
pub use symbols::SymbolTable;
