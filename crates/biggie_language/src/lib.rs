//! # biggie-language
//!
//! The Big language front end: scanner, syntax tree, parser, and program
//! loading.
//!
//! ## Pipeline position
//!
//! ```text
//! source text ──lexer──▶ tokens ──parser──▶ SourceFile ─┐
//!                                                       │ per imported file
//! ModuleLoader ◀──────────── parse_program worklist ◀───┘
//! ```
//!
//! [`parse_program`] produces a [`Program`]: the entry file plus every
//! transitively imported file, each already parsed. Lowering, binding, and
//! emission live in the `biggie-compile` crate.
//!
//! ## Quick start
//!
//! ```
//! use std::path::Path;
//! use biggie_language::{parse_program, Interner, MapLoader};
//!
//! let mut loader = MapLoader::new();
//! loader.insert("main.big", "func main(): int32 { return 0; }");
//!
//! let mut interner = Interner::new();
//! let program = parse_program(Path::new("main.big"), &mut loader, &mut interner).unwrap();
//! assert_eq!(program.source_files.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod token;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::Lexer;
pub use parser::{
    parse_source, parse_statement, DeclarationParsing, ExpressionParsing, ParseResult, Parser,
    StatementParsing, TypeParsing,
};
pub use program::{parse_program, LoadError, MapLoader, ModuleLoader, Program};
pub use token::{Token, TokenType};

// Re-export the base atoms so downstream crates need only one import path.
pub use biggie_base::{Interner, Name, Span};
