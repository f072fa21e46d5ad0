//! # biggie-compile
//!
//! The Big compilation pipeline: defer lowering, symbol binding, and the
//! four code emitters.
//!
//! ## Stages
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Lowering | [`lower`] | `defer`-free AST |
//! | Binding | [`bind`] | [`bind::Bindings`] side tables |
//! | Emission | [`emit`] | C, C++, JavaScript, or Wat text |
//!
//! [`compile::compile_file`] chains them behind one call:
//!
//! ```
//! use std::path::Path;
//! use biggie_compile::{compile_file, Target};
//! use biggie_language::{Interner, MapLoader};
//!
//! let mut loader = MapLoader::new();
//! loader.insert("main.big", "func main(): int32 { return 0; }");
//!
//! let mut interner = Interner::new();
//! let c = compile_file(Path::new("main.big"), Target::C, &mut loader, &mut interner).unwrap();
//! assert!(c.starts_with("#include <biggie.c>"));
//! ```

pub mod bind;
pub mod compile;
pub mod emit;
pub mod lower;
pub mod symbol;

pub use bind::{bind_program, BindError, BindErrorKind, Bindings};
pub use compile::{compile_file, CompileError, FsModuleLoader};
pub use emit::{EmitSink, Target};
pub use lower::{lower_program, lower_source_file};
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolTable, Symbols};
