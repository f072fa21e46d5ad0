//! The compilation pipeline.
//!
//! ```text
//! entry path ─parse_program─▶ Program ─lower─▶ Program ─bind─▶ Bindings
//!                                                   │
//!                                            Target::emit ─▶ output text
//! ```
//!
//! [`compile_file`] runs the whole chain. The driver calls the phases
//! individually when it wants to trace them; the result is identical.
//!
//! The first error of any phase aborts the run and propagates unchanged as
//! a [`CompileError`]. Emission itself cannot fail; unsupported constructs
//! degrade to diagnostic comments in the output.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use biggie_base::Interner;
use biggie_language::program::{parse_program, LoadError, ModuleLoader};

use crate::bind::{bind_program, BindError, Bindings};
use crate::emit::Target;
use crate::lower::lower_program;

/// Loader backed by the real filesystem. Canonicalization goes through
/// `std::fs::canonicalize`, so symlinked and relative spellings of the same
/// file share one `source_files` entry.
#[derive(Debug, Default)]
pub struct FsModuleLoader;

impl ModuleLoader for FsModuleLoader {
    fn read_file(&mut self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

#[derive(Debug)]
pub enum CompileError {
    Load(LoadError),
    Bind(BindError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Load(error) => error.fmt(f),
            CompileError::Bind(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Load(error) => Some(error),
            CompileError::Bind(error) => Some(error),
        }
    }
}

impl From<LoadError> for CompileError {
    fn from(error: LoadError) -> Self {
        CompileError::Load(error)
    }
}

impl From<BindError> for CompileError {
    fn from(error: BindError) -> Self {
        CompileError::Bind(error)
    }
}

/// Compiles one entry file to `target` text: parse (with transitive import
/// loading), lower, bind, emit.
pub fn compile_file(
    entry: &Path,
    target: Target,
    loader: &mut dyn ModuleLoader,
    interner: &mut Interner,
) -> Result<String, CompileError> {
    let mut program = parse_program(entry, loader, interner)?;
    lower_program(&mut program);
    let _bindings: Bindings = bind_program(&program, interner)?;
    Ok(target.emit(program.entry(), interner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use biggie_language::program::MapLoader;

    #[test]
    fn compile_file_runs_the_whole_chain() {
        let mut loader = MapLoader::new();
        loader.insert(
            "main.big",
            "func main(): int32 { defer println(\"bye\"); return 0; }",
        );
        let mut interner = Interner::new();
        let output = compile_file(
            Path::new("main.big"),
            Target::C,
            &mut loader,
            &mut interner,
        )
        .expect("compile failed");
        // Lowering ran: the deferred call precedes the return, no defer
        // keyword survives.
        let call_at = output.find("println(\"bye\");").expect("call missing");
        let return_at = output.find("return 0;").expect("return missing");
        assert!(call_at < return_at);
        assert!(!output.contains("defer"));
    }

    #[test]
    fn bind_errors_stop_compilation() {
        let mut loader = MapLoader::new();
        loader.insert("main.big", "func main(): int32 { return missing; }");
        let mut interner = Interner::new();
        let result = compile_file(
            Path::new("main.big"),
            Target::C,
            &mut loader,
            &mut interner,
        );
        assert!(matches!(result, Err(CompileError::Bind(_))));
    }

    #[test]
    fn fs_loader_compiles_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main.big");
        fs::write(&main, "func main(): int32 { return 0; }").unwrap();

        let mut loader = FsModuleLoader;
        let mut interner = Interner::new();
        let output = compile_file(&main, Target::C, &mut loader, &mut interner)
            .expect("compile failed");
        assert!(output.contains("int32 main()"));
    }

    #[test]
    fn cross_module_references_compile() {
        let mut loader = MapLoader::new();
        loader.insert(
            "main.big",
            "import math \"./math.big\"\nfunc main(): int32 { return math.zero(); }",
        );
        loader.insert("math.big", "export func zero(): int32 { return 0; }");
        let mut interner = Interner::new();
        let output = compile_file(
            Path::new("main.big"),
            Target::C,
            &mut loader,
            &mut interner,
        )
        .expect("compile failed");
        assert!(output.contains("return math.zero();"));
    }
}
