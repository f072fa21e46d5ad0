//! Program loading: the entry file and its transitive imports.
//!
//! [`parse_program`] drives a worklist of canonical paths. Each path is
//! recorded as seen *before* its file is parsed, so diamond imports load
//! once and import cycles terminate instead of recursing forever. The
//! parser itself never touches the filesystem; all reads go through the
//! [`ModuleLoader`] trait, which lets tests run against an in-memory file
//! map and keeps this crate I/O-free.
//!
//! Relative import paths resolve against the directory of the importing
//! file; absolute paths are used as-is. Canonical paths key
//! [`Program::source_files`].

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use biggie_base::Interner;

use crate::ast::{SourceFile, Stmt};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// A fully loaded compilation: the entry file plus every transitively
/// imported file, keyed by canonical path.
///
/// `BTreeMap` keeps iteration deterministic, which the binder and emitters
/// rely on.
#[derive(Debug)]
pub struct Program {
    pub entry_file_name: PathBuf,
    pub source_files: BTreeMap<PathBuf, SourceFile>,
}

impl Program {
    /// The entry file's AST.
    pub fn entry(&self) -> &SourceFile {
        &self.source_files[&self.entry_file_name]
    }
}

/// Source of file contents for program loading.
pub trait ModuleLoader {
    fn read_file(&mut self, path: &Path) -> io::Result<String>;

    /// Canonicalizes a path for use as a `source_files` key. The default is
    /// a lexical cleanup (resolving `.` and `..`); filesystem-backed
    /// loaders may substitute `std::fs::canonicalize`.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(normalize_path(path))
    }
}

/// In-memory loader for tests: a map from path to source text.
#[derive(Default)]
pub struct MapLoader {
    files: BTreeMap<PathBuf, String>,
}

impl MapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> &mut Self {
        self.files.insert(normalize_path(&path.into()), source.into());
        self
    }
}

impl ModuleLoader for MapLoader {
    fn read_file(&mut self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display()))
        })
    }
}

/// Failure while loading a program: unreadable file or parse error.
///
/// Parse failures keep the file's source text so the driver can render the
/// offending line without re-reading the file.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        error: io::Error,
    },
    Parse {
        file: PathBuf,
        source: String,
        error: ParseError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, error } => {
                write!(f, "cannot read {}: {}", path.display(), error)
            }
            LoadError::Parse { file, error, .. } => {
                write!(f, "{}: {}", file.display(), error)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Loads, scans, and parses the entry file and every file it transitively
/// imports. Each import's `resolved` path is filled in along the way, so
/// every `ImportDecl` in the result maps to a key in `source_files`.
pub fn parse_program(
    entry: &Path,
    loader: &mut dyn ModuleLoader,
    interner: &mut Interner,
) -> Result<Program, LoadError> {
    let entry_key = loader.canonicalize(entry).map_err(|error| LoadError::Io {
        path: entry.to_path_buf(),
        error,
    })?;

    let mut source_files = BTreeMap::new();
    let mut queue = VecDeque::new();
    let mut seen = HashSet::new();

    seen.insert(entry_key.clone());
    queue.push_back(entry_key.clone());

    while let Some(path) = queue.pop_front() {
        let source = loader.read_file(&path).map_err(|error| LoadError::Io {
            path: path.clone(),
            error,
        })?;

        let tokens = Lexer::new(&source, interner).tokenize();
        let mut file = Parser::new(tokens, path.clone(), interner)
            .parse_source_file()
            .map_err(|error| LoadError::Parse {
                file: path.clone(),
                source: source.clone(),
                error,
            })?;

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        for stmt in &mut file.statements {
            if let Stmt::Import(import) = stmt {
                let target = Path::new(&import.path);
                let target = if target.is_absolute() {
                    target.to_path_buf()
                } else {
                    dir.join(target)
                };
                let resolved =
                    loader
                        .canonicalize(&target)
                        .map_err(|error| LoadError::Io {
                            path: target.clone(),
                            error,
                        })?;
                import.resolved = Some(resolved.clone());
                if seen.insert(resolved.clone()) {
                    queue.push_back(resolved);
                }
            }
        }

        source_files.insert(path, file);
    }

    Ok(Program {
        entry_file_name: entry_key,
        source_files,
    })
}

/// Lexically normalizes a path: resolves `.` and `..` components without
/// consulting the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dot_and_dotdot() {
        assert_eq!(
            normalize_path(Path::new("./src/../lib/math.big")),
            PathBuf::from("lib/math.big")
        );
        assert_eq!(
            normalize_path(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn single_file_program() {
        let mut loader = MapLoader::new();
        loader.insert("main.big", "func main(): int32 { return 0; }");
        let mut interner = Interner::new();
        let program = parse_program(Path::new("main.big"), &mut loader, &mut interner).unwrap();
        assert_eq!(program.source_files.len(), 1);
        assert_eq!(program.entry().statements.len(), 1);
    }

    #[test]
    fn imports_resolve_relative_to_importing_file() {
        let mut loader = MapLoader::new();
        loader.insert(
            "src/main.big",
            "import math \"./lib/math.big\"\nfunc main(): int32 { return 0; }",
        );
        loader.insert("src/lib/math.big", "export var pi: float64 = 3.14;");
        let mut interner = Interner::new();
        let program =
            parse_program(Path::new("src/main.big"), &mut loader, &mut interner).unwrap();
        assert_eq!(program.source_files.len(), 2);
        assert!(program
            .source_files
            .contains_key(Path::new("src/lib/math.big")));

        match &program.entry().statements[0] {
            Stmt::Import(import) => {
                assert_eq!(
                    import.resolved.as_deref(),
                    Some(Path::new("src/lib/math.big"))
                );
            }
            other => panic!("expected import, got {:?}", other.kind()),
        }
    }

    #[test]
    fn diamond_imports_load_once() {
        let mut loader = MapLoader::new();
        loader.insert(
            "main.big",
            "import a \"./a.big\"\nimport b \"./b.big\"\nfunc main(): int32 { return 0; }",
        );
        loader.insert("a.big", "import shared \"./shared.big\"");
        loader.insert("b.big", "import shared \"./shared.big\"");
        loader.insert("shared.big", "export var value: int32 = 1;");
        let mut interner = Interner::new();
        let program = parse_program(Path::new("main.big"), &mut loader, &mut interner).unwrap();
        assert_eq!(program.source_files.len(), 4);
    }

    #[test]
    fn import_cycles_terminate() {
        let mut loader = MapLoader::new();
        loader.insert("a.big", "import b \"./b.big\"\nexport var x: int32 = 1;");
        loader.insert("b.big", "import a \"./a.big\"\nexport var y: int32 = 2;");
        let mut interner = Interner::new();
        let program = parse_program(Path::new("a.big"), &mut loader, &mut interner).unwrap();
        assert_eq!(program.source_files.len(), 2);
    }

    #[test]
    fn missing_import_is_an_io_error() {
        let mut loader = MapLoader::new();
        loader.insert("main.big", "import gone \"./gone.big\"");
        let mut interner = Interner::new();
        let result = parse_program(Path::new("main.big"), &mut loader, &mut interner);
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn parse_errors_carry_file_and_source() {
        let mut loader = MapLoader::new();
        loader.insert("main.big", "func main(): int32 { return 0 }");
        let mut interner = Interner::new();
        match parse_program(Path::new("main.big"), &mut loader, &mut interner) {
            Err(LoadError::Parse { file, source, .. }) => {
                assert_eq!(file, PathBuf::from("main.big"));
                assert!(source.contains("func main"));
            }
            other => panic!("expected parse error, got {:?}", other.is_ok()),
        }
    }
}
