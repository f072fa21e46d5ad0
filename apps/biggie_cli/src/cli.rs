//! Argument surface and driver dispatch.
//!
//! Arguments are parsed with [`clap`] in derive mode:
//!
//! ```text
//! biggie [--debug] [-o|--output OUTFILE] INFILE [INFILE...]
//! ```
//!
//! clap's failures are folded onto the compiler's three argument error
//! kinds: a missing `INFILE` is [`ArgsErrorKind::NoInputFiles`], an
//! unrecognized flag is [`ArgsErrorKind::UnknownOption`], and anything else
//! is [`ArgsErrorKind::Unknown`].
//!
//! The output target is chosen by the output file's extension (`.c`,
//! `.cpp`, `.js`, `.wat`); without `-o` the output is the entry file with a
//! `.c` extension. The output file is written only when every phase
//! succeeds.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use biggie_base::{diagnostic, Interner};
use biggie_compile::{bind_program, lower_program, BindError, FsModuleLoader, Target};
use biggie_language::program::{parse_program, LoadError};

/// Command-line arguments for the `biggie` binary.
#[derive(Parser, Debug, PartialEq)]
#[command(name = "biggie")]
#[command(about = "The Big compiler", long_about = None)]
#[command(version)]
pub struct Args {
    /// Print phase traces to stderr while compiling.
    #[arg(long)]
    pub debug: bool,

    /// Output file. The extension selects the target language
    /// (.c, .cpp, .js, .wat); the default is the entry file with `.c`.
    #[arg(short = 'o', long = "output", value_name = "OUTFILE")]
    pub output: Option<PathBuf>,

    /// Input files. The first is the entry point of the compilation.
    #[arg(value_name = "INFILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgsErrorKind {
    NoInputFiles,
    UnknownOption,
    Unknown,
}

#[derive(Debug)]
pub struct ArgsError {
    pub kind: ArgsErrorKind,
    pub message: String,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ArgsError {}

fn args_error(error: clap::Error) -> ArgsError {
    let kind = match error.kind() {
        ErrorKind::MissingRequiredArgument => ArgsErrorKind::NoInputFiles,
        ErrorKind::UnknownArgument => ArgsErrorKind::UnknownOption,
        _ => ArgsErrorKind::Unknown,
    };
    let message = match kind {
        ArgsErrorKind::NoInputFiles => "no input files".to_string(),
        ArgsErrorKind::UnknownOption => "unknown option".to_string(),
        ArgsErrorKind::Unknown => error.to_string(),
    };
    ArgsError { kind, message }
}

/// Parses an argument list (without the program name). This is the
/// testable surface behind [`run_cli`].
pub fn parse_args<I, T>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv = std::iter::once(OsString::from("biggie")).chain(args.into_iter().map(Into::into));
    Args::try_parse_from(argv).map_err(args_error)
}

/// Entry point: parses `std::env::args_os` and runs the driver.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::try_parse_from(env::args_os()) {
        Ok(args) => args,
        Err(error)
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = error.print();
            return Ok(());
        }
        Err(error) => return Err(Box::new(args_error(error))),
    };
    run(args)
}

/// Runs one compilation: parse, lower, bind, emit, write.
pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let entry = args.files[0].clone();
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| entry.with_extension("c"));
    let target = output_path
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(Target::from_extension)
        .unwrap_or(Target::C);

    if args.debug {
        eprintln!(
            "{} {} -> {} ({:?})",
            diagnostic::phase_label("compiling"),
            entry.display(),
            output_path.display(),
            target
        );
        for extra in &args.files[1..] {
            eprintln!(
                "{} extra input {} is not the entry point",
                diagnostic::note_label("note:"),
                extra.display()
            );
        }
    }

    let mut loader = FsModuleLoader;
    let mut interner = Interner::new();

    let mut program =
        parse_program(&entry, &mut loader, &mut interner).map_err(render_load_error)?;
    if args.debug {
        eprintln!(
            "{} {} source file(s)",
            diagnostic::phase_label("parsed"),
            program.source_files.len()
        );
        for path in program.source_files.keys() {
            eprintln!("  {}", path.display());
        }
    }

    lower_program(&mut program);

    let bindings = bind_program(&program, &mut interner).map_err(render_bind_error)?;
    if args.debug {
        eprintln!(
            "{} {} symbol(s) across {} file(s)",
            diagnostic::phase_label("bound"),
            bindings.symbols.len(),
            bindings.file_locals.len()
        );
    }

    let output = target.emit(program.entry(), &interner);
    fs::write(&output_path, &output)?;
    if args.debug {
        eprintln!(
            "{} {} bytes to {}",
            diagnostic::phase_label("wrote"),
            output.len(),
            output_path.display()
        );
    }

    Ok(())
}

/// Renders a load failure for stderr. Parse errors carry their source text,
/// so the caret rendering needs no second file read.
fn render_load_error(error: LoadError) -> Box<dyn std::error::Error> {
    match error {
        LoadError::Parse {
            file,
            source,
            error,
        } => format!("{}:\n{}", file.display(), error.display_with_source(&source)).into(),
        other => other.to_string().into(),
    }
}

/// Renders a bind failure, re-reading the offending file for the caret
/// rendering and falling back to the plain message when that fails.
fn render_bind_error(error: BindError) -> Box<dyn std::error::Error> {
    match fs::read_to_string(&error.file) {
        Ok(source) => format!(
            "{}:\n{}",
            error.file.display(),
            error.display_with_source(&source)
        )
        .into(),
        Err(_) => error.to_string().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_output_flag() {
        let args = parse_args(["--output", "./output.c", "./input.big"]).unwrap();
        assert!(!args.debug);
        assert_eq!(args.output, Some(PathBuf::from("./output.c")));
        assert_eq!(args.files, vec![PathBuf::from("./input.big")]);
    }

    #[test]
    fn short_output_flag() {
        let args = parse_args(["-o", "./out/output.c", "./src/input.big"]).unwrap();
        assert!(!args.debug);
        assert_eq!(args.output, Some(PathBuf::from("./out/output.c")));
        assert_eq!(args.files, vec![PathBuf::from("./src/input.big")]);
    }

    #[test]
    fn debug_with_short_output() {
        let args = parse_args(["--debug", "-o", "./out/output.c", "./src/input.big"]).unwrap();
        assert!(args.debug);
        assert_eq!(args.output, Some(PathBuf::from("./out/output.c")));
        assert_eq!(args.files, vec![PathBuf::from("./src/input.big")]);
    }

    #[test]
    fn empty_arguments_are_no_input_files() {
        let error = parse_args(Vec::<OsString>::new()).unwrap_err();
        assert_eq!(error.kind, ArgsErrorKind::NoInputFiles);
    }

    #[test]
    fn unrecognized_flag_is_unknown_option() {
        let error = parse_args(["--foo", "bar", "input.big"]).unwrap_err();
        assert_eq!(error.kind, ArgsErrorKind::UnknownOption);
    }

    #[test]
    fn output_without_inputs_is_no_input_files() {
        let error = parse_args(["-o", "output.c"]).unwrap_err();
        assert_eq!(error.kind, ArgsErrorKind::NoInputFiles);
    }

    #[test]
    fn multiple_input_files_are_accepted() {
        let args = parse_args(["a.big", "b.big"]).unwrap();
        assert_eq!(args.files.len(), 2);
    }
}
