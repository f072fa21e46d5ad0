//! Driver tests against a real filesystem.

use std::fs;
use std::path::PathBuf;

use biggie_cli::{run, Args};

fn args(output: Option<PathBuf>, files: Vec<PathBuf>) -> Args {
    Args {
        debug: false,
        output,
        files,
    }
}

#[test]
fn compiles_an_entry_file_with_imports() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib.big");
    let main = dir.path().join("main.big");
    let out = dir.path().join("out.c");

    fs::write(&lib, "export func zero(): int32 { return 0; }").unwrap();
    fs::write(
        &main,
        "import lib \"./lib.big\"\nfunc main(): int32 { return lib.zero(); }",
    )
    .unwrap();

    run(args(Some(out.clone()), vec![main])).expect("run failed");

    let output = fs::read_to_string(&out).unwrap();
    assert!(output.starts_with("#include <biggie.c>"));
    assert!(output.contains("int32 main() {"));
}

#[test]
fn default_output_is_the_entry_with_c_extension() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.big");
    fs::write(&main, "func main(): int32 { return 0; }").unwrap();

    run(args(None, vec![main.clone()])).expect("run failed");

    assert!(main.with_extension("c").exists());
}

#[test]
fn output_extension_selects_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.big");
    let out = dir.path().join("main.wat");
    fs::write(&main, "func main(): int32 { return 0; }").unwrap();

    run(args(Some(out.clone()), vec![main])).expect("run failed");

    let output = fs::read_to_string(&out).unwrap();
    assert!(output.starts_with("(module"));
}

#[test]
fn no_output_file_is_written_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.big");
    let out = dir.path().join("out.c");
    fs::write(&main, "func main(): int32 { return missing; }").unwrap();

    let result = run(args(Some(out.clone()), vec![main]));
    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn parse_errors_name_the_offending_file() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.big");
    fs::write(&main, "func main(): int32 { return 0 }").unwrap();

    let error = run(args(None, vec![main])).unwrap_err();
    assert!(error.to_string().contains("main.big"));
}
