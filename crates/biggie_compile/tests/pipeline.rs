//! End-to-end pipeline scenarios across all four targets.

use std::path::Path;

use biggie_base::Interner;
use biggie_compile::{compile_file, Target};
use biggie_language::program::MapLoader;

fn compile(source: &str, target: Target) -> String {
    let mut loader = MapLoader::new();
    loader.insert("main.big", source);
    let mut interner = Interner::new();
    compile_file(Path::new("main.big"), target, &mut loader, &mut interner)
        .expect("compile failed")
}

#[test]
fn c_minimal_program() {
    let output = compile("func main(): int32 { return 0; }", Target::C);
    assert!(output.starts_with("#include <biggie.c>"));
    assert!(output.contains("int32 main() {\n\treturn 0;\n}\n\n"));
}

#[test]
fn wat_greeting_orders_header_data_body() {
    let output = compile(
        "func greet(): int32 { println(\"hi\"); return 0; }",
        Target::Wat,
    );
    let import_at = output.find("(import \"env\" \"println\"").unwrap();
    let data_at = output.find("(data (i32.const 0) \"hi\")").unwrap();
    let call_at = output
        .find("(call $println (i32.const 0) (i32.const 2))")
        .unwrap();
    let return_at = output.find("(return (i32.const 0))").unwrap();
    assert!(import_at < data_at && data_at < call_at && call_at < return_at);
}

#[test]
fn defer_lowering_shapes_every_target() {
    let source = "func main(): int32 { var x: int32 = 1; defer cleanup(x); return x; }\nfunc cleanup(x: int32): void { println(\"done\"); return; }";
    for target in [Target::C, Target::Cpp, Target::Js, Target::Wat] {
        let output = compile(source, target);
        assert!(
            !output.contains("defer"),
            "defer survived lowering for {:?}: {}",
            target,
            output
        );
    }

    let c = compile(source, Target::C);
    let cleanup_at = c.find("cleanup(x);").expect("cleanup call");
    let return_at = c.find("return x;").expect("return");
    assert!(cleanup_at < return_at);
}

#[test]
fn every_target_is_deterministic() {
    let source = "struct P { x: int32; }\nenum Color { Red, Green }\nfunc main(): int32 { var p: P = { x: 1 }; println(\"hello\"); return p.x; }";
    for target in [Target::C, Target::Cpp, Target::Js, Target::Wat] {
        assert_eq!(compile(source, target), compile(source, target), "{:?}", target);
    }
}

#[test]
fn imports_flow_through_every_target() {
    let mut loader = MapLoader::new();
    loader.insert(
        "main.big",
        "import util \"./util.big\"\nfunc main(): int32 { return util.zero(); }",
    );
    loader.insert("util.big", "export func zero(): int32 { return 0; }");

    for target in [Target::C, Target::Cpp, Target::Js, Target::Wat] {
        let mut interner = Interner::new();
        compile_file(Path::new("main.big"), target, &mut loader, &mut interner)
            .unwrap_or_else(|e| panic!("{:?}: {}", target, e));
    }
}
