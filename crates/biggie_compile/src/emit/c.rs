//! C backend.
//!
//! Targets the `biggie.c` runtime header, which supplies the sized integer
//! typedefs, `string`, and `println`. Structs become
//! `typedef struct N { ... } N;`, array-typed declarations carry one
//! trailing `[]` pair per nesting level, pointer types postfix a `*`.
//! Residual `defer` statements (possible only when lowering was skipped)
//! are printed literally as diagnostics.

use std::fmt::Write;

use biggie_base::Interner;
use biggie_language::ast::*;

use super::EmitSink;

pub fn emit(file: &SourceFile, interner: &Interner) -> String {
    let mut sink = EmitSink::new();
    sink.append("#include <biggie.c>\n\n");
    for stmt in &file.statements {
        emit_statement(stmt, &mut sink, interner);
    }
    sink.finish()
}

fn emit_statement(stmt: &Stmt, sink: &mut EmitSink, interner: &Interner) {
    match stmt {
        Stmt::Import(_) => {}
        Stmt::Func(func) => emit_function(func, sink, interner),
        Stmt::Struct(decl) => emit_struct(decl, sink, interner),
        Stmt::Enum(decl) => emit_enum(decl, sink, interner),
        Stmt::Var(decl) => {
            sink.indent();
            emit_var(decl, sink, interner);
        }
        Stmt::If(if_stmt) => {
            sink.indent();
            emit_if(if_stmt, sink, interner);
            sink.append("\n");
        }
        Stmt::While(while_stmt) => {
            sink.indent();
            let _ = write!(
                sink,
                "while ({}) {{\n",
                expr_text(&while_stmt.condition, interner)
            );
            sink.indent_level += 1;
            for inner in &while_stmt.body.statements {
                emit_statement(inner, sink, interner);
            }
            sink.indent_level -= 1;
            sink.indent();
            sink.append("}\n");
        }
        Stmt::Return(ret) => {
            sink.indent();
            match &ret.expression {
                Some(expr) => {
                    let _ = write!(sink, "return {};\n", expr_text(expr, interner));
                }
                None => sink.append("return;\n"),
            }
        }
        Stmt::Block(block) => {
            sink.indent();
            sink.append("{\n");
            sink.indent_level += 1;
            for inner in &block.statements {
                emit_statement(inner, sink, interner);
            }
            sink.indent_level -= 1;
            sink.indent();
            sink.append("}\n");
        }
        Stmt::Defer(defer) => {
            sink.indent();
            sink.append("defer ");
            let saved = sink.indent_level;
            sink.indent_level = 0;
            emit_statement(&defer.statement, sink, interner);
            sink.indent_level = saved;
        }
        Stmt::Expr(stmt) => {
            sink.indent();
            let _ = write!(sink, "{};\n", expr_text(&stmt.expression, interner));
        }
    }
}

fn emit_function(func: &FuncDecl, sink: &mut EmitSink, interner: &Interner) {
    let (ret_base, ret_suffix) = type_parts(&func.return_type, interner);
    let _ = write!(
        sink,
        "{}{} {}(",
        ret_base,
        ret_suffix,
        interner.resolve(func.name.name)
    );
    for arg in &func.args {
        let (base, suffix) = type_parts(&arg.ty, interner);
        let _ = write!(sink, "{} {}{}, ", base, interner.resolve(arg.name.name), suffix);
    }
    if !func.args.is_empty() {
        sink.remove(2);
    }
    sink.append(") {\n");

    sink.indent_level += 1;
    for stmt in &func.body.statements {
        emit_statement(stmt, sink, interner);
    }
    sink.indent_level -= 1;
    sink.append("}\n\n");
}

fn emit_struct(decl: &StructDecl, sink: &mut EmitSink, interner: &Interner) {
    let name = interner.resolve(decl.name.name);
    let _ = write!(sink, "typedef struct {} {{\n", name);
    for member in &decl.members {
        let (base, suffix) = type_parts(&member.ty, interner);
        let _ = write!(
            sink,
            "\t{} {}{};\n",
            base,
            interner.resolve(member.name.name),
            suffix
        );
    }
    let _ = write!(sink, "}} {};\n\n", name);
}

fn emit_enum(decl: &EnumDecl, sink: &mut EmitSink, interner: &Interner) {
    let name = interner.resolve(decl.name.name);
    let _ = write!(sink, "typedef enum {} {{\n", name);
    for member in &decl.members {
        let _ = write!(sink, "\t{},\n", interner.resolve(member.name.name));
    }
    let _ = write!(sink, "}} {};\n\n", name);
}

fn emit_var(decl: &VarDecl, sink: &mut EmitSink, interner: &Interner) {
    let (base, suffix) = type_parts(&decl.ty, interner);
    let _ = write!(sink, "{} {}{}", base, interner.resolve(decl.name.name), suffix);
    if let Some(init) = &decl.init {
        let _ = write!(sink, " = {}", expr_text(init, interner));
    }
    sink.append(";\n");
}

/// Writes `if`/`else if`/`else` chains. The caller supplies the leading
/// indentation and trailing newline.
fn emit_if(if_stmt: &IfStmt, sink: &mut EmitSink, interner: &Interner) {
    let _ = write!(sink, "if ({}) {{\n", expr_text(&if_stmt.condition, interner));
    sink.indent_level += 1;
    for inner in &if_stmt.then_block.statements {
        emit_statement(inner, sink, interner);
    }
    sink.indent_level -= 1;
    sink.indent();
    sink.append("}");

    match if_stmt.else_branch.as_deref() {
        Some(Stmt::If(else_if)) => {
            sink.append(" else ");
            emit_if(else_if, sink, interner);
        }
        Some(Stmt::Block(block)) => {
            sink.append(" else {\n");
            sink.indent_level += 1;
            for inner in &block.statements {
                emit_statement(inner, sink, interner);
            }
            sink.indent_level -= 1;
            sink.indent();
            sink.append("}");
        }
        Some(other) => {
            let _ = write!(sink, " /* ERROR: Unexpected node {:?} */", other.kind());
        }
        None => {}
    }
}

/// Splits a type into its C spelling: the base text (pointers postfix `*`)
/// and the trailing `[]` pairs contributed by array nesting.
fn type_parts(ty: &TypeNode, interner: &Interner) -> (String, String) {
    match ty {
        TypeNode::Reference(reference) => {
            (interner.resolve(reference.name.name).to_string(), String::new())
        }
        TypeNode::Pointer(pointer) => {
            let (base, suffix) = type_parts(&pointer.pointee, interner);
            (format!("{}*", base), suffix)
        }
        TypeNode::Array(array) => {
            let (base, suffix) = type_parts(&array.element, interner);
            (base, format!("{}[]", suffix))
        }
    }
}

fn expr_text(expr: &Expr, interner: &Interner) -> String {
    match expr {
        Expr::Number(number) => interner.resolve(number.text).to_string(),
        Expr::String(string) => format!("\"{}\"", interner.resolve(string.value)),
        Expr::Bool(boolean) => if boolean.value { "true" } else { "false" }.to_string(),
        Expr::Null(_) => "NULL".to_string(),
        Expr::Identifier(ident) => interner.resolve(ident.name).to_string(),
        Expr::Unary(unary) => {
            format!("{}{}", unary.op.text(), expr_text(&unary.operand, interner))
        }
        Expr::Binary(binary) => format!(
            "{} {} {}",
            expr_text(&binary.left, interner),
            binary.op.text(),
            expr_text(&binary.right, interner)
        ),
        Expr::Assignment(assign) => format!(
            "{} {} {}",
            interner.resolve(assign.target.name),
            assign.op.text(),
            expr_text(&assign.value, interner)
        ),
        Expr::Parenthesized(paren) => format!("({})", expr_text(&paren.inner, interner)),
        Expr::Call(call) => {
            let args: Vec<String> = call
                .args
                .iter()
                .map(|arg| expr_text(arg, interner))
                .collect();
            format!(
                "{}({})",
                expr_text(&call.callee, interner),
                args.join(", ")
            )
        }
        Expr::ElementAccess(access) => format!(
            "{}[{}]",
            expr_text(&access.target, interner),
            expr_text(&access.index, interner)
        ),
        Expr::PropertyAccess(access) => {
            let property = interner.resolve(access.property.name);
            // The runtime exposes array length as a call.
            if property == "length" {
                format!("{}.length()", expr_text(&access.target, interner))
            } else {
                format!("{}.{}", expr_text(&access.target, interner), property)
            }
        }
        Expr::Array(array) => {
            let elements: Vec<String> = array
                .elements
                .iter()
                .map(|element| expr_text(element, interner))
                .collect();
            format!("{{{}}}", elements.join(", "))
        }
        Expr::Struct(lit) => {
            let elements: Vec<String> = lit
                .elements
                .iter()
                .map(|element| {
                    format!(
                        ".{} = {}",
                        interner.resolve(element.name.name),
                        expr_text(&element.value, interner)
                    )
                })
                .collect();
            format!("{{ {} }}", elements.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use biggie_base::Interner;
    use biggie_language::parse_source;

    fn emit(source: &str) -> String {
        let mut interner = Interner::new();
        let file = parse_source(source, PathBuf::from("test.big"), &mut interner)
            .expect("parse failed");
        super::emit(&file, &interner)
    }

    #[test]
    fn minimal_program_matches_the_runtime_contract() {
        let output = emit("func main(): int32 { return 0; }");
        assert!(output.starts_with("#include <biggie.c>"));
        assert!(output.contains("int32 main() {\n\treturn 0;\n}\n\n"));
    }

    #[test]
    fn struct_becomes_typedef() {
        let output = emit("struct Point { x: int32; y: int32; }");
        assert!(output.contains("typedef struct Point {\n\tint32 x;\n\tint32 y;\n} Point;"));
    }

    #[test]
    fn enum_becomes_typedef_enum() {
        let output = emit("enum Color { Red, Green }");
        assert!(output.contains("typedef enum Color {\n\tRed,\n\tGreen,\n} Color;"));
    }

    #[test]
    fn array_variables_carry_bracket_pairs() {
        let output = emit("var xs: []int32;\nvar grid: [][]int32;");
        assert!(output.contains("int32 xs[];"));
        assert!(output.contains("int32 grid[][];"));
    }

    #[test]
    fn pointer_types_postfix_a_star() {
        let output = emit("var p: *int32;");
        assert!(output.contains("int32* p;"));
    }

    #[test]
    fn length_property_becomes_a_call() {
        let output = emit("func f(xs: []int32): int32 { return xs.length; }");
        assert!(output.contains("return xs.length();"));
    }

    #[test]
    fn if_else_chain_renders_inline() {
        let output =
            emit("func f(x: int32): int32 { if (x == 1) { return 1; } else { return 2; } }");
        assert!(output.contains("if (x == 1) {\n\t\treturn 1;\n\t} else {\n\t\treturn 2;\n\t}"));
    }

    #[test]
    fn imports_emit_nothing() {
        let output = emit("func main(): int32 { return 0; }");
        let with_import = {
            let mut interner = Interner::new();
            let file = biggie_language::parse_source(
                "import other \"./other.big\"\nfunc main(): int32 { return 0; }",
                PathBuf::from("test.big"),
                &mut interner,
            )
            .expect("parse failed");
            super::emit(&file, &interner)
        };
        assert_eq!(output, with_import);
    }

    #[test]
    fn output_is_deterministic() {
        let source = "struct P { x: int32; }\nfunc main(): int32 { var p: P = { x: 1 }; return p.x; }";
        assert_eq!(emit(source), emit(source));
    }
}
