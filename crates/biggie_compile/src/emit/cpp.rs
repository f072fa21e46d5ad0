//! C++ backend.
//!
//! Follows the C backend's walk with the dialect differences: the
//! `biggie.cpp` runtime header, plain `struct N { ... };` definitions,
//! `Array<T>` for array types (no trailing bracket pairs), and `nullptr`.

use std::fmt::Write;

use biggie_base::Interner;
use biggie_language::ast::*;

use super::EmitSink;

pub fn emit(file: &SourceFile, interner: &Interner) -> String {
    let mut sink = EmitSink::new();
    sink.append("#include <biggie.cpp>\n\n");
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
            let _ = writeln!(
                sink,
                "while ({}) {{",
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
                    let _ = writeln!(sink, "return {};", expr_text(expr, interner));
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
            let _ = writeln!(sink, "{};", expr_text(&stmt.expression, interner));
        }
    }
}

fn emit_function(func: &FuncDecl, sink: &mut EmitSink, interner: &Interner) {
    let _ = write!(
        sink,
        "{} {}(",
        type_text(&func.return_type, interner),
        interner.resolve(func.name.name)
    );
    for arg in &func.args {
        let _ = write!(
            sink,
            "{} {}, ",
            type_text(&arg.ty, interner),
            interner.resolve(arg.name.name)
        );
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
    let _ = writeln!(sink, "struct {} {{", interner.resolve(decl.name.name));
    for member in &decl.members {
        let _ = writeln!(
            sink,
            "\t{} {};",
            type_text(&member.ty, interner),
            interner.resolve(member.name.name)
        );
    }
    sink.append("};\n\n");
}

fn emit_enum(decl: &EnumDecl, sink: &mut EmitSink, interner: &Interner) {
    let _ = writeln!(sink, "enum {} {{", interner.resolve(decl.name.name));
    for member in &decl.members {
        let _ = writeln!(sink, "\t{},", interner.resolve(member.name.name));
    }
    sink.append("};\n\n");
}

fn emit_var(decl: &VarDecl, sink: &mut EmitSink, interner: &Interner) {
    let _ = write!(
        sink,
        "{} {}",
        type_text(&decl.ty, interner),
        interner.resolve(decl.name.name)
    );
    if let Some(init) = &decl.init {
        let _ = write!(sink, " = {}", expr_text(init, interner));
    }
    sink.append(";\n");
}

fn emit_if(if_stmt: &IfStmt, sink: &mut EmitSink, interner: &Interner) {
    let _ = writeln!(sink, "if ({}) {{", expr_text(&if_stmt.condition, interner));
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

/// Full C++ spelling of a type. Arrays wrap in `Array<...>`, pointers
/// postfix a `*`.
fn type_text(ty: &TypeNode, interner: &Interner) -> String {
    match ty {
        TypeNode::Reference(reference) => interner.resolve(reference.name.name).to_string(),
        TypeNode::Pointer(pointer) => format!("{}*", type_text(&pointer.pointee, interner)),
        TypeNode::Array(array) => format!("Array<{}>", type_text(&array.element, interner)),
    }
}

fn expr_text(expr: &Expr, interner: &Interner) -> String {
    match expr {
        Expr::Number(number) => interner.resolve(number.text).to_string(),
        Expr::String(string) => format!("\"{}\"", interner.resolve(string.value)),
        Expr::Bool(boolean) => if boolean.value { "true" } else { "false" }.to_string(),
        Expr::Null(_) => "nullptr".to_string(),
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
    fn uses_the_cpp_runtime_header() {
        let output = emit("func main(): int32 { return 0; }");
        assert!(output.starts_with("#include <biggie.cpp>"));
    }

    #[test]
    fn structs_skip_the_typedef_tail() {
        let output = emit("struct Point { x: int32; }");
        assert!(output.contains("struct Point {\n\tint32 x;\n};"));
        assert!(!output.contains("typedef"));
    }

    #[test]
    fn arrays_use_the_array_template() {
        let output = emit("var grid: [][]int32;");
        assert!(output.contains("Array<Array<int32>> grid;"));
    }

    #[test]
    fn null_is_nullptr() {
        let output = emit("func f(p: *int32): int32 { if (p == null) { return 0; } return 1; }");
        assert!(output.contains("p == nullptr"));
    }
}
