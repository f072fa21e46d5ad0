//! JavaScript backend.
//!
//! The preamble and postamble come from the `jsPreamble.js` /
//! `jsPostamble.js` assets. Big types survive as comments on signatures and
//! declarations, `==`/`!=` strengthen to `===`/`!==`, and variable
//! declarations pick `const` or `let` from the node's `is_const` hint.
//! Enums become frozen objects with ordinal values; structs become empty
//! classes (struct literals construct plain objects).

use std::fmt::Write;

use biggie_base::Interner;
use biggie_language::ast::*;

use super::js_runtime::{JS_POSTAMBLE, JS_PREAMBLE};
use super::EmitSink;

pub fn emit(file: &SourceFile, interner: &Interner) -> String {
    let mut sink = EmitSink::new();
    sink.append(JS_PREAMBLE);
    sink.append("\n");
    for stmt in &file.statements {
        emit_statement(stmt, &mut sink, interner);
    }
    sink.append(JS_POSTAMBLE);
    sink.finish()
}

fn emit_statement(stmt: &Stmt, sink: &mut EmitSink, interner: &Interner) {
    match stmt {
        Stmt::Import(_) => {}
        Stmt::Func(func) => emit_function(func, sink, interner),
        Stmt::Struct(decl) => {
            let _ = write!(sink, "class {} {{}}\n\n", interner.resolve(decl.name.name));
        }
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
    let _ = write!(sink, "function {}(", interner.resolve(func.name.name));
    for arg in &func.args {
        let _ = write!(
            sink,
            "{} /* {} */, ",
            interner.resolve(arg.name.name),
            type_text(&arg.ty, interner)
        );
    }
    if !func.args.is_empty() {
        sink.remove(2);
    }
    let _ = write!(sink, ") /* {} */ {{\n", type_text(&func.return_type, interner));

    sink.indent_level += 1;
    for stmt in &func.body.statements {
        emit_statement(stmt, sink, interner);
    }
    sink.indent_level -= 1;
    sink.append("}\n\n");
}

fn emit_enum(decl: &EnumDecl, sink: &mut EmitSink, interner: &Interner) {
    let _ = write!(
        sink,
        "const {} = Object.freeze({{ ",
        interner.resolve(decl.name.name)
    );
    for (ordinal, member) in decl.members.iter().enumerate() {
        let _ = write!(
            sink,
            "{}: {}, ",
            interner.resolve(member.name.name),
            ordinal
        );
    }
    if !decl.members.is_empty() {
        sink.remove(2);
        sink.append(" ");
    }
    sink.append("});\n\n");
}

fn emit_var(decl: &VarDecl, sink: &mut EmitSink, interner: &Interner) {
    let keyword = if decl.is_const { "const" } else { "let" };
    let _ = write!(
        sink,
        "{} {} /* {} */",
        keyword,
        interner.resolve(decl.name.name),
        type_text(&decl.ty, interner)
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
            let _ = write!(sink, " // ERROR: Unexpected node {:?}", other.kind());
        }
        None => {}
    }
}

/// Big spelling of a type, for signature comments.
fn type_text(ty: &TypeNode, interner: &Interner) -> String {
    match ty {
        TypeNode::Reference(reference) => match &reference.qualifier {
            Some(qualifier) => format!(
                "{}.{}",
                interner.resolve(qualifier.name),
                interner.resolve(reference.name.name)
            ),
            None => interner.resolve(reference.name.name).to_string(),
        },
        TypeNode::Pointer(pointer) => format!("*{}", type_text(&pointer.pointee, interner)),
        TypeNode::Array(array) => format!("[]{}", type_text(&array.element, interner)),
    }
}

fn binary_op_text(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Equality(EqualityOperator::EqualsEquals) => "===",
        BinaryOperator::Equality(EqualityOperator::BangEquals) => "!==",
        other => other.text(),
    }
}

fn expr_text(expr: &Expr, interner: &Interner) -> String {
    match expr {
        Expr::Number(number) => interner.resolve(number.text).to_string(),
        Expr::String(string) => format!("\"{}\"", interner.resolve(string.value)),
        Expr::Bool(boolean) => if boolean.value { "true" } else { "false" }.to_string(),
        Expr::Null(_) => "null".to_string(),
        Expr::Identifier(ident) => interner.resolve(ident.name).to_string(),
        Expr::Unary(unary) => {
            format!("{}{}", unary.op.text(), expr_text(&unary.operand, interner))
        }
        Expr::Binary(binary) => format!(
            "{} {} {}",
            expr_text(&binary.left, interner),
            binary_op_text(binary.op),
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
        Expr::PropertyAccess(access) => format!(
            "{}.{}",
            expr_text(&access.target, interner),
            interner.resolve(access.property.name)
        ),
        Expr::Array(array) => {
            let elements: Vec<String> = array
                .elements
                .iter()
                .map(|element| expr_text(element, interner))
                .collect();
            format!("[{}]", elements.join(", "))
        }
        Expr::Struct(lit) => {
            let elements: Vec<String> = lit
                .elements
                .iter()
                .map(|element| {
                    format!(
                        "{}: {}",
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
    fn output_is_wrapped_in_the_runtime() {
        let output = emit("func main(): int32 { return 0; }");
        assert!(output.starts_with("// Runtime preamble"));
        assert!(output.contains("function println"));
        assert!(output.trim_end().ends_with("}"));
        assert!(output.contains("typeof main"));
    }

    #[test]
    fn equality_operators_strengthen() {
        let output = emit("func f(a: int32, b: int32): bool { return a == b || a != 0; }");
        assert!(output.contains("a === b || a !== 0"));
    }

    #[test]
    fn signatures_carry_type_comments() {
        let output = emit("func add(a: int32, b: int32): int32 { return a + b; }");
        assert!(output.contains("function add(a /* int32 */, b /* int32 */) /* int32 */ {"));
    }

    #[test]
    fn variables_default_to_let() {
        let output = emit("func f(): int32 { var x: int32 = 1; return x; }");
        assert!(output.contains("let x /* int32 */ = 1;"));
    }

    #[test]
    fn enums_become_frozen_objects() {
        let output = emit("enum Color { Red, Green, Blue }");
        assert!(output.contains("const Color = Object.freeze({ Red: 0, Green: 1, Blue: 2 });"));
    }
}
