//! WebAssembly text backend.
//!
//! Emits a single `(module ...)`. The module head (the `env.println`
//! import, the exported linear memory, and the `(data ...)` directives for
//! interned string literals) is only known once every function body has
//! been walked, so it is injected afterwards through `EmitSink::prepend`.
//!
//! Strings live as offset/length pairs. Literals intern into linear memory
//! at monotonically increasing byte offsets (each literal's offset is the
//! sum of the lengths of the literals before it) and evaluate to a pair of
//! `i32.const`s. `string`-typed parameters and variables split into
//! `$name__offset`/`$name__length` locals, and an identifier reference to
//! one expands to the matching `local.get` pair, so string values keep
//! their two-slot shape through calls and assignments.
//!
//! Only a subset of Big lowers to Wat. Everything else emits a
//! `;; ERROR: Unexpected node <kind>` comment and the walk continues.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use biggie_base::{Interner, Name};
use biggie_language::ast::*;

use super::EmitSink;

pub fn emit(file: &SourceFile, interner: &Interner) -> String {
    let mut sink = EmitSink::new();
    let mut strings = StringPool::default();

    for stmt in &file.statements {
        match stmt {
            Stmt::Import(_) => {}
            Stmt::Func(func) => emit_function(func, &mut sink, interner, &mut strings),
            other => {
                let _ = writeln!(sink, "  ;; ERROR: Unexpected node {:?}", other.kind());
            }
        }
    }

    for (offset, text) in strings.entries.iter().rev() {
        sink.prepend(&format!("  (data (i32.const {}) \"{}\")\n", offset, text));
    }
    sink.prepend(
        "(module\n  (import \"env\" \"println\" (func $println (param i32 i32)))\n  (memory (export \"memory\") 1)\n",
    );
    sink.append(")\n");
    sink.finish()
}

/// String literals interned into linear memory, in first-use order.
#[derive(Default)]
struct StringPool {
    entries: Vec<(u32, String)>,
    by_name: HashMap<Name, (u32, u32)>,
    next_offset: u32,
}

impl StringPool {
    /// Returns the (offset, length) of a literal, interning it on first
    /// use. Offsets grow by the byte length of each preceding literal.
    fn intern(&mut self, value: Name, interner: &Interner) -> (u32, u32) {
        if let Some(&entry) = self.by_name.get(&value) {
            return entry;
        }
        let text = interner.resolve(value);
        let offset = self.next_offset;
        let length = text.len() as u32;
        self.next_offset += length;
        self.entries.push((offset, text.to_string()));
        self.by_name.insert(value, (offset, length));
        (offset, length)
    }
}

fn is_string_type(ty: &TypeNode, interner: &Interner) -> bool {
    matches!(ty, TypeNode::Reference(reference)
        if reference.qualifier.is_none() && interner.resolve(reference.name.name) == "string")
}

fn is_void_type(ty: &TypeNode, interner: &Interner) -> bool {
    matches!(ty, TypeNode::Reference(reference)
        if reference.qualifier.is_none() && interner.resolve(reference.name.name) == "void")
}

fn emit_function(
    func: &FuncDecl,
    sink: &mut EmitSink,
    interner: &Interner,
    strings: &mut StringPool,
) {
    let name = interner.resolve(func.name.name);
    let _ = write!(sink, "  (func ${} (export \"{}\")", name, name);

    // Names whose values are offset/length pairs rather than single i32
    // locals; expression emission consults this to pick the right shape.
    let mut string_locals: HashSet<Name> = HashSet::new();

    for arg in &func.args {
        let arg_name = interner.resolve(arg.name.name);
        if is_string_type(&arg.ty, interner) {
            string_locals.insert(arg.name.name);
            let _ = write!(
                sink,
                " (param ${}__offset i32) (param ${}__length i32)",
                arg_name, arg_name
            );
        } else {
            let _ = write!(sink, " (param ${} i32)", arg_name);
        }
    }
    if !is_void_type(&func.return_type, interner) {
        sink.append(" (result i32)");
    }
    sink.append("\n");

    for stmt in &func.body.statements {
        emit_statement(stmt, sink, interner, strings, &mut string_locals);
    }
    sink.append("  )\n");
}

fn emit_statement(
    stmt: &Stmt,
    sink: &mut EmitSink,
    interner: &Interner,
    strings: &mut StringPool,
    string_locals: &mut HashSet<Name>,
) {
    match stmt {
        Stmt::Var(decl) if is_string_type(&decl.ty, interner) => {
            string_locals.insert(decl.name.name);
            let name = interner.resolve(decl.name.name);
            let _ = writeln!(sink, "    (local ${}__offset i32)", name);
            let _ = writeln!(sink, "    (local ${}__length i32)", name);
            match &decl.init {
                None => {}
                Some(init) => match string_pair(init, interner, strings, string_locals) {
                    Some((offset, length)) => {
                        let _ = writeln!(sink, "    (local.set ${}__offset {})", name, offset);
                        let _ = writeln!(sink, "    (local.set ${}__length {})", name, length);
                    }
                    None => {
                        let _ = writeln!(
                            sink,
                            "    ;; ERROR: Unexpected node {:?}",
                            init.kind()
                        );
                    }
                },
            }
        }
        Stmt::Var(decl) => {
            let name = interner.resolve(decl.name.name);
            let _ = writeln!(sink, "    (local ${} i32)", name);
            if let Some(init) = &decl.init {
                let _ = writeln!(
                    sink,
                    "    (local.set ${} {})",
                    name,
                    expr_text(init, interner, strings, string_locals)
                );
            }
        }
        Stmt::Return(ret) => match &ret.expression {
            Some(expr) => {
                let _ = writeln!(
                    sink,
                    "    (return {})",
                    expr_text(expr, interner, strings, string_locals)
                );
            }
            None => sink.append("    (return)\n"),
        },
        Stmt::Expr(stmt) => {
            let _ = writeln!(
                sink,
                "    {}",
                expr_text(&stmt.expression, interner, strings, string_locals)
            );
        }
        other => {
            let _ = writeln!(sink, "    ;; ERROR: Unexpected node {:?}", other.kind());
        }
    }
}

/// The offset and length instruction texts of a string-valued expression:
/// an interned literal or a reference to a split string local. Anything
/// else has no pair shape.
fn string_pair(
    expr: &Expr,
    interner: &Interner,
    strings: &mut StringPool,
    string_locals: &HashSet<Name>,
) -> Option<(String, String)> {
    match expr {
        Expr::String(string) => {
            let (offset, length) = strings.intern(string.value, interner);
            Some((
                format!("(i32.const {})", offset),
                format!("(i32.const {})", length),
            ))
        }
        Expr::Identifier(ident) if string_locals.contains(&ident.name) => {
            let name = interner.resolve(ident.name);
            Some((
                format!("(local.get ${}__offset)", name),
                format!("(local.get ${}__length)", name),
            ))
        }
        Expr::Parenthesized(paren) => string_pair(&paren.inner, interner, strings, string_locals),
        _ => None,
    }
}

fn binary_instruction(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Additive(AdditiveOperator::Plus) => "i32.add",
        BinaryOperator::Additive(AdditiveOperator::Minus) => "i32.sub",
        BinaryOperator::Multiplicative(MultiplicativeOperator::Star) => "i32.mul",
        BinaryOperator::Multiplicative(MultiplicativeOperator::Slash) => "i32.div_s",
        BinaryOperator::Equality(EqualityOperator::EqualsEquals) => "i32.eq",
        BinaryOperator::Equality(EqualityOperator::BangEquals) => "i32.ne",
        BinaryOperator::Comparison(ComparisonOperator::Less) => "i32.lt_s",
        BinaryOperator::Comparison(ComparisonOperator::LessEquals) => "i32.le_s",
        BinaryOperator::Comparison(ComparisonOperator::Greater) => "i32.gt_s",
        BinaryOperator::Comparison(ComparisonOperator::GreaterEquals) => "i32.ge_s",
        BinaryOperator::Logical(LogicalOperator::AmpersandAmpersand) => "i32.and",
        BinaryOperator::Logical(LogicalOperator::BarBar) => "i32.or",
    }
}

fn expr_text(
    expr: &Expr,
    interner: &Interner,
    strings: &mut StringPool,
    string_locals: &HashSet<Name>,
) -> String {
    match expr {
        Expr::Number(number) if !number.is_float => {
            format!("(i32.const {})", interner.resolve(number.text))
        }
        Expr::String(string) => {
            let (offset, length) = strings.intern(string.value, interner);
            format!("(i32.const {}) (i32.const {})", offset, length)
        }
        Expr::Bool(boolean) => format!("(i32.const {})", u8::from(boolean.value)),
        Expr::Null(_) => "(i32.const 0)".to_string(),
        Expr::Identifier(ident) if string_locals.contains(&ident.name) => {
            let name = interner.resolve(ident.name);
            format!(
                "(local.get ${}__offset) (local.get ${}__length)",
                name, name
            )
        }
        Expr::Identifier(ident) => format!("(local.get ${})", interner.resolve(ident.name)),
        Expr::Parenthesized(paren) => expr_text(&paren.inner, interner, strings, string_locals),
        Expr::Unary(unary) => match unary.op {
            UnaryOperator::Minus => format!(
                "(i32.sub (i32.const 0) {})",
                expr_text(&unary.operand, interner, strings, string_locals)
            ),
            UnaryOperator::Bang => format!(
                "(i32.eqz {})",
                expr_text(&unary.operand, interner, strings, string_locals)
            ),
            UnaryOperator::Ampersand | UnaryOperator::Star => {
                format!("(; ERROR: Unexpected node {:?} ;)", expr.kind())
            }
        },
        Expr::Binary(binary) => format!(
            "({} {} {})",
            binary_instruction(binary.op),
            expr_text(&binary.left, interner, strings, string_locals),
            expr_text(&binary.right, interner, strings, string_locals)
        ),
        Expr::Assignment(assign) if string_locals.contains(&assign.target.name) => {
            let target = interner.resolve(assign.target.name);
            match (assign.op, string_pair(&assign.value, interner, strings, string_locals)) {
                (AssignmentOperator::Equals, Some((offset, length))) => format!(
                    "(local.set ${}__offset {}) (local.set ${}__length {})",
                    target, offset, target, length
                ),
                _ => format!("(; ERROR: Unexpected node {:?} ;)", expr.kind()),
            }
        }
        Expr::Assignment(assign) => {
            let target = interner.resolve(assign.target.name);
            let value = expr_text(&assign.value, interner, strings, string_locals);
            let combined = match assign.op {
                AssignmentOperator::Equals => value,
                AssignmentOperator::PlusEquals => {
                    format!("(i32.add (local.get ${}) {})", target, value)
                }
                AssignmentOperator::MinusEquals => {
                    format!("(i32.sub (local.get ${}) {})", target, value)
                }
                AssignmentOperator::StarEquals => {
                    format!("(i32.mul (local.get ${}) {})", target, value)
                }
                AssignmentOperator::SlashEquals => {
                    format!("(i32.div_s (local.get ${}) {})", target, value)
                }
            };
            format!("(local.set ${} {})", target, combined)
        }
        Expr::Call(call) => {
            let callee = match call.callee.as_ref() {
                Expr::Identifier(ident) => interner.resolve(ident.name).to_string(),
                other => {
                    return format!("(; ERROR: Unexpected node {:?} ;)", other.kind());
                }
            };
            let mut text = format!("(call ${}", callee);
            for arg in &call.args {
                text.push(' ');
                text.push_str(&expr_text(arg, interner, strings, string_locals));
            }
            text.push(')');
            text
        }
        other => format!("(; ERROR: Unexpected node {:?} ;)", other.kind()),
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
    fn module_head_precedes_data_precedes_functions() {
        let output = emit("func greet(): int32 { println(\"hi\"); return 0; }");
        let import_at = output
            .find("(import \"env\" \"println\" (func $println (param i32 i32)))")
            .expect("import missing");
        let data_at = output
            .find("(data (i32.const 0) \"hi\")")
            .expect("data missing");
        let call_at = output
            .find("(call $println (i32.const 0) (i32.const 2))")
            .expect("call missing");
        let return_at = output.find("(return (i32.const 0))").expect("return missing");
        assert!(output.starts_with("(module\n"));
        assert!(import_at < data_at);
        assert!(data_at < call_at);
        assert!(call_at < return_at);
    }

    #[test]
    fn memory_is_exported() {
        let output = emit("func main(): int32 { return 0; }");
        assert!(output.contains("(memory (export \"memory\") 1)"));
    }

    #[test]
    fn functions_are_exported_by_name() {
        let output = emit("func main(): int32 { return 0; }");
        assert!(output.contains("(func $main (export \"main\") (result i32)"));
    }

    #[test]
    fn string_offsets_accumulate_lengths() {
        let output = emit(
            "func f(): int32 { println(\"first\"); println(\"second!\"); println(\"first\"); return 0; }",
        );
        assert!(output.contains("(data (i32.const 0) \"first\")"));
        assert!(output.contains("(data (i32.const 5) \"second!\")"));
        // The repeated literal reuses its first offset.
        assert_eq!(output.matches("(data").count(), 2);
        assert_eq!(
            output.matches("(call $println (i32.const 0) (i32.const 5))").count(),
            2
        );
    }

    #[test]
    fn string_parameters_split_in_two() {
        let output = emit("func show(message: string): void { println(message); return; }");
        assert!(output.contains("(param $message__offset i32) (param $message__length i32)"));
        // The reference site keeps the pair shape, matching $println's
        // (param i32 i32) signature.
        assert!(output
            .contains("(call $println (local.get $message__offset) (local.get $message__length))"));
        assert!(!output.contains("(local.get $message)"));
        assert!(!output.contains("(result"));
    }

    #[test]
    fn string_variables_split_and_initialize_in_pairs() {
        let output = emit("func f(): int32 { var s: string = \"hi\"; println(s); return 0; }");
        assert!(output.contains("(local $s__offset i32)"));
        assert!(output.contains("(local $s__length i32)"));
        assert!(output.contains("(local.set $s__offset (i32.const 0))"));
        assert!(output.contains("(local.set $s__length (i32.const 2))"));
        assert!(output.contains("(call $println (local.get $s__offset) (local.get $s__length))"));
    }

    #[test]
    fn string_assignment_copies_both_halves() {
        let output = emit(
            "func f(a: string): void { var b: string; b = a; println(b); return; }",
        );
        assert!(output.contains("(local.set $b__offset (local.get $a__offset))"));
        assert!(output.contains("(local.set $b__length (local.get $a__length))"));
    }

    #[test]
    fn locals_emit_declaration_then_set() {
        let output = emit("func f(): int32 { var x: int32 = 1; return x; }");
        assert!(output.contains("(local $x i32)\n    (local.set $x (i32.const 1))"));
        assert!(output.contains("(return (local.get $x))"));
    }

    #[test]
    fn unsupported_constructs_become_error_comments() {
        let output = emit("func f(): int32 { while (1) { } return 0; }");
        assert!(output.contains(";; ERROR: Unexpected node WhileStatement"));
    }

    #[test]
    fn top_level_vars_become_error_comments() {
        let output = emit("var x: int32 = 1;");
        assert!(output.contains(";; ERROR: Unexpected node VariableDeclaration"));
    }
}
