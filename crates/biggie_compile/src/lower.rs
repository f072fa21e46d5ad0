//! Defer lowering.
//!
//! Rewrites every `defer` into an ordinary statement so the emitters can
//! treat all blocks uniformly. Per statement block: collect the defers in
//! declaration order, remove them, and append their bodies in *reverse*
//! order. A trailing `return` stays the block's last statement; the
//! deferred bodies are spliced in just before it. Nested blocks (including
//! the bodies of the defers themselves) are processed recursively.
//!
//! After lowering, no `DeferStatement` remains anywhere in the program.

use biggie_language::ast::{Block, SourceFile, Stmt};
use biggie_language::program::Program;

/// Lowers every file in the program.
pub fn lower_program(program: &mut Program) {
    for file in program.source_files.values_mut() {
        lower_source_file(file);
    }
}

/// Lowers every function body in one file.
pub fn lower_source_file(file: &mut SourceFile) {
    for stmt in &mut file.statements {
        lower_nested(stmt);
    }
}

/// Lowers one block and, recursively, every block nested inside it.
pub fn lower_block(block: &mut Block) {
    let statements = std::mem::take(&mut block.statements);
    let mut kept = Vec::with_capacity(statements.len());
    let mut deferred = Vec::new();

    for mut stmt in statements {
        lower_nested(&mut stmt);
        match stmt {
            Stmt::Defer(defer) => deferred.push(*defer.statement),
            other => kept.push(other),
        }
    }

    let insert_at = match kept.last() {
        Some(Stmt::Return(_)) => kept.len() - 1,
        _ => kept.len(),
    };
    let tail = kept.split_off(insert_at);
    kept.extend(deferred.into_iter().rev());
    kept.extend(tail);

    block.statements = kept;
}

/// Descends into the blocks hanging off one statement.
fn lower_nested(stmt: &mut Stmt) {
    match stmt {
        Stmt::Block(block) => lower_block(block),
        Stmt::If(if_stmt) => {
            lower_block(&mut if_stmt.then_block);
            if let Some(else_branch) = &mut if_stmt.else_branch {
                lower_nested(else_branch);
            }
        }
        Stmt::While(while_stmt) => lower_block(&mut while_stmt.body),
        Stmt::Defer(defer) => lower_nested(&mut defer.statement),
        Stmt::Func(func) => lower_block(&mut func.body),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biggie_base::Interner;
    use biggie_language::ast::SyntaxKind;
    use biggie_language::parse_statement;

    fn lower_body(source: &str) -> (Vec<Stmt>, Interner) {
        let mut interner = Interner::new();
        let stmt = parse_statement(source, &mut interner).expect("parse failed");
        match stmt {
            Stmt::Block(mut block) => {
                lower_block(&mut block);
                (block.statements, interner)
            }
            other => panic!("expected block, got {:?}", other.kind()),
        }
    }

    fn kinds(statements: &[Stmt]) -> Vec<SyntaxKind> {
        statements.iter().map(Stmt::kind).collect()
    }

    /// Callee name of an expression statement wrapping a simple call.
    fn called(stmt: &Stmt, interner: &Interner) -> String {
        use biggie_language::ast::Expr;
        match stmt {
            Stmt::Expr(expr_stmt) => match &expr_stmt.expression {
                Expr::Call(call) => match call.callee.as_ref() {
                    Expr::Identifier(ident) => interner.resolve(ident.name).to_string(),
                    other => panic!("expected identifier callee, got {:?}", other.kind()),
                },
                other => panic!("expected call, got {:?}", other.kind()),
            },
            other => panic!("expected expression statement, got {:?}", other.kind()),
        }
    }

    #[test]
    fn defer_splices_before_trailing_return() {
        let (lowered, _) = lower_body("{ var x: int32 = 1; defer cleanup(x); return x; }");
        assert_eq!(
            kinds(&lowered),
            vec![
                SyntaxKind::VariableDeclaration,
                SyntaxKind::ExpressionStatement,
                SyntaxKind::ReturnStatement,
            ]
        );
    }

    #[test]
    fn defers_run_in_reverse_declaration_order() {
        let (lowered, interner) = lower_body("{ defer a(); defer b(); defer c(); return 0; }");
        assert_eq!(called(&lowered[0], &interner), "c");
        assert_eq!(called(&lowered[1], &interner), "b");
        assert_eq!(called(&lowered[2], &interner), "a");
        assert_eq!(lowered[3].kind(), SyntaxKind::ReturnStatement);
    }

    #[test]
    fn non_defer_statements_keep_their_order() {
        let (lowered, interner) = lower_body("{ a(); defer d(); b(); c(); }");
        assert_eq!(called(&lowered[0], &interner), "a");
        assert_eq!(called(&lowered[1], &interner), "b");
        assert_eq!(called(&lowered[2], &interner), "c");
        // d's body lands last because there is no trailing return.
        assert_eq!(called(&lowered[3], &interner), "d");
    }

    #[test]
    fn no_defer_statement_survives_lowering() {
        let (lowered, _) = lower_body(
            "{ defer a(); if (x) { defer b(); c(); } while (y) { defer d(); } { defer e(); } }",
        );
        fn assert_no_defer(stmt: &Stmt) {
            assert_ne!(stmt.kind(), SyntaxKind::DeferStatement);
            match stmt {
                Stmt::Block(block) => block.statements.iter().for_each(assert_no_defer),
                Stmt::If(if_stmt) => {
                    if_stmt.then_block.statements.iter().for_each(assert_no_defer);
                    if let Some(else_branch) = &if_stmt.else_branch {
                        assert_no_defer(else_branch);
                    }
                }
                Stmt::While(while_stmt) => {
                    while_stmt.body.statements.iter().for_each(assert_no_defer)
                }
                _ => {}
            }
        }
        lowered.iter().for_each(assert_no_defer);
    }

    #[test]
    fn deferred_block_bodies_are_lowered_too() {
        let (lowered, interner) = lower_body("{ defer { defer inner(); outer(); } done(); }");
        // done(); then the deferred block, itself lowered: outer(); inner();
        assert_eq!(lowered.len(), 2);
        assert_eq!(called(&lowered[0], &interner), "done");
        match &lowered[1] {
            Stmt::Block(block) => {
                assert_eq!(called(&block.statements[0], &interner), "outer");
                assert_eq!(called(&block.statements[1], &interner), "inner");
            }
            other => panic!("expected block, got {:?}", other.kind()),
        }
    }

    #[test]
    fn return_without_defers_is_untouched() {
        let (lowered, _) = lower_body("{ return 0; }");
        assert_eq!(kinds(&lowered), vec![SyntaxKind::ReturnStatement]);
    }
}
