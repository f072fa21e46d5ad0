//! Statement and declaration nodes.

use std::path::PathBuf;

use biggie_base::Span;

use super::{Expr, Ident, NodeId, SyntaxKind, TypeNode};

/// `import [alias] "path"`.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub id: NodeId,
    pub span: Span,
    /// Optional module alias; without one the module is named after the
    /// imported file's stem.
    pub alias: Option<Ident>,
    /// Path text exactly as written in the source.
    pub path: String,
    pub path_span: Span,
    /// Canonical path of the imported file, filled in during program
    /// loading. Always present in a fully parsed `Program`.
    pub resolved: Option<PathBuf>,
    pub is_exported: bool,
}

/// `var name: Type [= init];`
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub ty: TypeNode,
    pub init: Option<Expr>,
    pub is_exported: bool,
    /// Hint honored by the JavaScript emitter (`const` vs `let`). Big has
    /// no const syntax, so the parser leaves this false.
    pub is_const: bool,
}

#[derive(Debug, Clone)]
pub struct FuncArg {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub ty: TypeNode,
}

/// `func name(args): Type { ... }`
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub args: Vec<FuncArg>,
    pub return_type: TypeNode,
    pub body: Block,
    pub is_exported: bool,
}

#[derive(Debug, Clone)]
pub struct StructMember {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub ty: TypeNode,
}

/// `struct Name { members }`
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub members: Vec<StructMember>,
    pub is_exported: bool,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
}

/// `enum Name { A, B }`
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub members: Vec<EnumMember>,
    pub is_exported: bool,
}

/// `{ ... }`; introduces a lexical scope.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expr,
    pub then_block: Block,
    /// `else` branch: a block or another `if`.
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub span: Span,
    pub expression: Option<Expr>,
}

/// `defer stmt;`, removed by lowering. Emitters only ever see one if a
/// caller skipped the lowering pass.
#[derive(Debug, Clone)]
pub struct DeferStmt {
    pub id: NodeId,
    pub span: Span,
    pub statement: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub id: NodeId,
    pub span: Span,
    pub expression: Expr,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Import(ImportDecl),
    Var(VarDecl),
    Func(FuncDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Defer(DeferStmt),
    Expr(ExprStmt),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Import(s) => s.id,
            Stmt::Var(s) => s.id,
            Stmt::Func(s) => s.id,
            Stmt::Struct(s) => s.id,
            Stmt::Enum(s) => s.id,
            Stmt::Block(s) => s.id,
            Stmt::If(s) => s.id,
            Stmt::While(s) => s.id,
            Stmt::Return(s) => s.id,
            Stmt::Defer(s) => s.id,
            Stmt::Expr(s) => s.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Stmt::Import(s) => s.span,
            Stmt::Var(s) => s.span,
            Stmt::Func(s) => s.span,
            Stmt::Struct(s) => s.span,
            Stmt::Enum(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Defer(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            Stmt::Import(_) => SyntaxKind::ImportDeclaration,
            Stmt::Var(_) => SyntaxKind::VariableDeclaration,
            Stmt::Func(_) => SyntaxKind::FuncDeclaration,
            Stmt::Struct(_) => SyntaxKind::StructDeclaration,
            Stmt::Enum(_) => SyntaxKind::EnumDeclaration,
            Stmt::Block(_) => SyntaxKind::StatementBlock,
            Stmt::If(_) => SyntaxKind::IfStatement,
            Stmt::While(_) => SyntaxKind::WhileStatement,
            Stmt::Return(_) => SyntaxKind::ReturnStatement,
            Stmt::Defer(_) => SyntaxKind::DeferStatement,
            Stmt::Expr(_) => SyntaxKind::ExpressionStatement,
        }
    }
}
