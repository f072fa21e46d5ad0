//! Name resolution.
//!
//! The binder walks a parsed [`Program`] and attaches a symbol to every
//! declaration and reference, recording the attachments in side tables
//! keyed by `NodeId`; the tree itself is never mutated. It runs in three
//! passes:
//!
//! 1. **Declare** — every file's top-level declarations become symbols in
//!    the file's `locals` table (and in `exports` when marked `export`).
//!    Struct and enum declarations get member tables. Because this pass
//!    finishes before any body is visited, forward references between
//!    top-level declarations resolve naturally.
//! 2. **Link** — each import declaration becomes a `Module` symbol whose
//!    members are the imported file's exports (running after pass 1 means
//!    the exports exist even when the import graph has cycles). Then every
//!    top-level variable and struct member whose declared type names a
//!    struct or enum receives a copy of that type's member table, so field
//!    access on an instance resolves by the declared type name alone.
//! 3. **Bind bodies** — a top-down walk with an explicit scope stack.
//!    `SourceFile`, function, and statement-block nodes push scopes;
//!    identifier references resolve by walking the stack outward. Function
//!    arguments and local variables pick up their declared type's member
//!    table the same way top-level variables did in pass 2. Property
//!    access binds left-first: the right-hand name is looked up in the left
//!    symbol's members when it has any (modules, enums, structs, and
//!    struct- or enum-typed variables) and left unbound otherwise;
//!    symbols of primitive, array, or function type have no members, which
//!    is where the emitters' `.length` convention lives.
//!
//! Two names bypass binding entirely: the ambient `println` function and
//! the primitive type family (`int8`..`int64`, `uint8`..`uint64`,
//! `float32`, `float64`, `bool`, `string`, `void`), which the target
//! runtimes provide.
//!
//! Binding is fail-fast: the first missing or duplicate symbol aborts.
//! `MissingSymbol` errors carry a did-you-mean suggestion computed from the
//! names actually in scope.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

use biggie_base::{diagnostic, suggest, Interner, Name, Span};
use biggie_language::ast::*;
use biggie_language::program::Program;

use crate::symbol::{Symbol, SymbolId, SymbolKind, SymbolTable, Symbols};

/// Names the binder passes through as ambient values.
const AMBIENT_FUNCTIONS: &[&str] = &["println"];

/// Primitive type names provided by every target runtime.
const AMBIENT_TYPES: &[&str] = &[
    "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64", "float32",
    "float64", "bool", "string", "void",
];

/// Binder output: the symbol arena plus every node-to-symbol attachment.
#[derive(Debug, Default)]
pub struct Bindings {
    pub symbols: Symbols,
    node_symbols: HashMap<NodeId, SymbolId>,
    pub file_locals: BTreeMap<PathBuf, SymbolTable>,
    pub file_exports: BTreeMap<PathBuf, SymbolTable>,
}

impl Bindings {
    /// The symbol attached to a declaration or reference node, if any.
    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(id)
    }

    /// Deterministic snapshot of every attachment, for idempotence checks.
    pub fn attachments(&self) -> BTreeMap<NodeId, SymbolId> {
        self.node_symbols.iter().map(|(&n, &s)| (n, s)).collect()
    }
}

#[derive(Debug)]
pub struct BindError {
    pub kind: BindErrorKind,
    pub span: Span,
    /// Canonical path of the file the error occurred in.
    pub file: PathBuf,
}

#[derive(Debug)]
pub enum BindErrorKind {
    MissingSymbol {
        name: String,
        suggestion: Option<String>,
    },
    DuplicateSymbol {
        name: String,
    },
    /// Internal invariant violation, e.g. an unresolved import slipping
    /// past the loader.
    Unexpected {
        message: String,
    },
}

impl BindError {
    pub fn message(&self) -> String {
        match &self.kind {
            BindErrorKind::MissingSymbol { name, .. } => {
                format!("cannot find '{}' in this scope", name)
            }
            BindErrorKind::DuplicateSymbol { name } => {
                format!("'{}' is declared more than once", name)
            }
            BindErrorKind::Unexpected { message } => message.clone(),
        }
    }

    /// Renders the error against the file's source text, with the
    /// offending line, a caret underline, and a suggestion when one exists.
    pub fn display_with_source(&self, source: &str) -> String {
        let suggestion = match &self.kind {
            BindErrorKind::MissingSymbol { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        };
        diagnostic::render(&self.message(), source, self.span, suggestion)
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}..{}",
            self.file.display(),
            self.message(),
            self.span.start,
            self.span.end
        )
    }
}

impl std::error::Error for BindError {}

pub type BindResult<T> = Result<T, BindError>;

/// Binds every file in `program`. See the module docs for the pass
/// structure.
pub fn bind_program(program: &Program, interner: &mut Interner) -> BindResult<Bindings> {
    let mut binder = Binder {
        program,
        interner,
        bindings: Bindings::default(),
        scopes: Vec::new(),
        current_file: PathBuf::new(),
    };
    binder.declare_files()?;
    binder.link_imports()?;
    binder.link_type_members();
    binder.bind_files()?;
    Ok(binder.bindings)
}

struct Binder<'p, 'int> {
    program: &'p Program,
    interner: &'int mut Interner,
    bindings: Bindings,
    /// Scope stack for the file currently being bound; innermost last.
    scopes: Vec<SymbolTable>,
    current_file: PathBuf,
}

impl<'p, 'int> Binder<'p, 'int> {
    // ── pass 1: declare ──────────────────────────────────────────────

    fn declare_files(&mut self) -> BindResult<()> {
        let program = self.program;
        for (path, file) in &program.source_files {
            self.current_file = path.clone();
            let mut locals = SymbolTable::new();
            let mut exports = SymbolTable::new();

            for stmt in &file.statements {
                match stmt {
                    Stmt::Var(decl) => {
                        let id = self.declare(
                            &mut locals,
                            &decl.name,
                            SymbolKind::Variable,
                            None,
                        )?;
                        if decl.is_exported {
                            let _ = exports.insert(decl.name.name, id);
                        }
                    }
                    Stmt::Func(decl) => {
                        let id = self.declare(
                            &mut locals,
                            &decl.name,
                            SymbolKind::Function,
                            None,
                        )?;
                        if decl.is_exported {
                            let _ = exports.insert(decl.name.name, id);
                        }
                    }
                    Stmt::Struct(decl) => {
                        let mut members = SymbolTable::new();
                        for member in &decl.members {
                            self.declare(
                                &mut members,
                                &member.name,
                                SymbolKind::StructMember,
                                None,
                            )?;
                        }
                        let id = self.declare(
                            &mut locals,
                            &decl.name,
                            SymbolKind::Struct,
                            Some(members),
                        )?;
                        if decl.is_exported {
                            let _ = exports.insert(decl.name.name, id);
                        }
                    }
                    Stmt::Enum(decl) => {
                        let mut members = SymbolTable::new();
                        for member in &decl.members {
                            self.declare(
                                &mut members,
                                &member.name,
                                SymbolKind::EnumMember,
                                None,
                            )?;
                        }
                        let id = self.declare(
                            &mut locals,
                            &decl.name,
                            SymbolKind::Enum,
                            Some(members),
                        )?;
                        if decl.is_exported {
                            let _ = exports.insert(decl.name.name, id);
                        }
                    }
                    Stmt::Import(_) => {}
                    other => {
                        return Err(self.unexpected(
                            format!("{:?} cannot appear at file level", other.kind()),
                            other.span(),
                        ))
                    }
                }
            }

            self.bindings.file_locals.insert(path.clone(), locals);
            self.bindings.file_exports.insert(path.clone(), exports);
        }
        Ok(())
    }

    /// Allocates a symbol for a declaration name, attaches it, and inserts
    /// it into `table`. Collisions become `DuplicateSymbol` errors.
    fn declare(
        &mut self,
        table: &mut SymbolTable,
        ident: &Ident,
        kind: SymbolKind,
        members: Option<SymbolTable>,
    ) -> BindResult<SymbolId> {
        let id = self.bindings.symbols.alloc(Symbol {
            name: ident.name,
            source_file: self.current_file.clone(),
            kind,
            members,
        });
        if table.insert(ident.name, id).is_err() {
            return Err(BindError {
                kind: BindErrorKind::DuplicateSymbol {
                    name: self.interner.resolve(ident.name).to_string(),
                },
                span: ident.span,
                file: self.current_file.clone(),
            });
        }
        self.bindings.node_symbols.insert(ident.id, id);
        Ok(id)
    }

    // ── pass 2: link imports ─────────────────────────────────────────

    fn link_imports(&mut self) -> BindResult<()> {
        let program = self.program;
        for (path, file) in &program.source_files {
            self.current_file = path.clone();
            for stmt in &file.statements {
                let Stmt::Import(import) = stmt else { continue };

                let resolved = import.resolved.as_ref().ok_or_else(|| BindError {
                    kind: BindErrorKind::Unexpected {
                        message: format!("import '{}' was never resolved", import.path),
                    },
                    span: import.span,
                    file: path.clone(),
                })?;

                let exports = self
                    .bindings
                    .file_exports
                    .get(resolved)
                    .cloned()
                    .ok_or_else(|| BindError {
                        kind: BindErrorKind::Unexpected {
                            message: format!(
                                "imported file {} is not part of the program",
                                resolved.display()
                            ),
                        },
                        span: import.span,
                        file: path.clone(),
                    })?;

                let (module_name, attach_to, name_span) = match &import.alias {
                    Some(alias) => (alias.name, alias.id, alias.span),
                    None => {
                        let stem = resolved
                            .file_stem()
                            .map(|s| s.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        (self.interner.intern(&stem), import.id, import.path_span)
                    }
                };

                let module_id = self.bindings.symbols.alloc(Symbol {
                    name: module_name,
                    source_file: resolved.clone(),
                    kind: SymbolKind::Module,
                    members: Some(exports),
                });

                let locals = self
                    .bindings
                    .file_locals
                    .get_mut(path)
                    .expect("pass 1 registered every file");
                if locals.insert(module_name, module_id).is_err() {
                    return Err(BindError {
                        kind: BindErrorKind::DuplicateSymbol {
                            name: self.interner.resolve(module_name).to_string(),
                        },
                        span: name_span,
                        file: path.clone(),
                    });
                }
                self.bindings.node_symbols.insert(attach_to, module_id);

                if import.is_exported {
                    let exports = self
                        .bindings
                        .file_exports
                        .get_mut(path)
                        .expect("pass 1 registered every file");
                    let _ = exports.insert(module_name, module_id);
                }
            }
        }
        Ok(())
    }

    /// Second half of pass 2: copies member tables onto every top-level
    /// variable and struct member whose declared type names a struct or
    /// enum. Runs after imports so qualified types resolve; unresolvable
    /// types are left alone here and reported by pass 3.
    fn link_type_members(&mut self) {
        let program = self.program;
        for (path, file) in &program.source_files {
            self.current_file = path.clone();
            self.scopes = vec![self.bindings.file_locals[path].clone()];

            for stmt in &file.statements {
                match stmt {
                    Stmt::Var(decl) => self.attach_type_members(&decl.name, &decl.ty),
                    Stmt::Struct(decl) => {
                        for member in &decl.members {
                            self.attach_type_members(&member.name, &member.ty);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn attach_type_members(&mut self, ident: &Ident, ty: &TypeNode) {
        let Some(members) = self.type_members(ty) else {
            return;
        };
        if let Some(id) = self.bindings.symbol_of(ident.id) {
            self.bindings.symbols.get_mut(id).members = Some(members);
        }
    }

    /// Member table of the struct or enum a declared type names, cloned for
    /// nominal field lookup on instances of that type. Pointer wrappers are
    /// peeled; arrays, primitives, and anything unresolvable yield `None`.
    fn type_members(&self, ty: &TypeNode) -> Option<SymbolTable> {
        match ty {
            TypeNode::Pointer(pointer) => self.type_members(&pointer.pointee),
            TypeNode::Array(_) => None,
            TypeNode::Reference(reference) => {
                let symbol_id = match &reference.qualifier {
                    None => self.lookup_scopes(reference.name.name)?,
                    Some(qualifier) => {
                        let module_id = self.lookup_scopes(qualifier.name)?;
                        self.bindings
                            .symbols
                            .get(module_id)
                            .members
                            .as_ref()?
                            .get(reference.name.name)?
                    }
                };
                let symbol = self.bindings.symbols.get(symbol_id);
                match symbol.kind {
                    SymbolKind::Struct | SymbolKind::Enum => symbol.members.clone(),
                    _ => None,
                }
            }
        }
    }

    /// Walks the scope stack outward for a name.
    fn lookup_scopes(&self, name: Name) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    // ── pass 3: bind bodies ──────────────────────────────────────────

    fn bind_files(&mut self) -> BindResult<()> {
        let program = self.program;
        for (path, file) in &program.source_files {
            self.current_file = path.clone();
            let file_scope = self.bindings.file_locals[path].clone();
            self.scopes = vec![file_scope];

            for stmt in &file.statements {
                self.bind_top_statement(stmt)?;
            }
        }
        Ok(())
    }

    fn bind_top_statement(&mut self, stmt: &Stmt) -> BindResult<()> {
        match stmt {
            Stmt::Import(_) | Stmt::Enum(_) => Ok(()),
            Stmt::Var(decl) => {
                self.bind_type(&decl.ty)?;
                if let Some(init) = &decl.init {
                    self.bind_expr(init)?;
                }
                Ok(())
            }
            Stmt::Struct(decl) => {
                for member in &decl.members {
                    self.bind_type(&member.ty)?;
                }
                Ok(())
            }
            Stmt::Func(decl) => {
                self.bind_type(&decl.return_type)?;
                self.scopes.push(SymbolTable::new());
                for arg in &decl.args {
                    self.bind_type(&arg.ty)?;
                    let members = self.type_members(&arg.ty);
                    let id = self.bindings.symbols.alloc(Symbol {
                        name: arg.name.name,
                        source_file: self.current_file.clone(),
                        kind: SymbolKind::Variable,
                        members,
                    });
                    let scope = self.scopes.last_mut().expect("function scope");
                    if scope.insert(arg.name.name, id).is_err() {
                        let name = self.interner.resolve(arg.name.name).to_string();
                        self.scopes.pop();
                        return Err(BindError {
                            kind: BindErrorKind::DuplicateSymbol { name },
                            span: arg.name.span,
                            file: self.current_file.clone(),
                        });
                    }
                    self.bindings.node_symbols.insert(arg.name.id, id);
                }
                let result = self.bind_block(&decl.body);
                self.scopes.pop();
                result
            }
            other => Err(self.unexpected(
                format!("{:?} cannot appear at file level", other.kind()),
                other.span(),
            )),
        }
    }

    fn bind_block(&mut self, block: &Block) -> BindResult<()> {
        self.scopes.push(SymbolTable::new());
        let result = block
            .statements
            .iter()
            .try_for_each(|stmt| self.bind_statement(stmt));
        self.scopes.pop();
        result
    }

    fn bind_statement(&mut self, stmt: &Stmt) -> BindResult<()> {
        match stmt {
            Stmt::Var(decl) => {
                self.bind_type(&decl.ty)?;
                // The initializer binds before the name is declared, so a
                // variable cannot reference itself.
                if let Some(init) = &decl.init {
                    self.bind_expr(init)?;
                }
                let members = self.type_members(&decl.ty);
                let id = self.bindings.symbols.alloc(Symbol {
                    name: decl.name.name,
                    source_file: self.current_file.clone(),
                    kind: SymbolKind::Variable,
                    members,
                });
                let scope = self.scopes.last_mut().expect("block scope");
                if scope.insert(decl.name.name, id).is_err() {
                    let name = self.interner.resolve(decl.name.name).to_string();
                    return Err(BindError {
                        kind: BindErrorKind::DuplicateSymbol { name },
                        span: decl.name.span,
                        file: self.current_file.clone(),
                    });
                }
                self.bindings.node_symbols.insert(decl.name.id, id);
                Ok(())
            }
            Stmt::If(if_stmt) => {
                self.bind_expr(&if_stmt.condition)?;
                self.bind_block(&if_stmt.then_block)?;
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.bind_statement(else_branch)?;
                }
                Ok(())
            }
            Stmt::While(while_stmt) => {
                self.bind_expr(&while_stmt.condition)?;
                self.bind_block(&while_stmt.body)
            }
            Stmt::Return(ret) => match &ret.expression {
                Some(expr) => self.bind_expr(expr),
                None => Ok(()),
            },
            Stmt::Block(block) => self.bind_block(block),
            Stmt::Defer(defer) => self.bind_statement(&defer.statement),
            Stmt::Expr(stmt) => self.bind_expr(&stmt.expression),
            other => Err(self.unexpected(
                format!("{:?} cannot appear inside a function body", other.kind()),
                other.span(),
            )),
        }
    }

    fn bind_expr(&mut self, expr: &Expr) -> BindResult<()> {
        match expr {
            Expr::Number(_) | Expr::String(_) | Expr::Bool(_) | Expr::Null(_) => Ok(()),
            Expr::Identifier(ident) => self.resolve_value(ident),
            Expr::Unary(unary) => self.bind_expr(&unary.operand),
            Expr::Binary(binary) => {
                self.bind_expr(&binary.left)?;
                self.bind_expr(&binary.right)
            }
            Expr::Assignment(assign) => {
                self.resolve_value(&assign.target)?;
                self.bind_expr(&assign.value)
            }
            Expr::Parenthesized(paren) => self.bind_expr(&paren.inner),
            Expr::Call(call) => {
                self.bind_expr(&call.callee)?;
                call.args.iter().try_for_each(|arg| self.bind_expr(arg))
            }
            Expr::ElementAccess(access) => {
                self.bind_expr(&access.target)?;
                self.bind_expr(&access.index)
            }
            Expr::PropertyAccess(access) => {
                self.bind_expr(&access.target)?;
                self.resolve_property(access)
            }
            Expr::Array(array) => array.elements.iter().try_for_each(|e| self.bind_expr(e)),
            Expr::Struct(lit) => lit
                .elements
                .iter()
                .try_for_each(|element| self.bind_expr(&element.value)),
        }
    }

    /// Resolves an identifier reference through the scope chain, outermost
    /// last. Rebinding an already-bound node is a no-op.
    fn resolve_value(&mut self, ident: &Ident) -> BindResult<()> {
        if self.bindings.node_symbols.contains_key(&ident.id) {
            return Ok(());
        }

        let text = self.interner.resolve(ident.name);
        if AMBIENT_FUNCTIONS.contains(&text) {
            return Ok(());
        }

        if let Some(id) = self.lookup_scopes(ident.name) {
            self.bindings.node_symbols.insert(ident.id, id);
            return Ok(());
        }

        Err(self.missing_symbol(ident))
    }

    /// Binds the right side of `left.right`. The left symbol's member
    /// table resolves the name: modules, structs, enums, and struct- or
    /// enum-typed variables all carry one. Property access on a symbol
    /// without members (primitives, arrays, functions) stays unbound.
    fn resolve_property(&mut self, access: &PropertyAccessExpr) -> BindResult<()> {
        let Some(target_id) = self.symbol_of_expr(&access.target) else {
            return Ok(());
        };
        let Some(members) = self.bindings.symbols.get(target_id).members.clone() else {
            return Ok(());
        };

        match members.get(access.property.name) {
            Some(id) => {
                self.bindings.node_symbols.insert(access.property.id, id);
                Ok(())
            }
            None => {
                let name = self.interner.resolve(access.property.name).to_string();
                let candidates: Vec<&str> = members
                    .names()
                    .map(|n| self.interner.resolve(n))
                    .collect();
                let suggestion =
                    suggest::find_similar(&name, candidates, 2).map(str::to_string);
                Err(BindError {
                    kind: BindErrorKind::MissingSymbol { name, suggestion },
                    span: access.property.span,
                    file: self.current_file.clone(),
                })
            }
        }
    }

    fn symbol_of_expr(&self, expr: &Expr) -> Option<SymbolId> {
        match expr {
            Expr::Identifier(ident) => self.bindings.symbol_of(ident.id),
            Expr::PropertyAccess(access) => self.bindings.symbol_of(access.property.id),
            Expr::Parenthesized(paren) => self.symbol_of_expr(&paren.inner),
            _ => None,
        }
    }

    fn bind_type(&mut self, ty: &TypeNode) -> BindResult<()> {
        match ty {
            TypeNode::Pointer(pointer) => self.bind_type(&pointer.pointee),
            TypeNode::Array(array) => self.bind_type(&array.element),
            TypeNode::Reference(reference) => match &reference.qualifier {
                None => {
                    if self.bindings.node_symbols.contains_key(&reference.name.id) {
                        return Ok(());
                    }
                    let text = self.interner.resolve(reference.name.name);
                    if AMBIENT_TYPES.contains(&text) {
                        return Ok(());
                    }
                    if let Some(id) = self.lookup_scopes(reference.name.name) {
                        self.bindings.node_symbols.insert(reference.name.id, id);
                        return Ok(());
                    }
                    Err(self.missing_symbol(&reference.name))
                }
                Some(qualifier) => {
                    self.resolve_value(qualifier)?;
                    let Some(module_id) = self.bindings.symbol_of(qualifier.id) else {
                        return Err(self.missing_symbol(qualifier));
                    };
                    let members = self
                        .bindings
                        .symbols
                        .get(module_id)
                        .members
                        .clone()
                        .unwrap_or_default();
                    match members.get(reference.name.name) {
                        Some(id) => {
                            self.bindings.node_symbols.insert(reference.name.id, id);
                            Ok(())
                        }
                        None => Err(self.missing_symbol(&reference.name)),
                    }
                }
            },
        }
    }

    fn missing_symbol(&self, ident: &Ident) -> BindError {
        let name = self.interner.resolve(ident.name).to_string();
        let mut candidates = Vec::new();
        for scope in self.scopes.iter().rev() {
            for candidate in scope.names() {
                candidates.push(self.interner.resolve(candidate));
            }
        }
        let suggestion = suggest::find_similar(&name, candidates, 2).map(str::to_string);
        BindError {
            kind: BindErrorKind::MissingSymbol { name, suggestion },
            span: ident.span,
            file: self.current_file.clone(),
        }
    }

    fn unexpected(&self, message: String, span: Span) -> BindError {
        BindError {
            kind: BindErrorKind::Unexpected { message },
            span,
            file: self.current_file.clone(),
        }
    }
}
