//! Type annotation nodes.
//!
//! Types in Big are structural wrappers over named references:
//! `*T` (pointer), `[]T` (array), and `Name` or `Module.Name` references.

use biggie_base::Span;

use super::{Ident, NodeId, SyntaxKind};

/// A named type, optionally qualified by a module alias (`math.Vector`).
#[derive(Debug, Clone)]
pub struct TypeReference {
    pub id: NodeId,
    pub span: Span,
    pub qualifier: Option<Ident>,
    pub name: Ident,
}

/// `*T`
#[derive(Debug, Clone)]
pub struct PointerType {
    pub id: NodeId,
    pub span: Span,
    pub pointee: Box<TypeNode>,
}

/// `[]T`
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub id: NodeId,
    pub span: Span,
    pub element: Box<TypeNode>,
}

#[derive(Debug, Clone)]
pub enum TypeNode {
    Reference(TypeReference),
    Pointer(PointerType),
    Array(ArrayType),
}

impl TypeNode {
    pub fn id(&self) -> NodeId {
        match self {
            TypeNode::Reference(t) => t.id,
            TypeNode::Pointer(t) => t.id,
            TypeNode::Array(t) => t.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeNode::Reference(t) => t.span,
            TypeNode::Pointer(t) => t.span,
            TypeNode::Array(t) => t.span,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            TypeNode::Reference(t) if t.qualifier.is_some() => SyntaxKind::QualifiedName,
            TypeNode::Reference(_) => SyntaxKind::TypeReference,
            TypeNode::Pointer(_) => SyntaxKind::PointerType,
            TypeNode::Array(_) => SyntaxKind::ArrayType,
        }
    }
}
