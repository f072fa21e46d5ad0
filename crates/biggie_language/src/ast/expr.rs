//! Expression nodes and operator families.
//!
//! Each binary expression constrains its operator to the sub-enum of its
//! precedence family, so an additive node can only ever carry `+` or `-`.
//! [`BinaryOperator`] is the sum of the binary families and decides the
//! node's [`SyntaxKind`].

use biggie_base::{Name, Span};

use super::{Ident, NodeId, SyntaxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditiveOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplicativeOperator {
    Star,
    Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOperator {
    EqualsEquals,
    BangEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    AmpersandAmpersand,
    BarBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Equals,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Address-of `&`.
    Ampersand,
    /// Dereference `*`.
    Star,
    /// Logical not `!`.
    Bang,
    /// Negation `-`.
    Minus,
}

/// Any binary operator, tagged by precedence family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Additive(AdditiveOperator),
    Multiplicative(MultiplicativeOperator),
    Equality(EqualityOperator),
    Comparison(ComparisonOperator),
    Logical(LogicalOperator),
}

impl BinaryOperator {
    /// Source text of the operator, as every C-family target spells it.
    pub fn text(&self) -> &'static str {
        match self {
            BinaryOperator::Additive(AdditiveOperator::Plus) => "+",
            BinaryOperator::Additive(AdditiveOperator::Minus) => "-",
            BinaryOperator::Multiplicative(MultiplicativeOperator::Star) => "*",
            BinaryOperator::Multiplicative(MultiplicativeOperator::Slash) => "/",
            BinaryOperator::Equality(EqualityOperator::EqualsEquals) => "==",
            BinaryOperator::Equality(EqualityOperator::BangEquals) => "!=",
            BinaryOperator::Comparison(ComparisonOperator::Less) => "<",
            BinaryOperator::Comparison(ComparisonOperator::LessEquals) => "<=",
            BinaryOperator::Comparison(ComparisonOperator::Greater) => ">",
            BinaryOperator::Comparison(ComparisonOperator::GreaterEquals) => ">=",
            BinaryOperator::Logical(LogicalOperator::AmpersandAmpersand) => "&&",
            BinaryOperator::Logical(LogicalOperator::BarBar) => "||",
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            BinaryOperator::Additive(_) => SyntaxKind::AdditiveExpression,
            BinaryOperator::Multiplicative(_) => SyntaxKind::MultiplicativeExpression,
            BinaryOperator::Equality(_) => SyntaxKind::EqualityExpression,
            BinaryOperator::Comparison(_) => SyntaxKind::ComparisonExpression,
            BinaryOperator::Logical(_) => SyntaxKind::LogicalExpression,
        }
    }
}

impl AssignmentOperator {
    pub fn text(&self) -> &'static str {
        match self {
            AssignmentOperator::Equals => "=",
            AssignmentOperator::PlusEquals => "+=",
            AssignmentOperator::MinusEquals => "-=",
            AssignmentOperator::StarEquals => "*=",
            AssignmentOperator::SlashEquals => "/=",
        }
    }
}

impl UnaryOperator {
    pub fn text(&self) -> &'static str {
        match self {
            UnaryOperator::Ampersand => "&",
            UnaryOperator::Star => "*",
            UnaryOperator::Bang => "!",
            UnaryOperator::Minus => "-",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberLit {
    pub id: NodeId,
    pub span: Span,
    /// Raw literal text, sign and fraction included.
    pub text: Name,
    /// Set when the literal contains a `.`.
    pub is_float: bool,
}

#[derive(Debug, Clone)]
pub struct StringLit {
    pub id: NodeId,
    pub span: Span,
    /// Body text between the quotes, verbatim.
    pub value: Name,
}

#[derive(Debug, Clone)]
pub struct BoolLit {
    pub id: NodeId,
    pub span: Span,
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct NullLit {
    pub id: NodeId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub id: NodeId,
    pub span: Span,
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub span: Span,
    pub op: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// `target op= value`. The target is restricted to an identifier at parse
/// time; anything else is an `InvalidAssignmentTarget` error.
#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub id: NodeId,
    pub span: Span,
    pub op: AssignmentOperator,
    pub target: Ident,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub id: NodeId,
    pub span: Span,
    pub inner: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub span: Span,
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct ElementAccessExpr {
    pub id: NodeId,
    pub span: Span,
    pub target: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct PropertyAccessExpr {
    pub id: NodeId,
    pub span: Span,
    pub target: Box<Expr>,
    pub property: Ident,
}

#[derive(Debug, Clone)]
pub struct ArrayLit {
    pub id: NodeId,
    pub span: Span,
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct StructLitElement {
    pub id: NodeId,
    pub span: Span,
    pub name: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct StructLit {
    pub id: NodeId,
    pub span: Span,
    pub elements: Vec<StructLitElement>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(NumberLit),
    String(StringLit),
    Bool(BoolLit),
    Null(NullLit),
    Identifier(Ident),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Assignment(AssignExpr),
    Parenthesized(ParenExpr),
    Call(CallExpr),
    ElementAccess(ElementAccessExpr),
    PropertyAccess(PropertyAccessExpr),
    Array(ArrayLit),
    Struct(StructLit),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Number(e) => e.id,
            Expr::String(e) => e.id,
            Expr::Bool(e) => e.id,
            Expr::Null(e) => e.id,
            Expr::Identifier(e) => e.id,
            Expr::Unary(e) => e.id,
            Expr::Binary(e) => e.id,
            Expr::Assignment(e) => e.id,
            Expr::Parenthesized(e) => e.id,
            Expr::Call(e) => e.id,
            Expr::ElementAccess(e) => e.id,
            Expr::PropertyAccess(e) => e.id,
            Expr::Array(e) => e.id,
            Expr::Struct(e) => e.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expr::Number(e) => e.span,
            Expr::String(e) => e.span,
            Expr::Bool(e) => e.span,
            Expr::Null(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::Parenthesized(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::ElementAccess(e) => e.span,
            Expr::PropertyAccess(e) => e.span,
            Expr::Array(e) => e.span,
            Expr::Struct(e) => e.span,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            Expr::Number(_) => SyntaxKind::NumberLiteral,
            Expr::String(_) => SyntaxKind::StringLiteral,
            Expr::Bool(_) => SyntaxKind::BooleanLiteral,
            Expr::Null(_) => SyntaxKind::NullLiteral,
            Expr::Identifier(_) => SyntaxKind::Identifier,
            Expr::Unary(_) => SyntaxKind::UnaryExpression,
            Expr::Binary(e) => e.op.kind(),
            Expr::Assignment(_) => SyntaxKind::AssignmentExpression,
            Expr::Parenthesized(_) => SyntaxKind::ParenthesizedExpression,
            Expr::Call(_) => SyntaxKind::CallExpression,
            Expr::ElementAccess(_) => SyntaxKind::ElementAccessExpression,
            Expr::PropertyAccess(_) => SyntaxKind::PropertyAccessExpression,
            Expr::Array(_) => SyntaxKind::ArrayLiteral,
            Expr::Struct(_) => SyntaxKind::StructLiteral,
        }
    }
}
