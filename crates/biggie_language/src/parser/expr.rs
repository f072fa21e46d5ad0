//! Expression parsing: precedence climbing with postfix chains.
//!
//! Lowest to highest:
//!
//! 1. assignment (`=`, `+=`, `-=`, `*=`, `/=`) — right-associative, target
//!    must be an identifier
//! 2. `||` — left-associative
//! 3. `&&` — left-associative
//! 4. `==` `!=` — left-associative
//! 5. `<` `<=` `>` `>=` — non-associative, a single operator per level
//! 6. `+` `-` — left-associative
//! 7. `*` `/` — left-associative
//! 8. unary prefix `&` `*` `!` `-` — right-associative
//! 9. primary, then a postfix loop: `(` call, `[` element access,
//!    `.` property access, chaining left-to-right
//!
//! Additive and multiplicative levels fold left-associatively; comparison
//! deliberately does not loop, so `a < b < c` fails to parse rather than
//! silently grouping.

use crate::ast::{
    AdditiveOperator, ArrayLit, AssignExpr, AssignmentOperator, BinaryExpr, BinaryOperator,
    BoolLit, CallExpr, ComparisonOperator, ElementAccessExpr, EqualityOperator, Expr,
    LogicalOperator, MultiplicativeOperator, NullLit, NumberLit, ParenExpr, PropertyAccessExpr,
    StringLit, StructLit, StructLitElement, UnaryExpr, UnaryOperator,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenType;

use super::{ParseResult, Parser};

pub trait ExpressionParsing {
    fn parse_expression(&mut self) -> ParseResult<Expr>;
    fn parse_assignment(&mut self) -> ParseResult<Expr>;
    fn parse_logical_or(&mut self) -> ParseResult<Expr>;
    fn parse_logical_and(&mut self) -> ParseResult<Expr>;
    fn parse_equality(&mut self) -> ParseResult<Expr>;
    fn parse_comparison(&mut self) -> ParseResult<Expr>;
    fn parse_additive(&mut self) -> ParseResult<Expr>;
    fn parse_multiplicative(&mut self) -> ParseResult<Expr>;
    fn parse_unary(&mut self) -> ParseResult<Expr>;
    fn parse_postfix(&mut self) -> ParseResult<Expr>;
    fn parse_primary(&mut self) -> ParseResult<Expr>;
}

impl<'int> Parser<'int> {
    fn binary(&mut self, op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        let span = left.span().merge(right.span());
        Expr::Binary(BinaryExpr {
            id: self.node_id(),
            span,
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

impl<'int> ExpressionParsing for Parser<'int> {
    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let left = self.parse_logical_or()?;

        let op = match self.peek().kind {
            TokenType::Equals => AssignmentOperator::Equals,
            TokenType::PlusEquals => AssignmentOperator::PlusEquals,
            TokenType::MinusEquals => AssignmentOperator::MinusEquals,
            TokenType::StarEquals => AssignmentOperator::StarEquals,
            TokenType::SlashEquals => AssignmentOperator::SlashEquals,
            _ => return Ok(left),
        };

        let target = match left {
            Expr::Identifier(ident) => ident,
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidAssignmentTarget,
                    other.span(),
                ))
            }
        };

        self.advance();
        let value = self.parse_assignment()?;
        let span = target.span.merge(value.span());

        Ok(Expr::Assignment(AssignExpr {
            id: self.node_id(),
            span,
            op,
            target,
            value: Box::new(value),
        }))
    }

    fn parse_logical_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_logical_and()?;
        while self.match_token(&[TokenType::BarBar]) {
            let right = self.parse_logical_and()?;
            left = self.binary(
                BinaryOperator::Logical(LogicalOperator::BarBar),
                left,
                right,
            );
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.match_token(&[TokenType::AmpersandAmpersand]) {
            let right = self.parse_equality()?;
            left = self.binary(
                BinaryOperator::Logical(LogicalOperator::AmpersandAmpersand),
                left,
                right,
            );
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek().kind {
                TokenType::EqualsEquals => EqualityOperator::EqualsEquals,
                TokenType::BangEquals => EqualityOperator::BangEquals,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = self.binary(BinaryOperator::Equality(op), left, right);
        }
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_additive()?;
        let op = match self.peek().kind {
            TokenType::Less => ComparisonOperator::Less,
            TokenType::LessEquals => ComparisonOperator::LessEquals,
            TokenType::Greater => ComparisonOperator::Greater,
            TokenType::GreaterEquals => ComparisonOperator::GreaterEquals,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;
        Ok(self.binary(BinaryOperator::Comparison(op), left, right))
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenType::Plus => AdditiveOperator::Plus,
                TokenType::Minus => AdditiveOperator::Minus,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(BinaryOperator::Additive(op), left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenType::Star => MultiplicativeOperator::Star,
                TokenType::Slash => MultiplicativeOperator::Slash,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(BinaryOperator::Multiplicative(op), left, right);
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek().kind {
            TokenType::Ampersand => UnaryOperator::Ampersand,
            TokenType::Star => UnaryOperator::Star,
            TokenType::Bang => UnaryOperator::Bang,
            TokenType::Minus => UnaryOperator::Minus,
            _ => return self.parse_postfix(),
        };
        let start = self.peek().span;
        self.advance();
        let operand = self.parse_unary()?;
        let span = start.merge(operand.span());

        Ok(Expr::Unary(UnaryExpr {
            id: self.node_id(),
            span,
            op,
            operand: Box::new(operand),
        }))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek().kind {
                TokenType::OpenParen => {
                    self.advance();
                    let mut args = Vec::new();
                    while !self.check(TokenType::CloseParen) && !self.is_at_end() {
                        if !args.is_empty() {
                            self.expect(TokenType::Comma)?;
                        }
                        args.push(self.parse_expression()?);
                    }
                    let close = self.expect(TokenType::CloseParen)?;
                    let span = expr.span().merge(close.span);
                    expr = Expr::Call(CallExpr {
                        id: self.node_id(),
                        span,
                        callee: Box::new(expr),
                        args,
                    });
                }
                TokenType::OpenBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let close = self.expect(TokenType::CloseBracket)?;
                    let span = expr.span().merge(close.span);
                    expr = Expr::ElementAccess(ElementAccessExpr {
                        id: self.node_id(),
                        span,
                        target: Box::new(expr),
                        index: Box::new(index),
                    });
                }
                TokenType::Dot => {
                    self.advance();
                    let property = self.expect_identifier()?;
                    let span = expr.span().merge(property.span);
                    expr = Expr::PropertyAccess(PropertyAccessExpr {
                        id: self.node_id(),
                        span,
                        target: Box::new(expr),
                        property,
                    });
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let span = self.peek().span;
        match self.peek().kind {
            TokenType::Identifier(name) => {
                self.advance();
                Ok(Expr::Identifier(crate::ast::Ident {
                    id: self.node_id(),
                    span,
                    name,
                }))
            }
            TokenType::Number(text) => {
                self.advance();
                let is_float = self.interner.resolve(text).contains('.');
                Ok(Expr::Number(NumberLit {
                    id: self.node_id(),
                    span,
                    text,
                    is_float,
                }))
            }
            TokenType::String(value) => {
                self.advance();
                Ok(Expr::String(StringLit {
                    id: self.node_id(),
                    span,
                    value,
                }))
            }
            TokenType::True | TokenType::False => {
                let value = self.peek().kind == TokenType::True;
                self.advance();
                Ok(Expr::Bool(BoolLit {
                    id: self.node_id(),
                    span,
                    value,
                }))
            }
            TokenType::Null => {
                self.advance();
                Ok(Expr::Null(NullLit {
                    id: self.node_id(),
                    span,
                }))
            }
            TokenType::OpenBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(TokenType::CloseBracket) && !self.is_at_end() {
                    if !elements.is_empty() {
                        self.expect(TokenType::Comma)?;
                    }
                    elements.push(self.parse_expression()?);
                }
                let close = self.expect(TokenType::CloseBracket)?;
                Ok(Expr::Array(ArrayLit {
                    id: self.node_id(),
                    span: span.merge(close.span),
                    elements,
                }))
            }
            TokenType::OpenBrace => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(TokenType::CloseBrace) && !self.is_at_end() {
                    if !elements.is_empty() {
                        self.expect(TokenType::Comma)?;
                    }
                    let name = self.expect_identifier()?;
                    self.expect(TokenType::Colon)?;
                    let value = self.parse_expression()?;
                    elements.push(StructLitElement {
                        id: self.node_id(),
                        span: name.span.merge(value.span()),
                        name,
                        value,
                    });
                }
                let close = self.expect(TokenType::CloseBrace)?;
                Ok(Expr::Struct(StructLit {
                    id: self.node_id(),
                    span: span.merge(close.span),
                    elements,
                }))
            }
            TokenType::OpenParen => {
                self.advance();
                let inner = self.parse_expression()?;
                let close = self.expect(TokenType::CloseParen)?;
                Ok(Expr::Parenthesized(ParenExpr {
                    id: self.node_id(),
                    span: span.merge(close.span),
                    inner: Box::new(inner),
                }))
            }
            found => Err(ParseError::new(
                ParseErrorKind::UnknownExpression { found },
                span,
            )),
        }
    }
}
