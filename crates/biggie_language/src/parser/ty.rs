//! Type annotation parsing.
//!
//! ```text
//! Type := '*' Type
//!       | '[' ']' Type
//!       | Identifier ['.' Identifier]
//! ```

use crate::ast::{ArrayType, PointerType, TypeNode, TypeReference};
use crate::token::TokenType;

use super::{ParseResult, Parser};

pub trait TypeParsing {
    fn parse_type(&mut self) -> ParseResult<TypeNode>;
}

impl<'int> TypeParsing for Parser<'int> {
    fn parse_type(&mut self) -> ParseResult<TypeNode> {
        let start = self.peek().span;

        if self.match_token(&[TokenType::Star]) {
            let pointee = self.parse_type()?;
            let span = start.merge(pointee.span());
            return Ok(TypeNode::Pointer(PointerType {
                id: self.node_id(),
                span,
                pointee: Box::new(pointee),
            }));
        }

        if self.match_token(&[TokenType::OpenBracket]) {
            self.expect(TokenType::CloseBracket)?;
            let element = self.parse_type()?;
            let span = start.merge(element.span());
            return Ok(TypeNode::Array(ArrayType {
                id: self.node_id(),
                span,
                element: Box::new(element),
            }));
        }

        let first = self.expect_identifier()?;
        if self.match_token(&[TokenType::Dot]) {
            let name = self.expect_identifier()?;
            let span = first.span.merge(name.span);
            return Ok(TypeNode::Reference(TypeReference {
                id: self.node_id(),
                span,
                qualifier: Some(first),
                name,
            }));
        }

        Ok(TypeNode::Reference(TypeReference {
            id: self.node_id(),
            span: first.span,
            qualifier: None,
            name: first,
        }))
    }
}
