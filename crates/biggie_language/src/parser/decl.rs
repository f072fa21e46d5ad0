//! Top-level declaration parsing.
//!
//! ```text
//! TopLevelStmt := ['export'] (Import | Var | Func | Struct | Enum)
//! Import       := 'import' [Identifier] StringLiteral
//! Func         := 'func' Identifier '(' ArgList ')' ':' Type Block
//! Struct       := 'struct' Identifier '{' StructMember* '}'
//! Enum         := 'enum' Identifier '{' EnumMember,* '}'
//! Var          := 'var' Identifier ':' Type ['=' Expression] ';'
//! ```

use crate::ast::{
    EnumDecl, EnumMember, FuncArg, FuncDecl, ImportDecl, Stmt, StructDecl, StructMember, VarDecl,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenType;

use super::{ExpressionParsing, ParseResult, Parser, StatementParsing, TypeParsing};

pub trait DeclarationParsing {
    fn parse_top_level_statement(&mut self) -> ParseResult<Stmt>;
    fn parse_import(&mut self, is_exported: bool) -> ParseResult<ImportDecl>;
    fn parse_var(&mut self, is_exported: bool) -> ParseResult<VarDecl>;
    fn parse_func(&mut self, is_exported: bool) -> ParseResult<FuncDecl>;
    fn parse_struct(&mut self, is_exported: bool) -> ParseResult<StructDecl>;
    fn parse_enum(&mut self, is_exported: bool) -> ParseResult<EnumDecl>;
}

impl<'int> DeclarationParsing for Parser<'int> {
    fn parse_top_level_statement(&mut self) -> ParseResult<Stmt> {
        let is_exported = self.match_token(&[TokenType::Export]);

        match self.peek().kind {
            TokenType::Import => Ok(Stmt::Import(self.parse_import(is_exported)?)),
            TokenType::Var => Ok(Stmt::Var(self.parse_var(is_exported)?)),
            TokenType::Func => Ok(Stmt::Func(self.parse_func(is_exported)?)),
            TokenType::Struct => Ok(Stmt::Struct(self.parse_struct(is_exported)?)),
            TokenType::Enum => Ok(Stmt::Enum(self.parse_enum(is_exported)?)),
            found => Err(ParseError::new(
                ParseErrorKind::UnknownTopLevelStatement { found },
                self.peek().span,
            )),
        }
    }

    fn parse_import(&mut self, is_exported: bool) -> ParseResult<ImportDecl> {
        let start = self.expect(TokenType::Import)?.span;

        let alias = match self.peek().kind {
            TokenType::Identifier(_) => Some(self.expect_identifier()?),
            _ => None,
        };

        let (path, path_span) = match self.peek().kind {
            TokenType::String(name) => {
                let span = self.peek().span;
                self.advance();
                (self.interner.resolve(name).to_string(), span)
            }
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedTokenType {
                        expected: TokenType::String(biggie_base::Name::EMPTY),
                        found,
                    },
                    self.peek().span,
                ))
            }
        };

        Ok(ImportDecl {
            id: self.node_id(),
            span: self.span_from(start),
            alias,
            path,
            path_span,
            resolved: None,
            is_exported,
        })
    }

    fn parse_var(&mut self, is_exported: bool) -> ParseResult<VarDecl> {
        let start = self.expect(TokenType::Var)?.span;
        let name = self.expect_identifier()?;
        self.expect(TokenType::Colon)?;
        let ty = self.parse_type()?;

        let init = if self.match_token(&[TokenType::Equals]) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenType::Semicolon)?;

        Ok(VarDecl {
            id: self.node_id(),
            span: self.span_from(start),
            name,
            ty,
            init,
            is_exported,
            is_const: false,
        })
    }

    fn parse_func(&mut self, is_exported: bool) -> ParseResult<FuncDecl> {
        let start = self.expect(TokenType::Func)?.span;
        let name = self.expect_identifier()?;

        self.expect(TokenType::OpenParen)?;
        let mut args = Vec::new();
        while !self.check(TokenType::CloseParen) && !self.is_at_end() {
            if !args.is_empty() {
                self.expect(TokenType::Comma)?;
            }
            let arg_name = self.expect_identifier()?;
            self.expect(TokenType::Colon)?;
            let arg_ty = self.parse_type()?;
            args.push(FuncArg {
                id: self.node_id(),
                span: arg_name.span.merge(arg_ty.span()),
                name: arg_name,
                ty: arg_ty,
            });
        }
        self.expect(TokenType::CloseParen)?;

        self.expect(TokenType::Colon)?;
        let return_type = self.parse_type()?;
        let body = self.parse_block()?;

        Ok(FuncDecl {
            id: self.node_id(),
            span: self.span_from(start),
            name,
            args,
            return_type,
            body,
            is_exported,
        })
    }

    fn parse_struct(&mut self, is_exported: bool) -> ParseResult<StructDecl> {
        let start = self.expect(TokenType::Struct)?.span;
        let name = self.expect_identifier()?;

        self.expect(TokenType::OpenBrace)?;
        let mut members = Vec::new();
        while !self.check(TokenType::CloseBrace) && !self.is_at_end() {
            let member_name = self.expect_identifier()?;
            self.expect(TokenType::Colon)?;
            let member_ty = self.parse_type()?;
            self.expect(TokenType::Semicolon)?;
            members.push(StructMember {
                id: self.node_id(),
                span: member_name.span.merge(member_ty.span()),
                name: member_name,
                ty: member_ty,
            });
        }
        self.expect(TokenType::CloseBrace)?;

        Ok(StructDecl {
            id: self.node_id(),
            span: self.span_from(start),
            name,
            members,
            is_exported,
        })
    }

    fn parse_enum(&mut self, is_exported: bool) -> ParseResult<EnumDecl> {
        let start = self.expect(TokenType::Enum)?.span;
        let name = self.expect_identifier()?;

        self.expect(TokenType::OpenBrace)?;
        let mut members = Vec::new();
        while !self.check(TokenType::CloseBrace) && !self.is_at_end() {
            let member_name = self.expect_identifier()?;
            members.push(EnumMember {
                id: self.node_id(),
                span: member_name.span,
                name: member_name,
            });
            if !self.match_token(&[TokenType::Comma]) {
                break;
            }
        }
        self.expect(TokenType::CloseBrace)?;

        Ok(EnumDecl {
            id: self.node_id(),
            span: self.span_from(start),
            name,
            members,
            is_exported,
        })
    }
}
