//! Block-level statement parsing.
//!
//! Inside a block: `var`, `defer`, `if`, `while`, `return`, a nested block,
//! or an expression statement terminated by `;`. Keywords that can only
//! begin top-level declarations are rejected here with
//! `UnknownBlockLevelStatement` instead of falling through to the
//! expression grammar.

use crate::ast::{Block, DeferStmt, ExprStmt, IfStmt, ReturnStmt, Stmt, WhileStmt};
use crate::error::{ParseError, ParseErrorKind};
use crate::token::TokenType;

use super::{DeclarationParsing, ExpressionParsing, ParseResult, Parser};

pub trait StatementParsing {
    fn parse_block(&mut self) -> ParseResult<Block>;
    fn parse_block_statement(&mut self) -> ParseResult<Stmt>;
    fn parse_if(&mut self) -> ParseResult<IfStmt>;
    fn parse_while(&mut self) -> ParseResult<WhileStmt>;
    fn parse_return(&mut self) -> ParseResult<ReturnStmt>;
    fn parse_defer(&mut self) -> ParseResult<DeferStmt>;
    fn parse_expression_statement(&mut self) -> ParseResult<ExprStmt>;
}

impl<'int> StatementParsing for Parser<'int> {
    fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect(TokenType::OpenBrace)?.span;
        let mut statements = Vec::new();
        while !self.check(TokenType::CloseBrace) && !self.is_at_end() {
            statements.push(self.parse_block_statement()?);
        }
        self.expect(TokenType::CloseBrace)?;

        Ok(Block {
            id: self.node_id(),
            span: self.span_from(start),
            statements,
        })
    }

    fn parse_block_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenType::Var => Ok(Stmt::Var(self.parse_var(false)?)),
            TokenType::Defer => Ok(Stmt::Defer(self.parse_defer()?)),
            TokenType::If => Ok(Stmt::If(self.parse_if()?)),
            TokenType::While => Ok(Stmt::While(self.parse_while()?)),
            TokenType::Return => Ok(Stmt::Return(self.parse_return()?)),
            TokenType::OpenBrace => Ok(Stmt::Block(self.parse_block()?)),
            found @ (TokenType::Import
            | TokenType::Export
            | TokenType::Func
            | TokenType::Struct
            | TokenType::Enum
            | TokenType::Else
            | TokenType::For
            | TokenType::Of) => Err(ParseError::new(
                ParseErrorKind::UnknownBlockLevelStatement { found },
                self.peek().span,
            )),
            _ => Ok(Stmt::Expr(self.parse_expression_statement()?)),
        }
    }

    fn parse_if(&mut self) -> ParseResult<IfStmt> {
        let start = self.expect(TokenType::If)?.span;
        self.expect(TokenType::OpenParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::CloseParen)?;
        let then_block = self.parse_block()?;

        let else_branch = if self.match_token(&[TokenType::Else]) {
            if self.check(TokenType::If) {
                Some(Box::new(Stmt::If(self.parse_if()?)))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };

        Ok(IfStmt {
            id: self.node_id(),
            span: self.span_from(start),
            condition,
            then_block,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> ParseResult<WhileStmt> {
        let start = self.expect(TokenType::While)?.span;
        self.expect(TokenType::OpenParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::CloseParen)?;
        let body = self.parse_block()?;

        Ok(WhileStmt {
            id: self.node_id(),
            span: self.span_from(start),
            condition,
            body,
        })
    }

    fn parse_return(&mut self) -> ParseResult<ReturnStmt> {
        let start = self.expect(TokenType::Return)?.span;
        let expression = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenType::Semicolon)?;

        Ok(ReturnStmt {
            id: self.node_id(),
            span: self.span_from(start),
            expression,
        })
    }

    fn parse_defer(&mut self) -> ParseResult<DeferStmt> {
        let start = self.expect(TokenType::Defer)?.span;
        let statement = Box::new(self.parse_block_statement()?);

        Ok(DeferStmt {
            id: self.node_id(),
            span: self.span_from(start),
            statement,
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<ExprStmt> {
        let start = self.peek().span;
        let expression = self.parse_expression()?;
        self.expect(TokenType::Semicolon)?;

        Ok(ExprStmt {
            id: self.node_id(),
            span: self.span_from(start),
            expression,
        })
    }
}
