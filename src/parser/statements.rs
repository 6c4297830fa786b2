//! Statement parsing: declarations, assignments, calls, if, while, for, return.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::If => Ok(Stmt::If(self.if_statement()?)),
            TokenKind::While => Ok(Stmt::While(self.while_statement()?)),
            TokenKind::For => Ok(Stmt::For(self.for_statement()?)),
            TokenKind::Return => Ok(Stmt::Return(self.return_statement()?)),
            TokenKind::List | TokenKind::Array => Ok(Stmt::VarDecl(self.var_declaration()?)),
            k if k.is_base_type() => Ok(Stmt::VarDecl(self.var_declaration()?)),
            // A leading identifier is a struct type name, a call, or the root of an lvalue.
            TokenKind::Identifier => match self.peek_nth(1).kind {
                TokenKind::Identifier => Ok(Stmt::VarDecl(self.var_declaration()?)),
                TokenKind::LeftParen => Ok(Stmt::Call(self.call_expression()?)),
                TokenKind::Dot | TokenKind::LeftBracket | TokenKind::Assign => {
                    Ok(Stmt::Assign(self.assignment()?))
                }
                _ => {
                    self.advance();
                    Err(self.error_at_current("declaration, assignment or call"))
                }
            },
            _ => Err(self.error_at_current("statement")),
        }
    }

    /// `{ stmt* }`
    pub(crate) fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(TokenKind::LeftBrace, "'{'")?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            stmts.push(self.statement()?);
        }
        self.expect(TokenKind::RightBrace, "'}'")?;
        Ok(stmts)
    }

    pub(crate) fn assignment(&mut self) -> ParseResult<AssignStmt> {
        let lvalue = self.var_path()?;
        self.expect(TokenKind::Assign, "'='")?;
        let expr = self.expression()?;
        Ok(AssignStmt { lvalue, expr })
    }

    fn condition(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::LeftParen, "'('")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParen, "')'")?;
        Ok(condition)
    }

    fn if_statement(&mut self) -> ParseResult<IfStmt> {
        self.expect(TokenKind::If, "'if'")?;
        let if_part = BasicIf {
            condition: self.condition()?,
            stmts: self.block()?,
        };

        let mut else_ifs = Vec::new();
        while self.match_token(TokenKind::Elseif) {
            else_ifs.push(BasicIf {
                condition: self.condition()?,
                stmts: self.block()?,
            });
        }

        let else_stmts = if self.match_token(TokenKind::Else) {
            self.block()?
        } else {
            Vec::new()
        };

        Ok(IfStmt {
            if_part,
            else_ifs,
            else_stmts,
        })
    }

    fn while_statement(&mut self) -> ParseResult<WhileStmt> {
        self.expect(TokenKind::While, "'while'")?;
        let condition = self.condition()?;
        let stmts = self.block()?;
        Ok(WhileStmt { condition, stmts })
    }

    /// `for (T x = e; cond; x = e) { ... }`
    fn for_statement(&mut self) -> ParseResult<ForStmt> {
        self.expect(TokenKind::For, "'for'")?;
        self.expect(TokenKind::LeftParen, "'('")?;
        let var_decl = self.var_declaration()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        let condition = self.expression()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        if !self.check(TokenKind::Identifier) {
            return Err(self.error_at_current("assignment"));
        }
        let assign_stmt = self.assignment()?;
        self.expect(TokenKind::RightParen, "')'")?;
        let stmts = self.block()?;

        Ok(ForStmt {
            var_decl,
            condition,
            assign_stmt,
            stmts,
        })
    }

    fn return_statement(&mut self) -> ParseResult<ReturnStmt> {
        let span = self.expect(TokenKind::Return, "'return'")?.span;
        let expr = self.expression()?;
        Ok(ReturnStmt { expr, span })
    }
}
