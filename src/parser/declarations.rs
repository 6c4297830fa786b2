//! Struct and function definitions, and type syntax.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    /// `struct ID { (type ID (, type ID)*)? }`
    pub(crate) fn struct_definition(&mut self) -> ParseResult<StructDef> {
        self.expect(TokenKind::Struct, "'struct'")?;
        let struct_name = self.expect_identifier()?;
        self.expect(TokenKind::LeftBrace, "'{'")?;

        let mut fields = Vec::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                fields.push(self.var_definition()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightBrace, "'}'")?;
        Ok(StructDef {
            struct_name,
            fields,
        })
    }

    /// `(type | void) ID ( params? ) { stmt* }`
    pub(crate) fn function_definition(&mut self) -> ParseResult<FunDef> {
        let return_type = if self.match_token(TokenKind::Void) {
            DataType::void()
        } else {
            self.data_type()?
        };
        let fun_name = self.expect_identifier()?;

        self.expect(TokenKind::LeftParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.var_definition()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "')'")?;

        let stmts = self.block()?;
        Ok(FunDef {
            return_type,
            fun_name,
            params,
            stmts,
        })
    }

    fn var_definition(&mut self) -> ParseResult<VarDef> {
        let data_type = self.data_type()?;
        let var_name = self.expect_identifier()?;
        Ok(VarDef::new(var_name, data_type))
    }

    /// `base_type | ID | list | array (base_type | ID)`
    pub(crate) fn data_type(&mut self) -> ParseResult<DataType> {
        let token = self.peek().clone();
        if token.kind.is_base_type() || token.kind == TokenKind::Identifier {
            self.advance();
            Ok(DataType::scalar(token.lexeme))
        } else if token.kind == TokenKind::List {
            self.advance();
            Ok(DataType::scalar("list"))
        } else if token.kind == TokenKind::Array {
            self.advance();
            let element = self.peek().clone();
            if element.kind.is_base_type() || element.kind == TokenKind::Identifier {
                self.advance();
                Ok(DataType::new(element.lexeme, true))
            } else {
                Err(self.error_at_current("array element type"))
            }
        } else {
            Err(self.error_at_current("data type"))
        }
    }

    /// `T x = expr`
    pub(crate) fn var_declaration(&mut self) -> ParseResult<VarDeclStmt> {
        let var_def = self.var_definition()?;
        self.expect(TokenKind::Assign, "'='")?;
        let expr = self.expression()?;
        Ok(VarDeclStmt { var_def, expr })
    }
}
