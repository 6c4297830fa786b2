//! Core parser struct and helper methods.

use crate::ast::*;
use crate::error::ParserError;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

pub type ParseResult<T> = Result<T, ParserError>;

/// Deepest expression nesting accepted. Every operator in a chain and every
/// parenthesis opens one level.
pub(crate) const MAX_NESTING: usize = 256;

/// The parser for MyPL. Single pass, no backtracking.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.span.line, t.span.column + t.lexeme.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::eof(line, column));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parse a complete program.
    pub fn parse(&mut self) -> ParseResult<Program> {
        let mut program = Program::new();

        while !self.is_at_end() {
            if self.check(TokenKind::Struct) {
                program.struct_defs.push(self.struct_definition()?);
            } else {
                program.fun_defs.push(self.function_definition()?);
            }
        }

        Ok(program)
    }

    // ===== Token manipulation =====

    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
            self.tokens[self.current - 1].clone()
        } else {
            self.peek().clone()
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let index = if self.current + n < self.tokens.len() {
            self.current + n
        } else {
            self.tokens.len() - 1
        };
        &self.tokens[index]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> ParseResult<Token> {
        self.expect(TokenKind::Identifier, "identifier")
    }

    /// An "expected X" error describing the current token.
    pub(crate) fn error_at_current(&self, expected: &str) -> ParserError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParserError::unexpected_eof(token.span)
        } else {
            ParserError::unexpected_token(expected, token.lexeme.clone(), token.span)
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Run `f` one nesting level deeper, failing past `MAX_NESTING`.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(ParserError::general(
                "expression nested too deeply",
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
