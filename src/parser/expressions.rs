//! Expression parsing: flat operator chains, terms and r-values.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};

impl Parser {
    /// `not expr | term (bin_op expr)?`
    ///
    /// Operators chain to the right with no precedence, so `a - b - c`
    /// is `a - (b - c)`.
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::chain)
    }

    fn chain(&mut self) -> ParseResult<Expr> {
        if self.match_token(TokenKind::Not) {
            let inner = self.expression()?;
            return Ok(if inner.negated {
                Expr {
                    negated: true,
                    first: Term::Complex(Box::new(inner)),
                    rest: None,
                }
            } else {
                Expr {
                    negated: true,
                    ..inner
                }
            });
        }

        let first = if self.match_token(TokenKind::LeftParen) {
            let inner = self.expression()?;
            self.expect(TokenKind::RightParen, "')'")?;
            Term::Complex(Box::new(inner))
        } else {
            Term::Simple(self.rvalue()?)
        };

        let rest = match BinaryOp::from_token(self.peek().kind) {
            Some(op) => {
                let span = self.advance().span;
                Some((Operator { op, span }, Box::new(self.expression()?)))
            }
            None => None,
        };

        Ok(Expr {
            negated: false,
            first,
            rest,
        })
    }

    fn rvalue(&mut self) -> ParseResult<RValue> {
        let kind = self.peek().kind;
        if kind.is_literal() {
            Ok(RValue::Simple(self.advance()))
        } else if kind == TokenKind::New {
            Ok(RValue::New(self.new_rvalue()?))
        } else if kind == TokenKind::Identifier {
            if self.peek_nth(1).kind == TokenKind::LeftParen {
                Ok(RValue::Call(self.call_expression()?))
            } else {
                Ok(RValue::Var(self.var_path()?))
            }
        } else {
            Err(self.error_at_current("value"))
        }
    }

    /// `new ID ([expr])? | new base_type [expr]`
    fn new_rvalue(&mut self) -> ParseResult<NewRValue> {
        self.expect(TokenKind::New, "'new'")?;
        let kind = self.peek().kind;
        if kind == TokenKind::Identifier {
            let type_name = self.advance();
            let array_expr = if self.match_token(TokenKind::LeftBracket) {
                let expr = self.expression()?;
                self.expect(TokenKind::RightBracket, "']'")?;
                Some(Box::new(expr))
            } else {
                None
            };
            Ok(NewRValue {
                type_name,
                array_expr,
            })
        } else if kind.is_base_type() {
            let type_name = self.advance();
            self.expect(TokenKind::LeftBracket, "'['")?;
            let expr = self.expression()?;
            self.expect(TokenKind::RightBracket, "']'")?;
            Ok(NewRValue {
                type_name,
                array_expr: Some(Box::new(expr)),
            })
        } else {
            Err(self.error_at_current("type name after 'new'"))
        }
    }

    /// `ID ( (expr (, expr)*)? )`
    pub(crate) fn call_expression(&mut self) -> ParseResult<CallExpr> {
        let fun_name = self.expect_identifier()?;
        self.expect(TokenKind::LeftParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "')'")?;
        Ok(CallExpr { fun_name, args })
    }

    /// `ID ([expr])? (. ID ([expr])?)*`
    pub(crate) fn var_path(&mut self) -> ParseResult<Vec<VarRef>> {
        let mut path = Vec::new();
        loop {
            let var_name = self.expect_identifier()?;
            let array_expr = if self.match_token(TokenKind::LeftBracket) {
                let expr = self.expression()?;
                self.expect(TokenKind::RightBracket, "']'")?;
                Some(Box::new(expr))
            } else {
                None
            };
            path.push(VarRef {
                var_name,
                array_expr,
            });
            if !self.match_token(TokenKind::Dot) {
                break;
            }
        }
        Ok(path)
    }
}
