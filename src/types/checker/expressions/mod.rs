//! Expression checking modules.

mod calls;
mod operators;
mod variables;

use crate::ast::*;
use crate::error::StaticError;
use crate::lexer::{Token, TokenKind};

use super::{TypeChecker, TypeResult};

impl TypeChecker {
    /// Infer the type of an expression chain.
    pub(crate) fn check_expr(&mut self, expr: &mut Expr) -> TypeResult<DataType> {
        let first = self.check_term(&mut expr.first)?;

        let ty = match &mut expr.rest {
            Some((operator, rest)) => {
                let rhs = self.check_expr(rest)?;
                Self::check_binary(operator, &first, &rhs)?
            }
            None => first,
        };

        if expr.negated {
            if !ty.is_scalar("bool") {
                return Err(StaticError::mismatch("bool", ty.to_string(), expr.span()));
            }
            return Ok(DataType::scalar("bool"));
        }
        Ok(ty)
    }

    fn check_term(&mut self, term: &mut Term) -> TypeResult<DataType> {
        match term {
            Term::Simple(rvalue) => self.check_rvalue(rvalue),
            Term::Complex(expr) => self.check_expr(expr),
        }
    }

    fn check_rvalue(&mut self, rvalue: &mut RValue) -> TypeResult<DataType> {
        match rvalue {
            RValue::Simple(token) => Ok(Self::literal_type(token)),
            RValue::New(new) => self.check_new(new),
            RValue::Var(path) => self.resolve_path(path),
            RValue::Call(call) => self.check_call(call),
        }
    }

    fn literal_type(token: &Token) -> DataType {
        let name = match token.kind {
            TokenKind::IntLiteral => "int",
            TokenKind::DoubleLiteral => "double",
            TokenKind::CharLiteral => "char",
            TokenKind::StringLiteral => "string",
            TokenKind::BoolLiteral => "bool",
            _ => "void",
        };
        DataType::scalar(name)
    }

    /// `new S` needs a struct; `new T[n]` needs an element type and an int length.
    fn check_new(&mut self, new: &mut NewRValue) -> TypeResult<DataType> {
        let name = new.type_name.lexeme.clone();
        let span = new.type_name.span;

        match &mut new.array_expr {
            Some(length) => {
                let element = DataType::scalar(name.clone());
                if !element.is_base() && self.env.get_struct(&name).is_none() {
                    return Err(StaticError::UndefinedType(name, span));
                }
                let length_type = self.check_expr(length)?;
                if !length_type.is_scalar("int") {
                    return Err(StaticError::mismatch(
                        "int",
                        length_type.to_string(),
                        length.span(),
                    ));
                }
                Ok(DataType::new(name, true))
            }
            None => {
                if self.env.get_struct(&name).is_none() {
                    return Err(StaticError::UndefinedType(name, span));
                }
                Ok(DataType::scalar(name))
            }
        }
    }
}
