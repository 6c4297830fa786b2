//! Built-in and user function call checking.

use crate::ast::*;
use crate::error::StaticError;
use crate::span::Span;
use crate::types::builtins::{self, ARRAY_LENGTH};

use super::{TypeChecker, TypeResult};

impl TypeChecker {
    /// Check a call and return its result type.
    pub(crate) fn check_call(&mut self, call: &mut CallExpr) -> TypeResult<DataType> {
        let name = call.name().to_string();
        let span = call.fun_name.span;

        if let Some(element) = builtins::retrieve_element_type(&name) {
            let element = DataType::scalar(element);
            let args = self.check_args(call, 2)?;
            Self::expect_arg(&args[0], |t| t.is_scalar("list"), "list", span)?;
            Self::expect_arg(&args[1], |t| t.is_scalar("int"), "int", span)?;
            if !element.is_base() && self.env.get_struct(&element.type_name).is_none() {
                return Err(StaticError::UndefinedType(element.type_name, span));
            }
            return Ok(element);
        }

        let base = |t: &DataType| t.is_base() && !t.is_array;
        let list = |t: &DataType| t.is_scalar("list");
        let int = |t: &DataType| t.is_scalar("int");
        let string = |t: &DataType| t.is_scalar("string");

        let result = match name.as_str() {
            "print" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(&args[0], base, "base type", span)?;
                "void"
            }
            "input" => {
                self.check_args(call, 0)?;
                "string"
            }
            "to_string" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(
                    &args[0],
                    |t| base(t) && t.type_name != "bool",
                    "non-bool base type",
                    span,
                )?;
                "string"
            }
            "to_int" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(
                    &args[0],
                    |t| base(t) && t.type_name != "int",
                    "non-int base type",
                    span,
                )?;
                "int"
            }
            "to_double" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(
                    &args[0],
                    |t| base(t) && t.type_name != "double",
                    "non-double base type",
                    span,
                )?;
                "double"
            }
            "length" => {
                let args = self.check_args(call, 1)?;
                if args[0].is_array {
                    call.fun_name.lexeme = ARRAY_LENGTH.to_string();
                } else {
                    Self::expect_arg(&args[0], string, "string or array", span)?;
                }
                "int"
            }
            "get" => {
                let args = self.check_args(call, 2)?;
                Self::expect_arg(&args[0], int, "int", span)?;
                Self::expect_arg(&args[1], string, "string", span)?;
                "char"
            }
            "concat" => {
                let args = self.check_args(call, 2)?;
                Self::expect_arg(&args[0], string, "string", span)?;
                Self::expect_arg(&args[1], string, "string", span)?;
                "string"
            }
            "list_create" => {
                self.check_args(call, 0)?;
                "list"
            }
            "list_add" => {
                let args = self.check_args(call, 2)?;
                Self::expect_arg(&args[0], list, "list", span)?;
                "void"
            }
            "list_rmb" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(&args[0], list, "list", span)?;
                "void"
            }
            "list_change" => {
                let args = self.check_args(call, 3)?;
                Self::expect_arg(&args[0], list, "list", span)?;
                Self::expect_arg(&args[1], int, "int", span)?;
                "void"
            }
            "list_numi" | "list_numd" | "list_nums" | "list_numb" | "list_size"
            | "list_avgi" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(&args[0], list, "list", span)?;
                "int"
            }
            "list_avgd" => {
                let args = self.check_args(call, 1)?;
                Self::expect_arg(&args[0], list, "list", span)?;
                "double"
            }
            _ => return self.check_user_call(call),
        };

        Ok(DataType::scalar(result))
    }

    fn check_user_call(&mut self, call: &mut CallExpr) -> TypeResult<DataType> {
        let span = call.fun_name.span;
        let sig = self
            .env
            .get_function(call.name())
            .cloned()
            .ok_or_else(|| StaticError::UndefinedFunction(call.name().to_string(), span))?;

        let args = self.check_args(call, sig.params.len())?;
        for (param, arg) in sig.params.iter().zip(&args) {
            if !Self::accepts(param, arg) {
                return Err(StaticError::mismatch(
                    param.to_string(),
                    arg.to_string(),
                    span,
                ));
            }
        }
        Ok(sig.return_type)
    }

    /// Check the argument count, then infer each argument's type.
    fn check_args(&mut self, call: &mut CallExpr, expected: usize) -> TypeResult<Vec<DataType>> {
        if call.args.len() != expected {
            return Err(StaticError::WrongArity {
                name: call.name().to_string(),
                expected,
                got: call.args.len(),
                span: call.fun_name.span,
            });
        }
        call.args
            .iter_mut()
            .map(|arg| self.check_expr(arg))
            .collect()
    }

    fn expect_arg(
        actual: &DataType,
        accepts: impl Fn(&DataType) -> bool,
        expected: &str,
        span: Span,
    ) -> TypeResult<()> {
        if accepts(actual) {
            Ok(())
        } else {
            Err(StaticError::mismatch(expected, actual.to_string(), span))
        }
    }
}
