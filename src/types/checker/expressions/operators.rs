//! Binary operator checking.

use crate::ast::*;
use crate::error::StaticError;

use super::{TypeChecker, TypeResult};

impl TypeChecker {
    pub(crate) fn check_binary(
        operator: &Operator,
        lhs: &DataType,
        rhs: &DataType,
    ) -> TypeResult<DataType> {
        let op = operator.op;
        let same_scalar = lhs == rhs && !lhs.is_array;
        let name = lhs.type_name.as_str();

        let result = if op.is_arithmetic() {
            (same_scalar && matches!(name, "int" | "double")).then(|| lhs.clone())
        } else if op.is_equality() {
            (lhs == rhs || lhs.is_void() || rhs.is_void()).then(|| DataType::scalar("bool"))
        } else if op.is_relational() {
            (same_scalar && matches!(name, "int" | "double" | "char" | "string"))
                .then(|| DataType::scalar("bool"))
        } else {
            (lhs.is_scalar("bool") && rhs.is_scalar("bool")).then(|| DataType::scalar("bool"))
        };

        result.ok_or_else(|| {
            StaticError::general(
                format!(
                    "invalid operand types '{}' and '{}' for '{}'",
                    lhs, rhs, op
                ),
                operator.span,
            )
        })
    }
}
