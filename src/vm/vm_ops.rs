//! Arithmetic, comparison and conversion helpers for the VM.

use super::fault::{Fault, VmResult};
use super::opcode::Op;
use super::value::Value;
use super::vm::Vm;

impl Vm {
    /// Apply ADD/SUB/MUL/DIV to two non-null operands of the same type.
    pub(crate) fn op_arith(&self, op: Op, left: Value, right: Value) -> VmResult<Value> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                let n = match op {
                    Op::Add => a.wrapping_add(b),
                    Op::Sub => a.wrapping_sub(b),
                    Op::Mul => a.wrapping_mul(b),
                    Op::Div => {
                        if b == 0 {
                            return Err(Fault::DivisionByZero);
                        }
                        a.wrapping_div(b)
                    }
                    _ => return Err(Fault::General(format!("{} is not arithmetic", op.mnemonic()))),
                };
                Ok(Value::Int(n))
            }
            (Value::Double(a), Value::Double(b)) => {
                let d = match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                    Op::Div => a / b,
                    _ => return Err(Fault::General(format!("{} is not arithmetic", op.mnemonic()))),
                };
                Ok(Value::Double(d))
            }
            (Value::Int(_), other) => Err(Fault::mismatch("int", &other)),
            (Value::Double(_), other) => Err(Fault::mismatch("double", &other)),
            (other, _) => Err(Fault::mismatch("int or double", &other)),
        }
    }

    /// Apply CMPLT/CMPLE/CMPGT/CMPGE to two non-null operands of the same type.
    pub(crate) fn op_compare(&self, op: Op, left: &Value, right: &Value) -> VmResult<bool> {
        let ordering = match (left, right) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Object(_), _) => return Err(Fault::mismatch("comparable value", left)),
            _ => return Err(Fault::mismatch(left.type_name(), right)),
        };
        // NaN compares false everywhere.
        let Some(ordering) = ordering else {
            return Ok(false);
        };
        Ok(match op {
            Op::CmpLt => ordering.is_lt(),
            Op::CmpLe => ordering.is_le(),
            Op::CmpGt => ordering.is_gt(),
            Op::CmpGe => ordering.is_ge(),
            _ => return Err(Fault::General(format!("{} is not relational", op.mnemonic()))),
        })
    }

    pub(crate) fn to_int(value: Value) -> VmResult<Value> {
        match value {
            Value::Int(n) => Ok(Value::Int(n)),
            Value::Double(d) => Ok(Value::Int(d.trunc() as i64)),
            Value::Bool(b) => Ok(Value::Int(b as i64)),
            Value::Str(s) => parse_int_prefix(&s)
                .map(Value::Int)
                .ok_or(Fault::Conversion {
                    value: s,
                    target: "int",
                }),
            other => Err(Fault::Conversion {
                value: other.to_string(),
                target: "int",
            }),
        }
    }

    pub(crate) fn to_double(value: Value) -> VmResult<Value> {
        match value {
            Value::Int(n) => Ok(Value::Double(n as f64)),
            Value::Double(d) => Ok(Value::Double(d)),
            Value::Bool(b) => Ok(Value::Double(if b { 1.0 } else { 0.0 })),
            Value::Str(s) => parse_double_prefix(&s)
                .map(Value::Double)
                .ok_or(Fault::Conversion {
                    value: s,
                    target: "double",
                }),
            other => Err(Fault::Conversion {
                value: other.to_string(),
                target: "double",
            }),
        }
    }
}

/// Length of an optional sign followed by ASCII digits, or 0 if there are
/// no digits.
fn int_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        0
    } else {
        sign + digits
    }
}

/// Parse the leading integer of `s` after leading whitespace ("42abc" is 42).
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let len = int_prefix_len(s);
    if len == 0 {
        return None;
    }
    s[..len].parse().ok()
}

/// Parse the leading decimal number of `s` after leading whitespace
/// ("3.5kg" is 3.5, "7" is 7.0).
pub(crate) fn parse_double_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut len = int_prefix_len(s);
    if len == 0 {
        return None;
    }
    let rest = &s.as_bytes()[len..];
    if rest.first() == Some(&b'.') {
        let fraction = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if fraction > 0 {
            len += 1 + fraction;
        }
    }
    s[..len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix(" -7xyz"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn test_parse_double_prefix() {
        assert_eq!(parse_double_prefix("3.25"), Some(3.25));
        assert_eq!(parse_double_prefix("7"), Some(7.0));
        assert_eq!(parse_double_prefix("2.5kg"), Some(2.5));
        assert_eq!(parse_double_prefix("5."), Some(5.0));
        assert_eq!(parse_double_prefix(".5"), None);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Vm::to_int(Value::Double(3.9)), Ok(Value::Int(3)));
        assert_eq!(Vm::to_int(Value::Double(-3.9)), Ok(Value::Int(-3)));
        assert_eq!(Vm::to_int(Value::Bool(true)), Ok(Value::Int(1)));
        assert_eq!(Vm::to_double(Value::Int(2)), Ok(Value::Double(2.0)));
        assert_eq!(
            Vm::to_int(Value::Str("x1".into())),
            Err(Fault::Conversion {
                value: "x1".into(),
                target: "int"
            })
        );
    }

    #[test]
    fn test_arith_rules() {
        let vm = Vm::new(Vec::new());
        assert_eq!(
            vm.op_arith(Op::Add, Value::Int(i64::MAX), Value::Int(1)),
            Ok(Value::Int(i64::MIN))
        );
        assert_eq!(
            vm.op_arith(Op::Div, Value::Int(7), Value::Int(2)),
            Ok(Value::Int(3))
        );
        assert_eq!(
            vm.op_arith(Op::Div, Value::Int(1), Value::Int(0)),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            vm.op_arith(Op::Mul, Value::Double(1.5), Value::Double(2.0)),
            Ok(Value::Double(3.0))
        );
        assert!(vm.op_arith(Op::Add, Value::Int(1), Value::Double(1.0)).is_err());
    }

    #[test]
    fn test_compare_rules() {
        let vm = Vm::new(Vec::new());
        assert_eq!(
            vm.op_compare(Op::CmpLt, &Value::Str("a".into()), &Value::Str("b".into())),
            Ok(true)
        );
        assert_eq!(vm.op_compare(Op::CmpGe, &Value::Int(2), &Value::Int(2)), Ok(true));
        assert_eq!(
            vm.op_compare(Op::CmpGt, &Value::Bool(true), &Value::Bool(false)),
            Ok(true)
        );
        assert!(vm.op_compare(Op::CmpLt, &Value::Int(1), &Value::Double(2.0)).is_err());
    }
}
