//! Failures raised while executing one instruction, before the VM
//! attaches the instruction's location.

use crate::error::{Location, RuntimeError};

use super::value::Value;

pub(crate) type VmResult<T> = Result<T, Fault>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fault {
    NullReference,
    DivisionByZero,
    IndexOutOfBounds { kind: &'static str, index: i64 },
    Conversion { value: String, target: &'static str },
    UnknownFunction(String),
    TypeMismatch { expected: String, found: String },
    General(String),
}

impl Fault {
    pub(crate) fn mismatch(expected: impl Into<String>, found: &Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.type_name().to_string(),
        }
    }

    pub(crate) fn at(self, location: Location) -> RuntimeError {
        match self {
            Fault::NullReference => RuntimeError::NullReference(location),
            Fault::DivisionByZero => RuntimeError::DivisionByZero(location),
            Fault::IndexOutOfBounds { kind, index } => RuntimeError::IndexOutOfBounds {
                kind,
                index,
                location,
            },
            Fault::Conversion { value, target } => RuntimeError::Conversion {
                value,
                target,
                location,
            },
            Fault::UnknownFunction(name) => RuntimeError::UnknownFunction { name, location },
            Fault::TypeMismatch { expected, found } => RuntimeError::TypeMismatch {
                expected,
                found,
                location,
            },
            Fault::General(message) => RuntimeError::General { message, location },
        }
    }
}
