//! Runtime values.

use std::fmt;

/// Handle into one of the VM heaps.
pub type ObjectId = i64;

/// A runtime value. `char` values are one-character strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Null,
    Object(ObjectId),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Null => "null",
            Value::Object(_) => "object",
        }
    }

    /// Whether this value may be retrieved as the named static type.
    pub fn matches_type(&self, type_name: &str) -> bool {
        match (self, type_name) {
            (Value::Null, _) => true,
            (Value::Int(_), "int") => true,
            (Value::Double(_), "double") => true,
            (Value::Bool(_), "bool") => true,
            (Value::Str(_), "string" | "char") => true,
            (Value::Object(_), name) => !crate::ast::BASE_TYPES.contains(&name),
            _ => false,
        }
    }
}

/// The canonical textual form: doubles with six decimals, null as empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{:.6}", d),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Null => Ok(()),
            Value::Object(id) => write!(f, "{}", id),
        }
    }
}
