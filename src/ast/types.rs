//! Declared types and variable definitions.

use crate::lexer::Token;

/// The five primitive value types.
pub const BASE_TYPES: [&str; 5] = ["int", "double", "bool", "char", "string"];

/// A static type: an element type name plus array-ness.
///
/// `type_name` is a base type, `void`, `list`, or a struct name. `list`
/// carries no element type; elements are checked when retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    pub is_array: bool,
    pub type_name: String,
}

impl DataType {
    pub fn new(type_name: impl Into<String>, is_array: bool) -> Self {
        Self {
            is_array,
            type_name: type_name.into(),
        }
    }

    /// A non-array type.
    pub fn scalar(type_name: impl Into<String>) -> Self {
        Self::new(type_name, false)
    }

    pub fn void() -> Self {
        Self::scalar("void")
    }

    pub fn is_void(&self) -> bool {
        !self.is_array && self.type_name == "void"
    }

    pub fn is_base(&self) -> bool {
        BASE_TYPES.contains(&self.type_name.as_str())
    }

    /// True for a non-array value of the given type name.
    pub fn is_scalar(&self, type_name: &str) -> bool {
        !self.is_array && self.type_name == type_name
    }

    /// The type of one element of this array type.
    pub fn element(&self) -> DataType {
        Self::scalar(self.type_name.clone())
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_array {
            write!(f, "array {}", self.type_name)
        } else {
            write!(f, "{}", self.type_name)
        }
    }
}

/// A declared variable, field, or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub var_name: Token,
    pub data_type: DataType,
}

impl VarDef {
    pub fn new(var_name: Token, data_type: DataType) -> Self {
        Self {
            var_name,
            data_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.var_name.lexeme
    }
}
