//! Scoped symbol table and declaration tables for the checker.

use std::collections::HashMap;

use crate::ast::{DataType, FunDef, StructDef};

/// A function's parameter and return types.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub params: Vec<DataType>,
    pub return_type: DataType,
}

impl From<&FunDef> for FunctionSig {
    fn from(def: &FunDef) -> Self {
        Self {
            params: def.params.iter().map(|p| p.data_type.clone()).collect(),
            return_type: def.return_type.clone(),
        }
    }
}

/// A stack of variable scopes plus the struct and function tables.
#[derive(Debug, Clone, Default)]
pub struct TypeEnvironment {
    scopes: Vec<HashMap<String, DataType>>,
    structs: HashMap<String, StructDef>,
    functions: HashMap<String, FunctionSig>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            ..Default::default()
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn define(&mut self, name: impl Into<String>, ty: DataType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), ty);
        }
    }

    /// Look a variable up, innermost scope first.
    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }

    pub fn define_struct(&mut self, def: StructDef) {
        self.structs.insert(def.name().to_string(), def);
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn define_function(&mut self, name: impl Into<String>, sig: FunctionSig) {
        self.functions.insert(name.into(), sig);
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionSig> {
        self.functions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_shadow_and_pop() {
        let mut env = TypeEnvironment::new();
        env.define("x", DataType::scalar("int"));
        env.push_scope();
        assert!(!env.exists_in_current_scope("x"));
        env.define("x", DataType::scalar("string"));
        assert_eq!(env.get("x"), Some(&DataType::scalar("string")));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(&DataType::scalar("int")));
        assert!(env.exists_in_current_scope("x"));
        assert_eq!(env.get("y"), None);
    }
}
