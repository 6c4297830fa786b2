//! Struct and function definition checking.

use std::collections::HashSet;

use crate::ast::*;
use crate::error::StaticError;
use crate::types::builtins;
use crate::types::environment::FunctionSig;

use super::{TypeChecker, TypeResult};

impl TypeChecker {
    pub(crate) fn declare_struct(&mut self, def: &StructDef) -> TypeResult<()> {
        if self.env.get_struct(def.name()).is_some() {
            return Err(StaticError::Duplicate(
                def.name().to_string(),
                def.struct_name.span,
            ));
        }
        self.env.define_struct(def.clone());
        Ok(())
    }

    pub(crate) fn declare_function(&mut self, def: &FunDef) -> TypeResult<()> {
        let name = def.name();
        let span = def.fun_name.span;

        if builtins::is_builtin(name) {
            return Err(StaticError::general(
                format!("redefining built-in function '{}'", name),
                span,
            ));
        }
        if self.env.get_function(name).is_some() {
            return Err(StaticError::Duplicate(name.to_string(), span));
        }
        if name == "main" {
            if !def.return_type.is_void() {
                return Err(StaticError::general(
                    "main function must have void type",
                    span,
                ));
            }
            if !def.params.is_empty() {
                return Err(StaticError::general(
                    "main function cannot have parameters",
                    span,
                ));
            }
        }

        self.env.define_function(name, FunctionSig::from(def));
        Ok(())
    }

    pub(crate) fn check_struct_def(&mut self, def: &StructDef) -> TypeResult<()> {
        let mut seen = HashSet::new();
        for field in &def.fields {
            self.check_declared_type(&field.data_type, false, field.var_name.span)?;
            if !seen.insert(field.name()) {
                return Err(StaticError::Duplicate(
                    field.name().to_string(),
                    field.var_name.span,
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn check_fun_def(&mut self, def: &mut FunDef) -> TypeResult<()> {
        self.check_declared_type(&def.return_type, true, def.fun_name.span)?;

        self.env.push_scope();
        for param in &def.params {
            self.check_declared_type(&param.data_type, false, param.var_name.span)?;
            if self.env.exists_in_current_scope(param.name()) {
                return Err(StaticError::Duplicate(
                    param.name().to_string(),
                    param.var_name.span,
                ));
            }
            self.env.define(param.name(), param.data_type.clone());
        }

        self.current_return = Some(def.return_type.clone());
        let result = self.check_block(&mut def.stmts);
        self.current_return = None;
        self.env.pop_scope();
        result
    }
}
