//! Statement checking.

use crate::ast::*;
use crate::error::StaticError;

use super::{TypeChecker, TypeResult};

impl TypeChecker {
    /// Check statements in the current scope.
    pub(crate) fn check_block(&mut self, stmts: &mut [Stmt]) -> TypeResult<()> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    /// Check statements in a fresh nested scope.
    fn check_scoped_block(&mut self, stmts: &mut [Stmt]) -> TypeResult<()> {
        self.env.push_scope();
        let result = self.check_block(stmts);
        self.env.pop_scope();
        result
    }

    pub(crate) fn check_stmt(&mut self, stmt: &mut Stmt) -> TypeResult<()> {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::Assign(assign) => self.check_assign(assign).map(|_| ()),

            Stmt::If(if_stmt) => {
                self.check_condition(&mut if_stmt.if_part.condition)?;
                self.check_scoped_block(&mut if_stmt.if_part.stmts)?;
                for else_if in &mut if_stmt.else_ifs {
                    self.check_condition(&mut else_if.condition)?;
                    self.check_scoped_block(&mut else_if.stmts)?;
                }
                self.check_scoped_block(&mut if_stmt.else_stmts)
            }

            Stmt::While(while_stmt) => {
                self.check_condition(&mut while_stmt.condition)?;
                self.check_scoped_block(&mut while_stmt.stmts)
            }

            Stmt::For(for_stmt) => {
                self.env.push_scope();
                let result = self.check_for(for_stmt);
                self.env.pop_scope();
                result
            }

            Stmt::Return(ret) => {
                let actual = self.check_expr(&mut ret.expr)?;
                let expected = self.current_return.clone().unwrap_or_else(DataType::void);
                if !Self::accepts(&expected, &actual) {
                    return Err(StaticError::mismatch(
                        expected.to_string(),
                        actual.to_string(),
                        ret.span,
                    ));
                }
                Ok(())
            }

            Stmt::Call(call) => self.check_call(call).map(|_| ()),
        }
    }

    fn check_var_decl(&mut self, decl: &mut VarDeclStmt) -> TypeResult<()> {
        let declared = decl.var_def.data_type.clone();
        let span = decl.var_def.var_name.span;
        let name = decl.var_def.name().to_string();

        let actual = self.check_expr(&mut decl.expr)?;
        self.check_declared_type(&declared, false, span)?;
        if self.env.exists_in_current_scope(&name) {
            return Err(StaticError::Duplicate(name, span));
        }
        if !Self::accepts(&declared, &actual) {
            return Err(StaticError::mismatch(
                declared.to_string(),
                actual.to_string(),
                decl.expr.span(),
            ));
        }

        self.env.define(name, declared);
        Ok(())
    }

    /// Returns the type of the assigned location.
    fn check_assign(&mut self, assign: &mut AssignStmt) -> TypeResult<DataType> {
        let target = self.resolve_path(&mut assign.lvalue)?;
        let actual = self.check_expr(&mut assign.expr)?;
        if !Self::accepts(&target, &actual) {
            return Err(StaticError::mismatch(
                target.to_string(),
                actual.to_string(),
                assign.expr.span(),
            ));
        }
        Ok(target)
    }

    /// The loop variable and its update must be ints.
    fn check_for(&mut self, for_stmt: &mut ForStmt) -> TypeResult<()> {
        self.check_var_decl(&mut for_stmt.var_decl)?;
        let int = DataType::scalar("int");
        let declared = &for_stmt.var_decl.var_def.data_type;
        if *declared != int {
            return Err(StaticError::mismatch(
                "int",
                declared.to_string(),
                for_stmt.var_decl.var_def.var_name.span,
            ));
        }

        self.check_condition(&mut for_stmt.condition)?;

        let target = self.check_assign(&mut for_stmt.assign_stmt)?;
        if target != int {
            return Err(StaticError::mismatch(
                "int",
                target.to_string(),
                for_stmt.assign_stmt.span(),
            ));
        }

        self.check_scoped_block(&mut for_stmt.stmts)
    }

    fn check_condition(&mut self, condition: &mut Expr) -> TypeResult<()> {
        let ty = self.check_expr(condition)?;
        if !ty.is_scalar("bool") {
            return Err(StaticError::mismatch(
                "bool",
                ty.to_string(),
                condition.span(),
            ));
        }
        Ok(())
    }
}
