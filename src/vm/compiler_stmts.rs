//! Statement compilation: declarations, assignments and control flow.

use crate::ast::*;

use super::compiler::{CompileResult, Compiler};
use super::opcode::Op;

impl Compiler {
    /// Compile a statement.
    pub fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match stmt {
            Stmt::VarDecl(decl) => self.compile_var_decl(decl),
            Stmt::Assign(assign) => self.compile_assign(assign),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::For(for_stmt) => self.compile_for(for_stmt),
            Stmt::Return(ret) => {
                self.compile_expr(&ret.expr)?;
                self.emit(Op::Ret, ret.span.line);
                Ok(())
            }
            Stmt::Call(call) => self.compile_call(call, false),
        }
    }

    fn compile_block(&mut self, stmts: &[Stmt]) -> CompileResult<()> {
        self.begin_scope();
        for stmt in stmts {
            self.compile_stmt(stmt)?;
        }
        self.end_scope();
        Ok(())
    }

    fn compile_var_decl(&mut self, decl: &VarDeclStmt) -> CompileResult<()> {
        let span = decl.var_def.var_name.span;
        self.compile_expr(&decl.expr)?;
        let slot = self.add_local(decl.var_def.name(), span)?;
        self.emit(Op::Store(slot), span.line);
        Ok(())
    }

    /// Lower `root[i].f.g[j] = expr`.
    ///
    /// A lone name is a direct store. Otherwise the root is loaded and each
    /// intermediate segment applies its own index (GETI) and then fetches
    /// the next field (GETF), stopping at the container of the final
    /// segment, which is written with SETF or, when indexed, SETI.
    fn compile_assign(&mut self, assign: &AssignStmt) -> CompileResult<()> {
        let span = assign.span();
        let line = span.line;
        let Some((root, last)) = assign.lvalue.first().zip(assign.lvalue.last()) else {
            return Ok(());
        };
        let slot = self.resolve_local(root.name(), root.var_name.span)?;

        if assign.lvalue.len() == 1 && !root.is_indexed() {
            self.compile_expr(&assign.expr)?;
            self.emit(Op::Store(slot), line);
            return Ok(());
        }

        self.emit(Op::Load(slot), line);
        let n = assign.lvalue.len();
        for i in 0..n - 1 {
            let segment = &assign.lvalue[i];
            if let Some(index) = &segment.array_expr {
                self.compile_expr(index)?;
                self.emit(Op::GetI, line);
            }
            if i + 2 < n || last.is_indexed() {
                let field = self.name_constant(assign.lvalue[i + 1].name(), line)?;
                self.emit(Op::GetF(field), line);
            }
        }

        match &last.array_expr {
            Some(index) => {
                self.compile_expr(index)?;
                self.compile_expr(&assign.expr)?;
                self.emit(Op::SetI, line);
            }
            None => {
                self.compile_expr(&assign.expr)?;
                let field = self.name_constant(last.name(), line)?;
                self.emit(Op::SetF(field), line);
            }
        }
        Ok(())
    }

    /// Each branch: condition, JMPF to the next branch, body, JMP to the
    /// end. All end jumps land on a single NOP after the else body.
    fn compile_if(&mut self, if_stmt: &IfStmt) -> CompileResult<()> {
        let mut end_jumps = Vec::new();

        for branch in std::iter::once(&if_stmt.if_part).chain(&if_stmt.else_ifs) {
            let line = branch.condition.span().line;
            self.compile_expr(&branch.condition)?;
            let next = self.emit_jump(Op::Jmpf(0), line);
            self.compile_block(&branch.stmts)?;
            end_jumps.push(self.emit_jump(Op::Jmp(0), line));
            let landing = self.emit_landing(line);
            self.patch_jump(next, landing);
        }

        self.compile_block(&if_stmt.else_stmts)?;

        let line = if_stmt.if_part.condition.span().line;
        let end = self.emit_landing(line);
        for jump in end_jumps {
            self.patch_jump(jump, end);
        }
        Ok(())
    }

    fn compile_while(&mut self, while_stmt: &WhileStmt) -> CompileResult<()> {
        let line = while_stmt.condition.span().line;
        let start = self.current_offset();
        self.compile_expr(&while_stmt.condition)?;
        let exit = self.emit_jump(Op::Jmpf(0), line);

        self.compile_block(&while_stmt.stmts)?;
        self.emit(Op::Jmp(start as u32), line);

        let landing = self.emit_landing(line);
        self.patch_jump(exit, landing);
        Ok(())
    }

    /// Like `while`, with the step emitted before the backward jump and
    /// the loop variable scoped to the whole loop.
    fn compile_for(&mut self, for_stmt: &ForStmt) -> CompileResult<()> {
        let line = for_stmt.var_decl.var_def.var_name.span.line;
        self.begin_scope();
        self.compile_var_decl(&for_stmt.var_decl)?;

        let start = self.current_offset();
        self.compile_expr(&for_stmt.condition)?;
        let exit = self.emit_jump(Op::Jmpf(0), line);

        self.compile_block(&for_stmt.stmts)?;
        self.compile_assign(&for_stmt.assign_stmt)?;
        self.emit(Op::Jmp(start as u32), line);

        let landing = self.emit_landing(line);
        self.patch_jump(exit, landing);
        self.end_scope();
        Ok(())
    }
}
