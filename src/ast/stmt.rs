//! Statement and definition AST nodes.

use crate::ast::expr::{CallExpr, Expr, VarRef};
use crate::ast::types::{DataType, VarDef};
use crate::lexer::Token;
use crate::span::Span;

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `T x = expr`
    VarDecl(VarDeclStmt),
    /// `x.y[0] = expr`
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    /// A bare call used as a statement.
    Call(CallExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub var_def: VarDef,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lvalue: Vec<VarRef>,
    pub expr: Expr,
}

impl AssignStmt {
    pub fn span(&self) -> Span {
        self.lvalue
            .first()
            .map(|v| v.var_name.span)
            .unwrap_or_default()
    }
}

/// A condition and the statements guarded by it.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicIf {
    pub condition: Expr,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub if_part: BasicIf,
    pub else_ifs: Vec<BasicIf>,
    pub else_stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub stmts: Vec<Stmt>,
}

/// `for (init; condition; step) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub var_decl: VarDeclStmt,
    pub condition: Expr,
    pub assign_stmt: AssignStmt,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub struct_name: Token,
    pub fields: Vec<VarDef>,
}

impl StructDef {
    pub fn name(&self) -> &str {
        &self.struct_name.lexeme
    }

    pub fn field(&self, name: &str) -> Option<&VarDef> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunDef {
    pub return_type: DataType,
    pub fun_name: Token,
    pub params: Vec<VarDef>,
    pub stmts: Vec<Stmt>,
}

impl FunDef {
    pub fn name(&self) -> &str {
        &self.fun_name.lexeme
    }
}

/// A complete program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub struct_defs: Vec<StructDef>,
    pub fun_defs: Vec<FunDef>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }
}
