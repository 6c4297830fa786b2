//! Abstract Syntax Tree for MyPL.

pub mod expr;
pub mod stmt;
pub mod types;

pub use expr::{BinaryOp, CallExpr, Expr, NewRValue, Operator, RValue, Term, VarRef};
pub use stmt::{
    AssignStmt, BasicIf, ForStmt, FunDef, IfStmt, Program, ReturnStmt, Stmt, StructDef,
    VarDeclStmt, WhileStmt,
};
pub use types::{DataType, VarDef, BASE_TYPES};
