//! Expression compilation: operator chains, literals, allocation, variable
//! paths and calls.

use crate::ast::*;
use crate::error::CompileError;
use crate::lexer::{Token, TokenKind};
use crate::types::builtins::{self, ARRAY_LENGTH};

use super::chunk::Constant;
use super::compiler::{CompileResult, Compiler};
use super::opcode::Op;

impl Compiler {
    /// Compile an expression chain: first term, then the rest of the chain,
    /// then the operator, so the right operand ends up on top.
    pub fn compile_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        self.compile_term(&expr.first)?;

        if let Some((operator, rest)) = &expr.rest {
            self.compile_expr(rest)?;
            self.emit(binary_op(operator.op), operator.span.line);
        }

        if expr.negated {
            self.emit(Op::Not, expr.span().line);
        }
        Ok(())
    }

    fn compile_term(&mut self, term: &Term) -> CompileResult<()> {
        match term {
            Term::Simple(rvalue) => self.compile_rvalue(rvalue),
            Term::Complex(expr) => self.compile_expr(expr),
        }
    }

    fn compile_rvalue(&mut self, rvalue: &RValue) -> CompileResult<()> {
        match rvalue {
            RValue::Simple(token) => {
                let constant = literal_constant(token)?;
                self.emit_constant(constant, token.span.line)
            }
            RValue::New(new) => self.compile_new(new),
            RValue::Var(path) => self.compile_var_path(path),
            RValue::Call(call) => self.compile_call(call, true),
        }
    }

    /// Arrays: length, null fill, ALLOCA. Structs: ALLOCS, then every field
    /// is added and explicitly set to null.
    fn compile_new(&mut self, new: &NewRValue) -> CompileResult<()> {
        let line = new.type_name.span.line;

        if let Some(length) = &new.array_expr {
            self.compile_expr(length)?;
            self.emit_constant(Constant::Null, line)?;
            self.emit(Op::AllocA, line);
            return Ok(());
        }

        let fields = self.structs.get(&new.type_name.lexeme).cloned().ok_or_else(|| {
            CompileError::new(
                format!("undefined struct '{}'", new.type_name.lexeme),
                new.type_name.span,
            )
        })?;

        self.emit(Op::AllocS, line);
        for field in &fields {
            let name = self.name_constant(field, line)?;
            self.emit(Op::Dup, line);
            self.emit(Op::AddF(name), line);
            self.emit(Op::Dup, line);
            self.emit_constant(Constant::Null, line)?;
            self.emit(Op::SetF(name), line);
        }
        Ok(())
    }

    /// Load the root, then per segment: GETF for fields after the root and
    /// GETI for indexed segments.
    fn compile_var_path(&mut self, path: &[VarRef]) -> CompileResult<()> {
        for (i, segment) in path.iter().enumerate() {
            let line = segment.var_name.span.line;
            if i == 0 {
                let slot = self.resolve_local(segment.name(), segment.var_name.span)?;
                self.emit(Op::Load(slot), line);
            } else {
                let field = self.name_constant(segment.name(), line)?;
                self.emit(Op::GetF(field), line);
            }
            if let Some(index) = &segment.array_expr {
                self.compile_expr(index)?;
                self.emit(Op::GetI, line);
            }
        }
        Ok(())
    }

    /// Compile a call. Built-ins become their dedicated instruction.
    ///
    /// In value position a call must leave exactly one value; as a
    /// statement it must leave none.
    pub fn compile_call(&mut self, call: &CallExpr, want_value: bool) -> CompileResult<()> {
        let name = call.name();
        let line = call.fun_name.span.line;

        if name == "list_add" {
            // Append a null placeholder, then overwrite it with the value.
            let [list, value] = call.args.as_slice() else {
                return Err(CompileError::new(
                    "list_add expects a list and a value",
                    call.fun_name.span,
                ));
            };
            self.compile_expr(list)?;
            self.emit(Op::Dup, line);
            self.emit(Op::AddLI, line);
            self.compile_expr(value)?;
            self.emit(Op::SetLE, line);
        } else {
            for arg in &call.args {
                self.compile_expr(arg)?;
            }
            let op = match builtin_op(name) {
                Some(op) => op,
                None => match builtins::retrieve_element_type(name) {
                    Some(element) => Op::LRetrieve(self.name_constant(element, line)?),
                    None => Op::Call(self.name_constant(name, line)?),
                },
            };
            self.emit(op, line);
        }

        let leaves_value = !builtins::is_void_builtin(name);
        if want_value && !leaves_value {
            self.emit_constant(Constant::Null, line)?;
        } else if !want_value && leaves_value {
            self.emit(Op::Pop, line);
        }
        Ok(())
    }
}

fn binary_op(op: BinaryOp) -> Op {
    match op {
        BinaryOp::Add => Op::Add,
        BinaryOp::Subtract => Op::Sub,
        BinaryOp::Multiply => Op::Mul,
        BinaryOp::Divide => Op::Div,
        BinaryOp::And => Op::And,
        BinaryOp::Or => Op::Or,
        BinaryOp::Equal => Op::CmpEq,
        BinaryOp::NotEqual => Op::CmpNe,
        BinaryOp::Less => Op::CmpLt,
        BinaryOp::LessEqual => Op::CmpLe,
        BinaryOp::Greater => Op::CmpGt,
        BinaryOp::GreaterEqual => Op::CmpGe,
    }
}

/// Built-ins that map onto a single operand-free instruction.
fn builtin_op(name: &str) -> Option<Op> {
    let op = match name {
        "print" => Op::Write,
        "input" => Op::Read,
        "to_string" => Op::ToStr,
        "to_int" => Op::ToInt,
        "to_double" => Op::ToDbl,
        "concat" => Op::Concat,
        "length" => Op::Slen,
        ARRAY_LENGTH => Op::Alen,
        "get" => Op::Getc,
        "list_create" => Op::AllocL,
        "list_numi" => Op::LNumI,
        "list_numd" => Op::LNumD,
        "list_nums" => Op::LNumS,
        "list_numb" => Op::LNumB,
        "list_rmb" => Op::LRmb,
        "list_avgi" => Op::LAvgI,
        "list_avgd" => Op::LAvgD,
        "list_change" => Op::SetLI,
        "list_size" => Op::LSize,
        _ => return None,
    };
    Some(op)
}

fn literal_constant(token: &Token) -> CompileResult<Constant> {
    let invalid = || CompileError::new(format!("invalid literal '{}'", token.lexeme), token.span);
    match token.kind {
        TokenKind::IntLiteral => token.lexeme.parse().map(Constant::Int).map_err(|_| invalid()),
        TokenKind::DoubleLiteral => token
            .lexeme
            .parse()
            .map(Constant::Double)
            .map_err(|_| invalid()),
        TokenKind::BoolLiteral => Ok(Constant::Bool(token.lexeme == "true")),
        TokenKind::CharLiteral | TokenKind::StringLiteral => {
            Ok(Constant::Str(unescape(&token.lexeme)))
        }
        TokenKind::Null => Ok(Constant::Null),
        _ => Err(invalid()),
    }
}

/// Expand `\n` and `\t`; other backslashes are kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some('n')) => {
                out.push('\n');
                chars.next();
            }
            ('\\', Some('t')) => {
                out.push('\t');
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}
