//! AST-to-bytecode compiler.
//!
//! Walks each function once, emitting bytecode into its own `Chunk`.
//! Variables become slot indices assigned in declaration order; a block's
//! slots are released when it ends, so sibling blocks reuse them.

use std::collections::HashMap;

use crate::ast::{FunDef, Program};
use crate::error::CompileError;
use crate::span::Span;

use super::chunk::{Chunk, Constant, FunctionProto};
use super::opcode::Op;
use super::vm::Vm;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// A local variable tracked during compilation.
#[derive(Debug, Clone)]
pub struct Local {
    pub name: String,
    pub depth: usize,
}

/// The compiler: transforms a checked AST into per-function bytecode.
pub struct Compiler {
    /// The function prototype being built.
    pub proto: FunctionProto,
    /// Local variables in scope; a local's index is its slot.
    pub locals: Vec<Local>,
    /// Current block nesting depth (0 = function parameters).
    pub scope_depth: usize,
    /// Field names of each struct, in declaration order.
    pub structs: HashMap<String, Vec<String>>,
}

/// Lower a checked program into a ready-to-run VM.
pub fn generate(program: &Program) -> CompileResult<Vm> {
    Ok(Vm::new(Compiler::compile(program)?))
}

impl Compiler {
    pub fn new(structs: HashMap<String, Vec<String>>) -> Self {
        Self {
            proto: FunctionProto::new("", 0),
            locals: Vec::new(),
            scope_depth: 0,
            structs,
        }
    }

    /// Compile every function of a program, in definition order.
    pub fn compile(program: &Program) -> CompileResult<Vec<FunctionProto>> {
        let structs = program
            .struct_defs
            .iter()
            .map(|def| {
                let fields = def.fields.iter().map(|f| f.name().to_string()).collect();
                (def.name().to_string(), fields)
            })
            .collect();

        let mut compiler = Compiler::new(structs);
        program
            .fun_defs
            .iter()
            .map(|def| compiler.compile_function(def))
            .collect()
    }

    /// Compile one function: a prologue storing each argument into its
    /// parameter slot, the body, and a guaranteed trailing return.
    pub fn compile_function(&mut self, def: &FunDef) -> CompileResult<FunctionProto> {
        self.proto = FunctionProto::new(def.name(), def.params.len());
        self.locals.clear();
        self.scope_depth = 0;

        let line = def.fun_name.span.line;
        for param in &def.params {
            let slot = self.add_local(param.name(), param.var_name.span)?;
            self.emit(Op::Store(slot), line);
        }

        for stmt in &def.stmts {
            self.compile_stmt(stmt)?;
        }

        if self.proto.chunk.code.last() != Some(&Op::Ret) {
            self.emit_constant(Constant::Null, line)?;
            self.emit(Op::Ret, line);
        }

        Ok(std::mem::replace(
            &mut self.proto,
            FunctionProto::new("", 0),
        ))
    }

    // --- Chunk helpers ---

    pub fn chunk(&mut self) -> &mut Chunk {
        &mut self.proto.chunk
    }

    pub fn emit(&mut self, op: Op, line: usize) -> usize {
        self.proto.chunk.emit(op, line)
    }

    pub fn emit_constant(&mut self, constant: Constant, line: usize) -> CompileResult<()> {
        let idx = self.add_constant(constant, line)?;
        self.emit(Op::Push(idx), line);
        Ok(())
    }

    pub fn add_constant(&mut self, constant: Constant, line: usize) -> CompileResult<u16> {
        if self.proto.chunk.constants.len() >= u16::MAX as usize {
            return Err(CompileError::new(
                format!("too many constants in '{}'", self.proto.name),
                Span::new(line, 1),
            ));
        }
        Ok(self.chunk().add_constant(constant))
    }

    /// A name operand (function, field or type name).
    pub fn name_constant(&mut self, name: &str, line: usize) -> CompileResult<u16> {
        self.add_constant(Constant::Str(name.to_string()), line)
    }

    pub fn current_offset(&self) -> usize {
        self.proto.chunk.len()
    }

    /// Emit a jump whose target is filled in later by `patch_jump`.
    pub fn emit_jump(&mut self, op: Op, line: usize) -> usize {
        self.emit(op, line)
    }

    /// Emit a NOP landing pad and return its offset.
    pub fn emit_landing(&mut self, line: usize) -> usize {
        self.emit(Op::Nop, line)
    }

    pub fn patch_jump(&mut self, offset: usize, target: usize) {
        self.proto.chunk.patch_jump(offset, target);
    }

    // --- Scope management ---

    pub fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Release the slots of locals declared in the closing block.
    pub fn end_scope(&mut self) {
        self.scope_depth -= 1;
        while let Some(local) = self.locals.last() {
            if local.depth <= self.scope_depth {
                break;
            }
            self.locals.pop();
        }
    }

    // --- Local variables ---

    /// Declare a local in the current block and return its slot.
    pub fn add_local(&mut self, name: &str, span: Span) -> CompileResult<u16> {
        let slot = self.locals.len();
        if slot > u16::MAX as usize {
            return Err(CompileError::new("too many local variables", span));
        }
        self.locals.push(Local {
            name: name.to_string(),
            depth: self.scope_depth,
        });
        Ok(slot as u16)
    }

    pub fn resolve_local(&self, name: &str, span: Span) -> CompileResult<u16> {
        self.locals
            .iter()
            .rposition(|local| local.name == name)
            .map(|i| i as u16)
            .ok_or_else(|| CompileError::new(format!("undefined variable '{}'", name), span))
    }
}
