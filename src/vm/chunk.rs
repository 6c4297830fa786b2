//! Bytecode chunk and function prototype types.

use super::opcode::Op;
use super::value::Value;

/// A constant value stored in a chunk's constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Double(f64),
    Bool(bool),
    /// String and char literals, and names used as operands.
    Str(String),
    Null,
}

impl Constant {
    pub fn to_value(&self) -> Value {
        match self {
            Constant::Int(n) => Value::Int(*n),
            Constant::Double(d) => Value::Double(*d),
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Str(s) => Value::Str(s.clone()),
            Constant::Null => Value::Null,
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(n) => write!(f, "{}", n),
            Constant::Double(d) => write!(f, "{:.6}", d),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Null => f.write_str("null"),
        }
    }
}

/// A compiled function.
#[derive(Debug, Clone)]
pub struct FunctionProto {
    pub name: String,
    /// Number of parameters.
    pub arity: usize,
    /// The bytecode instructions.
    pub chunk: Chunk,
}

impl FunctionProto {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            chunk: Chunk::new(),
        }
    }
}

/// A chunk of bytecode: instructions + constant pool + line info.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The bytecode instructions.
    pub code: Vec<Op>,
    /// Source line numbers, parallel to `code`.
    pub lines: Vec<usize>,
    /// Constant pool.
    pub constants: Vec<Constant>,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            lines: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Emit an instruction and record its source line.
    pub fn emit(&mut self, op: Op, line: usize) -> usize {
        let offset = self.code.len();
        self.code.push(op);
        self.lines.push(line);
        offset
    }

    /// Add a constant to the pool and return its index.
    pub fn add_constant(&mut self, constant: Constant) -> u16 {
        // Names and repeated literals share one slot.
        if let Some(i) = self.constants.iter().position(|c| *c == constant) {
            return i as u16;
        }
        let idx = self.constants.len();
        self.constants.push(constant);
        idx as u16
    }

    pub fn constant(&self, idx: u16) -> Option<&Constant> {
        self.constants.get(idx as usize)
    }

    /// A name operand (function, field or type name).
    pub fn name(&self, idx: u16) -> Option<&str> {
        match self.constant(idx) {
            Some(Constant::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Get the current offset (next instruction index).
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Point the jump at `offset` to the absolute index `target`.
    pub fn patch_jump(&mut self, offset: usize, target: usize) {
        let target = target as u32;
        match &mut self.code[offset] {
            Op::Jmp(t) | Op::Jmpf(t) => {
                *t = target;
            }
            _ => panic!("Tried to patch non-jump instruction at offset {}", offset),
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}
