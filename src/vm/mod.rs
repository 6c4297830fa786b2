//! Bytecode VM for MyPL: compiles the checked AST to per-function bytecode
//! and executes it on a stack-based, frame-per-call machine.

pub mod chunk;
pub mod compiler;
pub mod compiler_exprs;
pub mod compiler_stmts;
pub mod disassembler;
pub(crate) mod fault;
pub mod opcode;
pub mod value;
#[allow(clippy::module_inception)]
pub mod vm;
pub mod vm_heap;
pub mod vm_ops;

pub use chunk::{Chunk, Constant, FunctionProto};
pub use compiler::{generate, Compiler};
pub use disassembler::disassemble;
pub use opcode::Op;
pub use value::{ObjectId, Value};
pub use vm::{CallFrame, Vm, FIRST_OBJECT_ID};

impl Vm {
    /// Bytecode listing of every function, in definition order.
    pub fn dump_ir(&self) -> String {
        self.functions
            .values()
            .map(|proto| disassemble(proto))
            .collect()
    }
}
