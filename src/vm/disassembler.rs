//! Bytecode disassembler for the IR dump and error messages.

use super::chunk::{Chunk, FunctionProto};
use super::opcode::Op;

/// Disassemble a function: a `Frame '<name>'` header, then one
/// `  <index>: <MNEMONIC>(<operand>)` line per instruction.
pub fn disassemble(proto: &FunctionProto) -> String {
    let mut out = format!("\nFrame '{}'\n", proto.name);
    for (offset, op) in proto.chunk.code.iter().enumerate() {
        out.push_str(&format!("  {}: {}\n", offset, format_op(*op, &proto.chunk)));
    }
    out
}

/// Render one instruction, resolving constant-pool operands.
pub fn format_op(op: Op, chunk: &Chunk) -> String {
    let operand = match op {
        Op::Push(idx) => chunk
            .constant(idx)
            .map(|c| c.to_string())
            .unwrap_or_else(|| format!("#{}", idx)),
        Op::Call(idx) | Op::AddF(idx) | Op::SetF(idx) | Op::GetF(idx) | Op::LRetrieve(idx) => chunk
            .name(idx)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", idx)),
        Op::Load(slot) | Op::Store(slot) => slot.to_string(),
        Op::Jmp(target) | Op::Jmpf(target) => target.to_string(),
        _ => String::new(),
    };
    format!("{}({})", op.mnemonic(), operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::chunk::Constant;

    #[test]
    fn test_disassemble() {
        let mut proto = FunctionProto::new("main", 0);
        let one = proto.chunk.add_constant(Constant::Int(1));
        let text = proto.chunk.add_constant(Constant::Str("hi".into()));
        proto.chunk.emit(Op::Push(one), 1);
        proto.chunk.emit(Op::Write, 1);
        proto.chunk.emit(Op::Push(text), 1);
        proto.chunk.emit(Op::Jmpf(5), 1);
        proto.chunk.emit(Op::Call(text), 1);
        proto.chunk.emit(Op::Store(2), 1);

        assert_eq!(
            disassemble(&proto),
            "\nFrame 'main'\n  0: PUSH(1)\n  1: WRITE()\n  2: PUSH(\"hi\")\n  3: JMPF(5)\n  4: CALL(hi)\n  5: STORE(2)\n"
        );
    }
}
