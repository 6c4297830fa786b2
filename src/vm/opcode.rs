//! Bytecode opcodes for the MyPL VM.
//!
//! Operands that name something (functions, fields, list element types)
//! or carry a literal are indices into the chunk's constant pool.

/// A single bytecode instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // --- Stack & slots ---
    /// Push a constant from the constant pool onto the stack.
    Push(u16),
    /// Pop the top value off the stack.
    Pop,
    /// Push the value of a local variable slot.
    Load(u16),
    /// Pop into a local variable slot, growing the slots if needed.
    Store(u16),
    /// Duplicate the top of the stack.
    Dup,

    // --- Arithmetic & logic ---
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Not,

    // --- Comparison ---
    CmpLt,
    CmpLe,
    CmpGt,
    CmpGe,
    CmpEq,
    CmpNe,

    // --- Control flow ---
    /// Jump to an absolute instruction index.
    Jmp(u32),
    /// Pop a bool and jump to an absolute instruction index if it is false.
    Jmpf(u32),
    /// Call a function by name constant.
    Call(u16),
    /// Return the top of the stack to the caller.
    Ret,
    /// No-op; lands jumps.
    Nop,

    // --- I/O & conversions ---
    Write,
    Read,
    /// Length of a value's textual form.
    Slen,
    /// Length of an array.
    Alen,
    /// Pop a string then an index; push the character at that index.
    Getc,
    ToInt,
    ToDbl,
    ToStr,
    Concat,

    // --- Structs ---
    AllocS,
    /// Add a null field (name constant) to the popped struct.
    AddF(u16),
    /// Pop a value then a struct and set the named field.
    SetF(u16),
    /// Pop a struct and push the named field.
    GetF(u16),

    // --- Arrays ---
    /// Pop a fill value then a length; push a new array.
    AllocA,
    /// Pop value, index, array; store the element.
    SetI,
    /// Pop index, array; push the element.
    GetI,

    // --- Lists ---
    AllocL,
    /// Pop a list and append a null element.
    AddLI,
    /// Pop a value then a list and overwrite the last element.
    SetLE,
    /// Pop value, index, list; store the element.
    SetLI,
    /// Pop index, list; push the element.
    GetLI,
    /// Pop a list and remove its last element.
    LRmb,
    LSize,
    LNumI,
    LNumD,
    LNumS,
    LNumB,
    LAvgI,
    LAvgD,
    /// Pop index, list; push the element at the index clamped to the last
    /// element, checked against the element type constant.
    LRetrieve(u16),
}

impl Op {
    /// The instruction mnemonic used in bytecode dumps.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Push(_) => "PUSH",
            Op::Pop => "POP",
            Op::Load(_) => "LOAD",
            Op::Store(_) => "STORE",
            Op::Dup => "DUP",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
            Op::CmpLt => "CMPLT",
            Op::CmpLe => "CMPLE",
            Op::CmpGt => "CMPGT",
            Op::CmpGe => "CMPGE",
            Op::CmpEq => "CMPEQ",
            Op::CmpNe => "CMPNE",
            Op::Jmp(_) => "JMP",
            Op::Jmpf(_) => "JMPF",
            Op::Call(_) => "CALL",
            Op::Ret => "RET",
            Op::Nop => "NOP",
            Op::Write => "WRITE",
            Op::Read => "READ",
            Op::Slen => "SLEN",
            Op::Alen => "ALEN",
            Op::Getc => "GETC",
            Op::ToInt => "TOINT",
            Op::ToDbl => "TODBL",
            Op::ToStr => "TOSTR",
            Op::Concat => "CONCAT",
            Op::AllocS => "ALLOCS",
            Op::AddF(_) => "ADDF",
            Op::SetF(_) => "SETF",
            Op::GetF(_) => "GETF",
            Op::AllocA => "ALLOCA",
            Op::SetI => "SETI",
            Op::GetI => "GETI",
            Op::AllocL => "ALLOCL",
            Op::AddLI => "ADDLI",
            Op::SetLE => "SETLE",
            Op::SetLI => "SETLI",
            Op::GetLI => "GETLI",
            Op::LRmb => "LRMB",
            Op::LSize => "LSIZE",
            Op::LNumI => "LNUMI",
            Op::LNumD => "LNUMD",
            Op::LNumS => "LNUMS",
            Op::LNumB => "LNUMB",
            Op::LAvgI => "LAVGI",
            Op::LAvgD => "LAVGD",
            Op::LRetrieve(_) => "LRETRIEVE",
        }
    }
}
