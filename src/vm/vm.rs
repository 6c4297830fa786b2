//! The bytecode virtual machine: a frame-based stack interpreter.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::error::{Location, RuntimeError};

use super::chunk::{Chunk, FunctionProto};
use super::disassembler::format_op;
use super::fault::{Fault, VmResult};
use super::opcode::Op;
use super::value::{ObjectId, Value};

/// First id handed out by the allocator; ids are shared by all heaps.
pub const FIRST_OBJECT_ID: ObjectId = 2023;

/// Struct fields in declaration order.
pub type StructObject = IndexMap<String, Value, ahash::RandomState>;

/// One function activation.
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub proto: Rc<FunctionProto>,
    /// Instruction pointer (index into chunk.code).
    pub ip: usize,
    /// Operand stack.
    pub stack: Vec<Value>,
    /// Local variable slots.
    pub slots: Vec<Value>,
}

impl CallFrame {
    pub fn new(proto: Rc<FunctionProto>, stack: Vec<Value>) -> Self {
        Self {
            proto,
            ip: 0,
            stack,
            slots: Vec::new(),
        }
    }
}

/// The bytecode VM.
pub struct Vm {
    /// Compiled functions by name, in definition order.
    pub functions: IndexMap<String, Rc<FunctionProto>>,
    /// Call frame stack.
    pub frames: Vec<CallFrame>,
    pub struct_heap: AHashMap<ObjectId, StructObject>,
    pub array_heap: AHashMap<ObjectId, Vec<Value>>,
    pub list_heap: AHashMap<ObjectId, Vec<Value>>,
    next_object_id: ObjectId,
    /// Captured output; `None` writes to stdout.
    output: Option<String>,
    /// Scripted input lines; `None` reads stdin.
    input: Option<VecDeque<String>>,
    /// Print every executed instruction to stderr.
    trace: bool,
}

impl Vm {
    pub fn new(functions: Vec<FunctionProto>) -> Self {
        Self {
            functions: functions
                .into_iter()
                .map(|proto| (proto.name.clone(), Rc::new(proto)))
                .collect(),
            frames: Vec::with_capacity(64),
            struct_heap: AHashMap::new(),
            array_heap: AHashMap::new(),
            list_heap: AHashMap::new(),
            next_object_id: FIRST_OBJECT_ID,
            output: None,
            input: None,
            trace: false,
        }
    }

    /// Collect output in memory instead of writing to stdout.
    pub fn capture_output(&mut self) {
        self.output = Some(String::new());
    }

    /// Output collected since `capture_output`.
    pub fn output(&self) -> &str {
        self.output.as_deref().unwrap_or("")
    }

    /// Serve `input()` from these lines instead of stdin.
    pub fn set_input<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = Some(lines.into_iter().map(Into::into).collect());
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Execute `main` until the call stack empties.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let main = self
            .functions
            .get("main")
            .cloned()
            .ok_or(RuntimeError::MissingMain)?;
        self.frames.clear();
        self.frames.push(CallFrame::new(main, Vec::new()));

        while let Some(frame) = self.frames.last_mut() {
            let ip = frame.ip;
            let proto = Rc::clone(&frame.proto);
            let Some(&op) = proto.chunk.code.get(ip) else {
                break;
            };
            frame.ip += 1;

            if self.trace {
                self.trace_step(&proto, ip, op);
            }

            if let Err(fault) = self.execute(op, &proto.chunk) {
                self.frames.clear();
                return Err(fault.at(Location {
                    function: proto.name.clone(),
                    pc: ip,
                    instr: format_op(op, &proto.chunk),
                }));
            }
        }

        Ok(())
    }

    fn trace_step(&self, proto: &FunctionProto, ip: usize, op: Op) {
        let stack = self
            .frames
            .last()
            .map(|f| {
                f.stack
                    .iter()
                    .map(|v| format!("{:?}", v))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        eprintln!(
            "[trace] frame {} depth {} pc {}: {}  stack [{}]",
            proto.name,
            self.frames.len(),
            ip,
            format_op(op, &proto.chunk),
            stack
        );
    }

    fn execute(&mut self, op: Op, chunk: &Chunk) -> VmResult<()> {
        match op {
            // --- Stack & slots ---
            Op::Push(idx) => {
                let value = chunk
                    .constant(idx)
                    .map(|c| c.to_value())
                    .ok_or_else(|| Fault::General(format!("bad constant index {}", idx)))?;
                self.push(value);
            }
            Op::Pop => {
                self.pop()?;
            }
            Op::Load(slot) => {
                let value = self
                    .frame()
                    .slots
                    .get(slot as usize)
                    .cloned()
                    .ok_or_else(|| Fault::General(format!("uninitialized variable slot {}", slot)))?;
                self.push(value);
            }
            Op::Store(slot) => {
                let value = self.pop()?;
                let slots = &mut self.frame_mut().slots;
                let slot = slot as usize;
                if slot >= slots.len() {
                    slots.resize(slot + 1, Value::Null);
                }
                slots[slot] = value;
            }
            Op::Dup => {
                let value = self.peek()?.clone();
                self.push(value);
            }

            // --- Arithmetic & logic ---
            Op::Add | Op::Sub | Op::Mul | Op::Div => {
                let right = self.pop_non_null()?;
                let left = self.pop_non_null()?;
                let result = self.op_arith(op, left, right)?;
                self.push(result);
            }
            Op::And => {
                let right = self.pop_bool()?;
                let left = self.pop_bool()?;
                self.push(Value::Bool(left && right));
            }
            Op::Or => {
                let right = self.pop_bool()?;
                let left = self.pop_bool()?;
                self.push(Value::Bool(left || right));
            }
            Op::Not => {
                let value = self.pop_bool()?;
                self.push(Value::Bool(!value));
            }

            // --- Comparison ---
            Op::CmpEq | Op::CmpNe => {
                let right = self.pop()?;
                let left = self.pop()?;
                let equal = left == right;
                self.push(Value::Bool(if op == Op::CmpEq { equal } else { !equal }));
            }
            Op::CmpLt | Op::CmpLe | Op::CmpGt | Op::CmpGe => {
                let right = self.pop_non_null()?;
                let left = self.pop_non_null()?;
                let result = self.op_compare(op, &left, &right)?;
                self.push(Value::Bool(result));
            }

            // --- Control flow ---
            Op::Jmp(target) => {
                self.frame_mut().ip = target as usize;
            }
            Op::Jmpf(target) => {
                if !self.pop_bool()? {
                    self.frame_mut().ip = target as usize;
                }
            }
            Op::Call(idx) => {
                let name = Self::name_operand(chunk, idx)?;
                self.call(name)?;
            }
            Op::Ret => {
                let value = self.pop()?;
                self.frames.pop();
                if let Some(caller) = self.frames.last_mut() {
                    caller.stack.push(value);
                }
            }
            Op::Nop => {}

            // --- I/O & conversions ---
            Op::Write => {
                let value = self.pop()?;
                self.write_output(&value.to_string())?;
            }
            Op::Read => {
                let line = self.read_line()?;
                self.push(Value::Str(line));
            }
            Op::Slen => {
                let value = self.pop_non_null()?;
                self.push(Value::Int(value.to_string().chars().count() as i64));
            }
            Op::Getc => {
                let text = self.pop_string()?;
                let index = self.pop_int()?;
                let c = usize::try_from(index)
                    .ok()
                    .and_then(|i| text.chars().nth(i))
                    .ok_or(Fault::IndexOutOfBounds {
                        kind: "string",
                        index,
                    })?;
                self.push(Value::Str(c.to_string()));
            }
            Op::ToInt => {
                let value = self.pop_non_null()?;
                let result = Self::to_int(value)?;
                self.push(result);
            }
            Op::ToDbl => {
                let value = self.pop_non_null()?;
                let result = Self::to_double(value)?;
                self.push(result);
            }
            Op::ToStr => {
                let value = self.pop_non_null()?;
                self.push(Value::Str(value.to_string()));
            }
            Op::Concat => {
                let right = self.pop_non_null()?;
                let left = self.pop_non_null()?;
                self.push(Value::Str(format!("{}{}", left, right)));
            }

            // --- Heap ---
            Op::AllocS
            | Op::AddF(_)
            | Op::SetF(_)
            | Op::GetF(_)
            | Op::AllocA
            | Op::SetI
            | Op::GetI
            | Op::Alen
            | Op::AllocL
            | Op::AddLI
            | Op::SetLE
            | Op::SetLI
            | Op::GetLI
            | Op::LRmb
            | Op::LSize
            | Op::LNumI
            | Op::LNumD
            | Op::LNumS
            | Op::LNumB
            | Op::LAvgI
            | Op::LAvgD
            | Op::LRetrieve(_) => self.execute_heap(op, chunk)?,
        }
        Ok(())
    }

    fn call(&mut self, name: &str) -> VmResult<()> {
        let proto = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| Fault::UnknownFunction(name.to_string()))?;

        // Arguments move top-first, leaving the first argument on top of
        // the callee's stack for the prologue's first STORE.
        let mut args = Vec::with_capacity(proto.arity);
        for _ in 0..proto.arity {
            args.push(self.pop()?);
        }
        self.frames.push(CallFrame::new(proto, args));
        Ok(())
    }

    fn write_output(&mut self, text: &str) -> VmResult<()> {
        match &mut self.output {
            Some(buffer) => buffer.push_str(text),
            None => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())
                    .and_then(|_| out.flush())
                    .map_err(|e| Fault::General(format!("write failed: {}", e)))?;
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> VmResult<String> {
        if let Some(lines) = &mut self.input {
            return Ok(lines.pop_front().unwrap_or_default());
        }
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Fault::General(format!("read failed: {}", e)))?;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    pub(crate) fn allocate_id(&mut self) -> ObjectId {
        let id = self.next_object_id;
        self.next_object_id += 1;
        id
    }

    pub(crate) fn name_operand(chunk: &Chunk, idx: u16) -> VmResult<&str> {
        chunk
            .name(idx)
            .ok_or_else(|| Fault::General(format!("bad name operand {}", idx)))
    }

    // --- Stack helpers ---

    fn frame(&self) -> &CallFrame {
        let idx = self.frames.len() - 1;
        &self.frames[idx]
    }

    fn frame_mut(&mut self) -> &mut CallFrame {
        let idx = self.frames.len() - 1;
        &mut self.frames[idx]
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.frame_mut().stack.push(value);
    }

    pub(crate) fn pop(&mut self) -> VmResult<Value> {
        self.frame_mut()
            .stack
            .pop()
            .ok_or_else(|| Fault::General("operand stack underflow".to_string()))
    }

    pub(crate) fn peek(&self) -> VmResult<&Value> {
        self.frame()
            .stack
            .last()
            .ok_or_else(|| Fault::General("operand stack underflow".to_string()))
    }

    pub(crate) fn pop_non_null(&mut self) -> VmResult<Value> {
        match self.pop()? {
            Value::Null => Err(Fault::NullReference),
            value => Ok(value),
        }
    }

    pub(crate) fn pop_int(&mut self) -> VmResult<i64> {
        match self.pop_non_null()? {
            Value::Int(n) => Ok(n),
            other => Err(Fault::mismatch("int", &other)),
        }
    }

    pub(crate) fn pop_bool(&mut self) -> VmResult<bool> {
        match self.pop_non_null()? {
            Value::Bool(b) => Ok(b),
            other => Err(Fault::mismatch("bool", &other)),
        }
    }

    pub(crate) fn pop_string(&mut self) -> VmResult<String> {
        match self.pop_non_null()? {
            Value::Str(s) => Ok(s),
            other => Err(Fault::mismatch("string", &other)),
        }
    }

    pub(crate) fn pop_object(&mut self) -> VmResult<ObjectId> {
        match self.pop_non_null()? {
            Value::Object(id) => Ok(id),
            other => Err(Fault::mismatch("object", &other)),
        }
    }
}
