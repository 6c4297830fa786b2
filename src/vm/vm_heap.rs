//! Struct, array and list instructions.

use super::chunk::Chunk;
use super::fault::{Fault, VmResult};
use super::opcode::Op;
use super::value::{ObjectId, Value};
use super::vm::{StructObject, Vm};

impl Vm {
    pub(crate) fn execute_heap(&mut self, op: Op, chunk: &Chunk) -> VmResult<()> {
        match op {
            // --- Structs ---
            Op::AllocS => {
                let id = self.allocate_id();
                self.struct_heap.insert(id, StructObject::default());
                self.push(Value::Object(id));
            }
            Op::AddF(idx) => {
                let field = Self::name_operand(chunk, idx)?;
                let id = self.pop_object()?;
                self.struct_object(id)?.insert(field.to_string(), Value::Null);
            }
            Op::SetF(idx) => {
                let field = Self::name_operand(chunk, idx)?;
                let value = self.pop()?;
                let id = self.pop_object()?;
                let slot = self
                    .struct_object(id)?
                    .get_mut(field)
                    .ok_or_else(|| Fault::General(format!("no field '{}' in object {}", field, id)))?;
                *slot = value;
            }
            Op::GetF(idx) => {
                let field = Self::name_operand(chunk, idx)?;
                let id = self.pop_object()?;
                let value = self
                    .struct_object(id)?
                    .get(field)
                    .cloned()
                    .ok_or_else(|| Fault::General(format!("no field '{}' in object {}", field, id)))?;
                self.push(value);
            }

            // --- Arrays ---
            Op::AllocA => {
                let fill = self.pop()?;
                let length = self.pop_int()?;
                let length = usize::try_from(length)
                    .map_err(|_| Fault::General(format!("negative array length {}", length)))?;
                let mut elements = Vec::new();
                elements.try_reserve_exact(length).map_err(|_| {
                    Fault::General(format!("cannot allocate array of length {}", length))
                })?;
                elements.resize(length, fill);
                let id = self.allocate_id();
                self.array_heap.insert(id, elements);
                self.push(Value::Object(id));
            }
            Op::SetI => {
                let value = self.pop()?;
                let index = self.pop_int()?;
                let id = self.pop_object()?;
                let elements = self.array(id)?;
                *element_mut(elements, index, "array")? = value;
            }
            Op::GetI => {
                let index = self.pop_int()?;
                let id = self.pop_object()?;
                let value = element_mut(self.array(id)?, index, "array")?.clone();
                self.push(value);
            }
            Op::Alen => {
                let id = self.pop_object()?;
                let len = self.array(id)?.len();
                self.push(Value::Int(len as i64));
            }

            // --- Lists ---
            Op::AllocL => {
                let id = self.allocate_id();
                self.list_heap.insert(id, Vec::new());
                self.push(Value::Object(id));
            }
            Op::AddLI => {
                let id = self.pop_object()?;
                self.list(id)?.push(Value::Null);
            }
            Op::SetLE => {
                let value = self.pop()?;
                let id = self.pop_object()?;
                let last = self
                    .list(id)?
                    .last_mut()
                    .ok_or(Fault::IndexOutOfBounds {
                        kind: "list",
                        index: 0,
                    })?;
                *last = value;
            }
            Op::SetLI => {
                let value = self.pop()?;
                let index = self.pop_int()?;
                let id = self.pop_object()?;
                *element_mut(self.list(id)?, index, "list")? = value;
            }
            Op::GetLI => {
                let index = self.pop_int()?;
                let id = self.pop_object()?;
                let value = element_mut(self.list(id)?, index, "list")?.clone();
                self.push(value);
            }
            Op::LRmb => {
                let id = self.pop_object()?;
                self.list(id)?.pop();
            }
            Op::LSize => {
                let id = self.pop_object()?;
                let len = self.list(id)?.len();
                self.push(Value::Int(len as i64));
            }
            Op::LNumI | Op::LNumD | Op::LNumS | Op::LNumB => {
                let id = self.pop_object()?;
                let count = self
                    .list(id)?
                    .iter()
                    .filter(|v| match op {
                        Op::LNumI => matches!(v, Value::Int(_)),
                        Op::LNumD => matches!(v, Value::Double(_)),
                        Op::LNumS => matches!(v, Value::Str(_)),
                        _ => matches!(v, Value::Bool(_)),
                    })
                    .count();
                self.push(Value::Int(count as i64));
            }
            Op::LAvgI => {
                let id = self.pop_object()?;
                let ints: Vec<i64> = self
                    .list(id)?
                    .iter()
                    .filter_map(|v| match v {
                        Value::Int(n) => Some(*n),
                        _ => None,
                    })
                    .collect();
                let avg = if ints.is_empty() {
                    0
                } else {
                    ints.iter().fold(0i64, |acc, n| acc.wrapping_add(*n)) / ints.len() as i64
                };
                self.push(Value::Int(avg));
            }
            Op::LAvgD => {
                let id = self.pop_object()?;
                let doubles: Vec<f64> = self
                    .list(id)?
                    .iter()
                    .filter_map(|v| match v {
                        Value::Double(d) => Some(*d),
                        _ => None,
                    })
                    .collect();
                let avg = if doubles.is_empty() {
                    0.0
                } else {
                    doubles.iter().sum::<f64>() / doubles.len() as f64
                };
                self.push(Value::Double(avg));
            }
            Op::LRetrieve(idx) => {
                let type_name = Self::name_operand(chunk, idx)?;
                let index = self.pop_int()?;
                let id = self.pop_object()?;
                let elements = self.list(id)?;
                if index < 0 || elements.is_empty() {
                    return Err(Fault::IndexOutOfBounds {
                        kind: "list",
                        index,
                    });
                }
                let clamped = (index as usize).min(elements.len() - 1);
                let value = elements[clamped].clone();
                if !value.matches_type(type_name) {
                    return Err(Fault::mismatch(type_name, &value));
                }
                self.push(value);
            }
            other => {
                return Err(Fault::General(format!(
                    "{} is not a heap instruction",
                    other.mnemonic()
                )))
            }
        }
        Ok(())
    }

    fn struct_object(&mut self, id: ObjectId) -> VmResult<&mut StructObject> {
        self.struct_heap
            .get_mut(&id)
            .ok_or_else(|| Fault::General(format!("{} is not a struct object", id)))
    }

    fn array(&mut self, id: ObjectId) -> VmResult<&mut Vec<Value>> {
        self.array_heap
            .get_mut(&id)
            .ok_or_else(|| Fault::General(format!("{} is not an array object", id)))
    }

    fn list(&mut self, id: ObjectId) -> VmResult<&mut Vec<Value>> {
        self.list_heap
            .get_mut(&id)
            .ok_or_else(|| Fault::General(format!("{} is not a list object", id)))
    }
}

fn element_mut<'a>(
    elements: &'a mut [Value],
    index: i64,
    kind: &'static str,
) -> VmResult<&'a mut Value> {
    usize::try_from(index)
        .ok()
        .and_then(|i| elements.get_mut(i))
        .ok_or(Fault::IndexOutOfBounds { kind, index })
}

