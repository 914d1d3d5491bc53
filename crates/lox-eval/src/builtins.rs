//! The built-in functions always present in `globals`.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use lox_util::Span;

use crate::error::RuntimeError;
use crate::heap::Heap;
use crate::value::{stringify, NativeFunction, Value};

pub const BUILTINS: &[NativeFunction] = &[
    NativeFunction { name: "clock", arity: 0, call: clock },
    NativeFunction { name: "length", arity: 1, call: length },
    NativeFunction { name: "type", arity: 1, call: type_of },
    NativeFunction { name: "str", arity: 1, call: str_of },
];

/// Registers every builtin into `globals`, named by `install`'s caller.
pub fn install(mut define: impl FnMut(&str, Value)) {
    for builtin in BUILTINS {
        // `BUILTINS` is a `&'static` slice; each entry's lifetime outlives
        // every interpreter, so re-wrapping it in its own `Rc` per run is
        // the only allocation `install` needs to do.
        let native = Rc::new(NativeFunction { name: builtin.name, arity: builtin.arity, call: builtin.call });
        define(builtin.name, Value::Native(native));
    }
}

fn clock(_heap: &Heap, _args: &[Value], _line: u32) -> Result<Value, RuntimeError> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    Ok(Value::Number(seconds))
}

fn length(heap: &Heap, args: &[Value], line: u32) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Array(id) => Ok(Value::Number(heap.arrays[*id].len() as f64)),
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        other => Err(type_error(line, other, "array or string")),
    }
}

fn type_of(_heap: &Heap, args: &[Value], _line: u32) -> Result<Value, RuntimeError> {
    Ok(Value::string(args[0].type_name()))
}

fn str_of(heap: &Heap, args: &[Value], _line: u32) -> Result<Value, RuntimeError> {
    Ok(Value::string(stringify(&args[0], heap)))
}

fn type_error(line: u32, value: &Value, expected: &str) -> RuntimeError {
    RuntimeError::new(Span::new(line), format!("Expected a {expected}, got a {}.", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_array_elements() {
        let mut heap = Heap::new();
        let id = heap.alloc_array(vec![Value::Nil, Value::Nil]);
        let result = length(&heap, &[Value::Array(id)], 1).unwrap();
        assert_eq!(result, Value::Number(2.0));
    }

    #[test]
    fn length_rejects_non_indexable_types() {
        let heap = Heap::new();
        assert!(length(&heap, &[Value::Number(1.0)], 1).is_err());
    }

    #[test]
    fn type_of_reports_canonical_type_names() {
        let heap = Heap::new();
        assert_eq!(type_of(&heap, &[Value::Nil], 1).unwrap(), Value::string("nil"));
        assert_eq!(type_of(&heap, &[Value::Bool(true)], 1).unwrap(), Value::string("boolean"));
    }
}
