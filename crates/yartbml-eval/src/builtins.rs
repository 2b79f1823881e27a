//! The minimal built-in function set (§4.3 "Built-ins"): `len`, `first`,
//! `last`, `rest`, `push`, `puts`. Represented as a closed enum rather
//! than boxed closures -- consistent with the rest of the value model's
//! "tagged sum type... eliminates dynamic dispatch" design (§9) -- and
//! dispatched through [`apply`].
//!
//! `puts`'s output goes to an injected `&mut dyn Write` rather than
//! straight to stdout, so the REPL can interleave it with its own prompt
//! output and tests can capture it without touching process stdout.

use std::io::Write;
use std::rc::Rc;

use crate::object::{type_name, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Puts,
}

impl Builtin {
    /// Resolve an identifier to a builtin, or `None` if it names neither
    /// a builtin nor (checked first, by the caller) a user binding.
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "first" => Some(Builtin::First),
            "last" => Some(Builtin::Last),
            "rest" => Some(Builtin::Rest),
            "push" => Some(Builtin::Push),
            "puts" => Some(Builtin::Puts),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Rest => "rest",
            Builtin::Push => "push",
            Builtin::Puts => "puts",
        }
    }
}

/// Invoke a builtin. Its return value is final -- unlike a user
/// `Function`, there is no `ReturnValue` wrapper to unwrap (§4.3).
pub fn apply(builtin: Builtin, args: &[Value], out: &mut dyn Write) -> Value {
    match builtin {
        Builtin::Len => len(args),
        Builtin::First => first(args),
        Builtin::Last => last(args),
        Builtin::Rest => rest(args),
        Builtin::Push => push(args),
        Builtin::Puts => puts(args, out),
    }
}

fn wrong_arity(want: usize, got: usize) -> Value {
    Value::Error(format!("wrong number of arguments. want={want}. got={got}"))
}

fn unsupported(builtin: &str, value: &Value) -> Value {
    Value::Error(format!(
        "argument to \"{builtin}\" not supported, got {}",
        type_name(value)
    ))
}

fn len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(arr) => Value::Integer(arr.len() as i64),
        other => unsupported("len", other),
    }
}

fn first(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }
    match &args[0] {
        Value::Array(arr) => arr.first().cloned().unwrap_or(Value::Null),
        other => unsupported("first", other),
    }
}

fn last(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }
    match &args[0] {
        Value::Array(arr) => arr.last().cloned().unwrap_or(Value::Null),
        other => unsupported("last", other),
    }
}

fn rest(args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }
    match &args[0] {
        Value::Array(arr) if arr.is_empty() => Value::Null,
        Value::Array(arr) => Value::Array(Rc::new(arr[1..].to_vec())),
        other => unsupported("rest", other),
    }
}

/// Never mutates the input array -- allocates a new backing `Vec` with
/// the appended element, matching `Value::Array`'s "clone the `Rc`, not
/// the contents" sharing model.
fn push(args: &[Value]) -> Value {
    if args.len() != 2 {
        return wrong_arity(2, args.len());
    }
    match &args[0] {
        Value::Array(arr) => {
            let mut elements = (**arr).clone();
            elements.push(args[1].clone());
            Value::Array(Rc::new(elements))
        }
        other => unsupported("push", other),
    }
}

fn puts(args: &[Value], out: &mut dyn Write) -> Value {
    for arg in args {
        let _ = writeln!(out, "{arg}");
    }
    Value::Null
}
