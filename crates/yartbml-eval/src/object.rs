//! The YARTBML runtime value model (§3.3, §4.4).
//!
//! A closed variant set, mirroring the AST's own "tagged sum type" design
//! (see `yartbml_parser::ast`): the evaluator switches on `Value`
//! exhaustively rather than dispatching through an object-capability
//! trait. Composite values (`String`, `Array`, `Hash`, `Function`) are
//! reference-counted so cloning a `Value` is always cheap and so a
//! `Function` can share the `Environment` it closed over rather than
//! copying it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHasher};
use yartbml_parser::ast::BlockStatement;

use crate::builtins::Builtin;
use crate::environment::Environment;

/// A runtime value. Every language-level result -- including the
/// `ReturnValue` and `Error` in-band sentinels (§9) -- is one of these.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashObj>),
    Function(Rc<FunctionObj>),
    Builtin(Builtin),
    /// Wraps the payload of a `return`. Unwrapped exactly once, at the
    /// nearest enclosing function call (or at program top level).
    ReturnValue(Box<Value>),
    /// Carries a runtime fault. Propagates through block evaluation and
    /// short-circuits argument/array evaluation exactly like
    /// `ReturnValue` -- see `yartbml_eval::eval`.
    Error(String),
}

/// A YARTBML function value: parameters, body, and the environment that
/// was live when the function literal was evaluated (§3.4's closure
/// capture: "shared -- never copied -- with the function value itself").
#[derive(Debug)]
pub struct FunctionObj {
    pub params: Vec<String>,
    pub body: BlockStatement,
    pub env: Environment,
}

/// Backing storage for a hash value. Keys are fingerprinted via
/// [`HashKey`]; the original evaluated key is kept alongside the value so
/// `Display` can render `{k: v, ...}` using the real key, not its
/// fingerprint.
#[derive(Debug, Default)]
pub struct HashObj {
    pub entries: FxHashMap<HashKey, (Value, Value)>,
}

/// The interned fingerprint used to locate a value in a hash (§3.3).
/// Defined only for integers, booleans, and strings -- every other value
/// fails [`hash_key`] with `unusable as hash key: <TYPE>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    tag: HashKeyTag,
    fingerprint: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HashKeyTag {
    Integer,
    Boolean,
    String,
}

/// Fingerprint a value as a [`HashKey`], or produce the
/// `unusable as hash key: <TYPE>` runtime error for anything else.
pub fn hash_key(value: &Value) -> Result<HashKey, Value> {
    match value {
        Value::Integer(v) => Ok(HashKey {
            tag: HashKeyTag::Integer,
            fingerprint: *v as u64,
        }),
        Value::Boolean(v) => Ok(HashKey {
            tag: HashKeyTag::Boolean,
            fingerprint: u64::from(*v),
        }),
        Value::String(s) => {
            let mut hasher = FxHasher::default();
            s.as_bytes().hash(&mut hasher);
            Ok(HashKey {
                tag: HashKeyTag::String,
                fingerprint: hasher.finish(),
            })
        }
        other => Err(Value::Error(format!(
            "unusable as hash key: {}",
            type_name(other)
        ))),
    }
}

/// The uppercase type tag used in every runtime error message (§7).
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "INTEGER",
        Value::Boolean(_) => "BOOLEAN",
        Value::Null => "NULL",
        Value::String(_) => "STRING",
        Value::Array(_) => "ARRAY",
        Value::Hash(_) => "HASH",
        Value::Function(_) => "FUNCTION",
        Value::Builtin(_) => "BUILTIN",
        Value::ReturnValue(_) => "RETURN_VALUE",
        Value::Error(_) => "ERROR",
    }
}

/// Identity/structural equality for the `==`/`!=` infix operators on
/// non-integer operands (§4.3): booleans and null compare structurally
/// (they have no meaningful identity beyond their value); strings,
/// arrays, hashes, and functions compare by reference. Two `Rc`s that
/// happen to wrap equal content are still unequal here unless they are
/// the *same* allocation -- this is deliberate (§9: "Global singletons").
pub fn reference_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Null, Value::Null) => true,
        (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        _ => false,
    }
}

/// Rust-level equality used by this crate's own tests. Scalars and
/// strings compare by content; arrays compare element-wise (safe --
/// arrays can't cycle back through themselves); hashes and functions
/// compare by identity to avoid ever walking into a self-referential
/// closure's captured environment.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, v) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Hash(hash) => {
                write!(f, "{{")?;
                for (i, (key, value)) in hash.entries.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => {
                write!(f, "fn({}) {{ {} }}", func.params.join(", "), func.body)
            }
            Value::Builtin(b) => write!(f, "builtin function: {}", b.name()),
            Value::ReturnValue(v) => write!(f, "{v}"),
            Value::Error(msg) => write!(f, "ERROR: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_covers_every_variant() {
        assert_eq!(type_name(&Value::Integer(1)), "INTEGER");
        assert_eq!(type_name(&Value::Boolean(true)), "BOOLEAN");
        assert_eq!(type_name(&Value::Null), "NULL");
        assert_eq!(type_name(&Value::String(Rc::from("x"))), "STRING");
    }

    #[test]
    fn display_forms_match_spec() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::String(Rc::from("hi")).to_string(), "hi");
        let arr = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(arr.to_string(), "[1, 2]");
    }

    #[test]
    fn hash_key_rejects_unhashable_values() {
        let err = hash_key(&Value::Null).unwrap_err();
        assert_eq!(err, Value::Error("unusable as hash key: NULL".to_string()));
    }

    #[test]
    fn hash_key_distinguishes_types_with_overlapping_fingerprints() {
        // Integer 1, Boolean true, and a string that happens to hash to
        // the same 64 bits must never collide -- the type tag disambiguates.
        let int_key = hash_key(&Value::Integer(1)).unwrap();
        let bool_key = hash_key(&Value::Boolean(true)).unwrap();
        assert_ne!(int_key, bool_key);
    }

    #[test]
    fn strings_with_equal_content_are_not_reference_equal() {
        let a = Value::String(Rc::from("hi"));
        let b = Value::String(Rc::from("hi"));
        assert!(!reference_eq(&a, &b), "two independently built strings must not be identity-equal");
        let c = a.clone();
        assert!(reference_eq(&a, &c), "cloning shares the Rc, so identity must hold");
    }

    #[test]
    fn booleans_and_null_compare_structurally() {
        assert!(reference_eq(&Value::Boolean(true), &Value::Boolean(true)));
        assert!(!reference_eq(&Value::Boolean(true), &Value::Boolean(false)));
        assert!(reference_eq(&Value::Null, &Value::Null));
    }
}
