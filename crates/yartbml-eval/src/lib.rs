//! Value model, lexical environments, built-ins, and the tree-walking
//! evaluator for YARTBML.

pub mod builtins;
pub mod environment;
mod eval;
pub mod object;

pub use builtins::Builtin;
pub use environment::Environment;
pub use eval::eval_program;
pub use object::{hash_key, reference_eq, type_name, FunctionObj, HashKey, HashObj, Value};
