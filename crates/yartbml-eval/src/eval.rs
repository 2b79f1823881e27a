//! The tree-walking evaluator (§4.3) -- the hardest and most educative
//! part of the pipeline. A single conceptual entry point,
//! `evaluate(node, env)`, realized here as one function per AST node
//! category (`eval_program`, `eval_block`, `eval_statement`, `eval_expr`)
//! since the parser hands us a typed AST rather than a single polymorphic
//! node trait.
//!
//! The one rule worth re-reading twice is the **program-vs-block**
//! distinction: [`eval_program`] unwraps a trailing `Value::ReturnValue`
//! and returns a `Value::Error` as the final result, because there is no
//! enclosing call frame left to hand either to. [`eval_block`] returns
//! both *unwrapped*, so a `return` (or a runtime fault) deep inside
//! nested `if`s escapes every enclosing block until it reaches either a
//! function call boundary (which unwraps `ReturnValue` exactly once) or
//! the program top level.

use std::io::Write;
use std::rc::Rc;

use yartbml_parser::ast::{BlockStatement, Expr, Program, Statement};

use crate::builtins::{self, Builtin};
use crate::environment::Environment;
use crate::object::{hash_key, reference_eq, type_name, FunctionObj, HashObj, Value};

/// Evaluate a complete program. `out` receives everything `puts` writes.
pub fn eval_program(program: &Program, env: &Environment, out: &mut dyn Write) -> Value {
    let mut result = Value::Null;
    for stmt in &program.statements {
        result = eval_statement(stmt, env, out);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

/// Evaluate a block *without* unwrapping `ReturnValue`/`Error` -- see the
/// module-level doc comment. Used for `if`/`else` arms and function bodies.
fn eval_block(block: &BlockStatement, env: &Environment, out: &mut dyn Write) -> Value {
    let mut result = Value::Null;
    for stmt in &block.statements {
        result = eval_statement(stmt, env, out);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Environment, out: &mut dyn Write) -> Value {
    match stmt {
        Statement::Let(s) => {
            let value = eval_expr(&s.value, env, out);
            if is_error(&value) {
                return value;
            }
            env.set(s.name.clone(), value);
            Value::Null
        }
        Statement::Return(s) => {
            let value = eval_expr(&s.value, env, out);
            if is_error(&value) {
                return value;
            }
            Value::ReturnValue(Box::new(value))
        }
        Statement::Expression(s) => eval_expr(&s.expr, env, out),
    }
}

fn eval_expr(expr: &Expr, env: &Environment, out: &mut dyn Write) -> Value {
    match expr {
        Expr::IntegerLiteral(v) => Value::Integer(*v),
        Expr::BooleanLiteral(v) => Value::Boolean(*v),
        Expr::StringLiteral(s) => Value::String(Rc::from(s.as_str())),
        Expr::Identifier(name) => eval_identifier(name, env),

        Expr::Prefix { operator, right } => {
            let right = eval_expr(right, env, out);
            if is_error(&right) {
                return right;
            }
            eval_prefix_expression(operator, right)
        }

        Expr::Infix { operator, left, right } => {
            let left = eval_expr(left, env, out);
            if is_error(&left) {
                return left;
            }
            let right = eval_expr(right, env, out);
            if is_error(&right) {
                return right;
            }
            eval_infix_expression(operator, left, right)
        }

        Expr::If {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expr(condition, env, out);
            if is_error(&condition) {
                return condition;
            }
            if is_truthy(&condition) {
                eval_block(consequence, env, out)
            } else if let Some(alt) = alternative {
                eval_block(alt, env, out)
            } else {
                Value::Null
            }
        }

        Expr::ArrayLiteral(elements) => match eval_expressions(elements, env, out) {
            Ok(values) => Value::Array(Rc::new(values)),
            Err(e) => e,
        },

        Expr::HashLiteral(pairs) => eval_hash_literal(pairs, env, out),

        Expr::FunctionLiteral { params, body } => Value::Function(Rc::new(FunctionObj {
            params: params.clone(),
            body: body.clone(),
            env: env.clone(),
        })),

        Expr::Call { function, arguments } => {
            let func = eval_expr(function, env, out);
            if is_error(&func) {
                return func;
            }
            let args = match eval_expressions(arguments, env, out) {
                Ok(values) => values,
                Err(e) => return e,
            };
            apply_function(func, args, out)
        }

        Expr::Index { left, index } => {
            let left = eval_expr(left, env, out);
            if is_error(&left) {
                return left;
            }
            let index = eval_expr(index, env, out);
            if is_error(&index) {
                return index;
            }
            eval_index_expression(left, index)
        }
    }
}

/// Checks the current environment first (so a user binding can shadow a
/// builtin name), then falls back to the builtin table, then fails.
fn eval_identifier(name: &str, env: &Environment) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = Builtin::lookup(name) {
        return Value::Builtin(builtin);
    }
    Value::Error(format!("identifier not found: {name}"))
}

/// Truthy ⇔ not `FALSE`, not `NULL` (§4.3) -- everything else, including
/// the integer `0`, is truthy.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Boolean(false) | Value::Null)
}

fn is_error(value: &Value) -> bool {
    matches!(value, Value::Error(_))
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => Value::Boolean(!is_truthy(&right)),
        "-" => match right {
            Value::Integer(v) => Value::Integer(-v),
            other => Value::Error(format!("unknown operator: -{}", type_name(&other))),
        },
        other => Value::Error(format!("unknown operator: {other}{}", type_name(&right))),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        // `==`/`!=` are identity comparisons for every non-integer type
        // (§4.3, §9) -- this must be checked before the (String, String)
        // arm below, or string equality would fall through to
        // `eval_string_infix` and report "unknown operator" instead.
        _ if operator == "==" => Value::Boolean(reference_eq(&left, &right)),
        _ if operator == "!=" => Value::Boolean(!reference_eq(&left, &right)),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ if type_name(&left) != type_name(&right) => Value::Error(format!(
            "type mismatch: {} {operator} {}",
            type_name(&left),
            type_name(&right)
        )),
        _ => Value::Error(format!(
            "unknown operator: {} {operator} {}",
            type_name(&left),
            type_name(&right)
        )),
    }
}

/// Division truncates toward zero (Rust's native `i64` `/` already does
/// this) and divide-by-zero is surfaced as an in-band `Error` rather than
/// a host panic -- see DESIGN.md for why this Open Question (§4.3) was
/// resolved that way. Overflow wraps rather than panics, matching the
/// host Go implementation's native `int64` arithmetic.
fn eval_integer_infix(operator: &str, l: i64, r: i64) -> Value {
    match operator {
        "+" => Value::Integer(l.wrapping_add(r)),
        "-" => Value::Integer(l.wrapping_sub(r)),
        "*" => Value::Integer(l.wrapping_mul(r)),
        "/" if r == 0 => Value::Error("division by zero".to_string()),
        "/" => Value::Integer(l / r),
        "<" => Value::Boolean(l < r),
        ">" => Value::Boolean(l > r),
        "==" => Value::Boolean(l == r),
        "!=" => Value::Boolean(l != r),
        other => Value::Error(format!("unknown operator: INTEGER {other} INTEGER")),
    }
}

fn eval_string_infix(operator: &str, left: &Rc<str>, right: &Rc<str>) -> Value {
    match operator {
        "+" => {
            let mut joined = String::with_capacity(left.len() + right.len());
            joined.push_str(left);
            joined.push_str(right);
            Value::String(Rc::from(joined))
        }
        other => Value::Error(format!("unknown operator: STRING {other} STRING")),
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(arr), Value::Integer(i)) => {
            if *i < 0 || *i as usize >= arr.len() {
                Value::Null
            } else {
                arr[*i as usize].clone()
            }
        }
        (Value::Hash(_), _) => eval_hash_index_expression(&left, index),
        _ => Value::Error(format!("index operator not supported: {}", type_name(&left))),
    }
}

fn eval_hash_index_expression(left: &Value, index: Value) -> Value {
    let Value::Hash(hash) = left else {
        unreachable!("caller only invokes this for Value::Hash");
    };
    let key = match hash_key(&index) {
        Ok(k) => k,
        Err(e) => return e,
    };
    match hash.entries.get(&key) {
        Some((_, value)) => value.clone(),
        None => Value::Null,
    }
}

/// Evaluate keys then values, checking hashability before the value so a
/// bad key short-circuits without evaluating its paired value (§4.3).
/// Duplicate keys: the later pair overwrites the earlier one.
fn eval_hash_literal(pairs: &[(Expr, Expr)], env: &Environment, out: &mut dyn Write) -> Value {
    let mut hash = HashObj::default();
    for (key_expr, value_expr) in pairs {
        let key_value = eval_expr(key_expr, env, out);
        if is_error(&key_value) {
            return key_value;
        }
        let key = match hash_key(&key_value) {
            Ok(k) => k,
            Err(e) => return e,
        };
        let value = eval_expr(value_expr, env, out);
        if is_error(&value) {
            return value;
        }
        hash.entries.insert(key, (key_value, value));
    }
    Value::Hash(Rc::new(hash))
}

/// Left-to-right, short-circuiting on the first `Error` (§4.3, §9). Used
/// for both call arguments and array-literal elements.
fn eval_expressions(
    exprs: &[Expr],
    env: &Environment,
    out: &mut dyn Write,
) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expr(expr, env, out);
        if is_error(&value) {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn apply_function(func: Value, args: Vec<Value>, out: &mut dyn Write) -> Value {
    match func {
        Value::Function(f) => {
            if f.params.len() != args.len() {
                return Value::Error(format!(
                    "wrong number of arguments. want={}. got={}",
                    f.params.len(),
                    args.len()
                ));
            }
            let call_env = Environment::enclosed(&f.env);
            for (param, arg) in f.params.iter().zip(args) {
                call_env.set(param.clone(), arg);
            }
            unwrap_return_value(eval_block(&f.body, &call_env, out))
        }
        Value::Builtin(b) => builtins::apply(b, &args, out),
        other => Value::Error(format!("not a function: {}", type_name(&other))),
    }
}

fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::ReturnValue(inner) => *inner,
        other => other,
    }
}
