//! Comparison operations: =, <, >, <=, >=
//!
//! Each comparator is variadic: zero or one argument is trivially true,
//! otherwise every consecutive pair must satisfy the relation. All operands
//! are widened to `f64` before comparing — including two integer operands
//! compared against each other — so an integer and a float compare by
//! ordinary numeric value rather than tripping over the type boundary.
//!
//! - `=`: Numeric equality
//! - `<`: Strictly increasing
//! - `>`: Strictly decreasing
//! - `<=`: Non-decreasing
//! - `>=`: Non-increasing

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Primitive, Value};
use std::rc::Rc;

fn as_f64(v: &Value, context: &str) -> Result<f64, EvalError> {
    match v {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        other => Err(EvalError::wrong_type(context, "number", other.type_name())),
    }
}

fn pairwise(args: &[Value], context: &str, cmp: fn(f64, f64) -> bool) -> Result<Value, EvalError> {
    let nums: Result<Vec<f64>, EvalError> =
        args.iter().map(|v| as_f64(v, context)).collect();
    let nums = nums?;
    for pair in nums.windows(2) {
        if !cmp(pair[0], pair[1]) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Tests that every argument is numerically equal to the next.
///
/// # Examples
///
/// ```lisp
/// (= 5 5 5) => #t
/// (= 5 6) => #f
/// ```
pub fn builtin_eq(args: &[Value]) -> Result<Value, EvalError> {
    pairwise(args, "=", |a, b| a == b)
}

/// Tests that the arguments are in strictly increasing order.
///
/// # Examples
///
/// ```lisp
/// (< 1 2 3) => #t
/// (< 1 1) => #f
/// ```
pub fn builtin_lt(args: &[Value]) -> Result<Value, EvalError> {
    pairwise(args, "<", |a, b| a < b)
}

/// Tests that the arguments are in strictly decreasing order.
pub fn builtin_gt(args: &[Value]) -> Result<Value, EvalError> {
    pairwise(args, ">", |a, b| a > b)
}

/// Tests that the arguments are non-decreasing.
pub fn builtin_le(args: &[Value]) -> Result<Value, EvalError> {
    pairwise(args, "<=", |a, b| a <= b)
}

/// Tests that the arguments are non-increasing.
pub fn builtin_ge(args: &[Value]) -> Result<Value, EvalError> {
    pairwise(args, ">=", |a, b| a >= b)
}

/// Registers `= < > <= >=` in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define(
        "=".to_string(),
        Value::Primitive(Primitive {
            name: "=",
            func: builtin_eq,
        }),
    );
    env.define(
        "<".to_string(),
        Value::Primitive(Primitive {
            name: "<",
            func: builtin_lt,
        }),
    );
    env.define(
        ">".to_string(),
        Value::Primitive(Primitive {
            name: ">",
            func: builtin_gt,
        }),
    );
    env.define(
        "<=".to_string(),
        Value::Primitive(Primitive {
            name: "<=",
            func: builtin_le,
        }),
    );
    env.define(
        ">=".to_string(),
        Value::Primitive(Primitive {
            name: ">=",
            func: builtin_ge,
        }),
    );
}
