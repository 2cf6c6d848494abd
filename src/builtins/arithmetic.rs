//! Arithmetic operations: +, -, *, /, modulo
//!
//! The numeric tower has exactly two members, `Int` and `Float`. `+`, `-`
//! and `*` stay integer as long as every operand is an integer and widen to
//! float the moment any operand is a float; `/` widens whenever the
//! division isn't exact, and `modulo` only ever accepts integers.
//!
//! - `+`: Sum of all arguments (identity: 0)
//! - `-`: Subtract subsequent args from first, or negate if single arg
//! - `*`: Product of all arguments (identity: 1)
//! - `/`: Divide first by subsequent args; exactly two operands
//! - `modulo`: Remainder following the sign of the divisor; exactly two operands

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Primitive, Value};
use std::rc::Rc;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn to_num(v: &Value, context: &str) -> Result<Num, EvalError> {
    match v {
        Value::Int(i) => Ok(Num::Int(*i)),
        Value::Float(f) => Ok(Num::Float(*f)),
        other => Err(EvalError::wrong_type(context, "number", other.type_name())),
    }
}

fn is_zero(n: Num) -> bool {
    match n {
        Num::Int(i) => i == 0,
        Num::Float(f) => f == 0.0,
    }
}

/// Returns the sum of all arguments.
///
/// # Examples
///
/// ```lisp
/// (+ 1 2 3) => 6
/// (+ 10) => 10
/// (+) => 0
/// ```
///
/// # See Also
///
/// -, *, /
pub fn builtin_add(args: &[Value]) -> Result<Value, EvalError> {
    let mut all_int = true;
    let mut int_sum: i64 = 0;
    let mut float_sum: f64 = 0.0;
    for arg in args {
        match to_num(arg, "+")? {
            Num::Int(i) => {
                int_sum += i;
                float_sum += i as f64;
            }
            Num::Float(f) => {
                all_int = false;
                float_sum += f;
            }
        }
    }
    Ok(if all_int {
        Value::Int(int_sum)
    } else {
        Value::Float(float_sum)
    })
}

/// Subtracts subsequent arguments from the first.
///
/// With one argument, returns its negation.
///
/// # Examples
///
/// ```lisp
/// (- 10 3 2) => 5
/// (- 5) => -5
/// ```
///
/// # See Also
///
/// +, *, /
pub fn builtin_sub(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity("-", "at least 1", 0));
    }
    let first = to_num(&args[0], "-")?;
    if args.len() == 1 {
        return Ok(match first {
            Num::Int(i) => Value::Int(-i),
            Num::Float(f) => Value::Float(-f),
        });
    }

    let mut all_int = matches!(first, Num::Int(_));
    let mut int_result = match first {
        Num::Int(i) => i,
        Num::Float(_) => 0,
    };
    let mut float_result = first.as_f64();

    for arg in &args[1..] {
        match to_num(arg, "-")? {
            Num::Int(i) => {
                int_result -= i;
                float_result -= i as f64;
            }
            Num::Float(f) => {
                all_int = false;
                float_result -= f;
            }
        }
    }
    Ok(if all_int {
        Value::Int(int_result)
    } else {
        Value::Float(float_result)
    })
}

/// Returns the product of all arguments.
///
/// # Examples
///
/// ```lisp
/// (* 2 3 4) => 24
/// (* 5) => 5
/// (*) => 1
/// ```
///
/// # See Also
///
/// +, -, /
pub fn builtin_mul(args: &[Value]) -> Result<Value, EvalError> {
    let mut all_int = true;
    let mut int_product: i64 = 1;
    let mut float_product: f64 = 1.0;
    for arg in args {
        match to_num(arg, "*")? {
            Num::Int(i) => {
                int_product *= i;
                float_product *= i as f64;
            }
            Num::Float(f) => {
                all_int = false;
                float_product *= f;
            }
        }
    }
    Ok(if all_int {
        Value::Int(int_product)
    } else {
        Value::Float(float_product)
    })
}

/// Divides the first argument by the second. Exactly two operands.
///
/// Stays an integer when both operands are integers and the division is
/// exact; widens to float otherwise.
///
/// # Examples
///
/// ```lisp
/// (/ 20 4) => 5
/// (/ 7 2) => 3.500000
/// ```
///
/// # See Also
///
/// +, -, *, modulo
pub fn builtin_div(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity("/", "2", args.len()));
    }
    let a = to_num(&args[0], "/")?;
    let b = to_num(&args[1], "/")?;
    if is_zero(b) {
        return Err(EvalError::DivideByZero);
    }
    if let (Num::Int(ai), Num::Int(bi)) = (a, b) {
        if ai % bi == 0 {
            return Ok(Value::Int(ai / bi));
        }
    }
    Ok(Value::Float(a.as_f64() / b.as_f64()))
}

/// Returns the remainder of dividing the first argument by the second,
/// with the sign of the divisor. Exactly two integer operands.
///
/// # Examples
///
/// ```lisp
/// (modulo 17 5) => 2
/// (modulo -7 2) => 1
/// ```
///
/// # See Also
///
/// /
pub fn builtin_modulo(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity("modulo", "2", args.len()));
    }
    let a = match &args[0] {
        Value::Int(i) => *i,
        other => return Err(EvalError::wrong_type("modulo", "integer", other.type_name())),
    };
    let b = match &args[1] {
        Value::Int(i) => *i,
        other => return Err(EvalError::wrong_type("modulo", "integer", other.type_name())),
    };
    if b == 0 {
        return Err(EvalError::DivideByZero);
    }
    let r = a % b;
    let r = if (r > 0 && b < 0) || (r < 0 && b > 0) {
        r + b
    } else {
        r
    };
    Ok(Value::Int(r))
}

/// Registers `+ - * / modulo` in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define(
        "+".to_string(),
        Value::Primitive(Primitive {
            name: "+",
            func: builtin_add,
        }),
    );
    env.define(
        "-".to_string(),
        Value::Primitive(Primitive {
            name: "-",
            func: builtin_sub,
        }),
    );
    env.define(
        "*".to_string(),
        Value::Primitive(Primitive {
            name: "*",
            func: builtin_mul,
        }),
    );
    env.define(
        "/".to_string(),
        Value::Primitive(Primitive {
            name: "/",
            func: builtin_div,
        }),
    );
    env.define(
        "modulo".to_string(),
        Value::Primitive(Primitive {
            name: "modulo",
            func: builtin_modulo,
        }),
    );
}
