//! Structural equality: `equal?`
//!
//! Unlike the numeric comparators in [`crate::builtins::comparison`], `equal?`
//! does not cross the Int/Float boundary: `(equal? 2 2.0)` is `#f`. Pairs
//! compare element-wise, including their tails, so dotted and proper lists of
//! different shape never compare equal. Procedures compare by identity —
//! closures by their captured frame, primitives by function pointer — since
//! there is no useful structural notion of procedure equality.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Pair(car1, cdr1), Value::Pair(car2, cdr2)) => {
            values_equal(car1, car2) && values_equal(cdr1, cdr2)
        }
        (Value::Closure(c1), Value::Closure(c2)) => {
            c1.params == c2.params
                && c1.body.len() == c2.body.len()
                && c1.body.iter().zip(c2.body.iter()).all(|(x, y)| values_equal(x, y))
                && Rc::ptr_eq(&c1.env, &c2.env)
        }
        (Value::Primitive(p1), Value::Primitive(p2)) => {
            std::ptr::eq(p1.func as *const (), p2.func as *const ())
        }
        (Value::Void, Value::Void) => true,
        (Value::Unspecified, Value::Unspecified) => true,
        _ => false,
    }
}

/// Tests two values for structural equality.
///
/// # Examples
///
/// ```lisp
/// (equal? '(1 2 3) '(1 2 3)) => #t
/// (equal? 2 2.0) => #f
/// ```
pub fn builtin_equal(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity("equal?", "2", args.len()));
    }
    Ok(Value::Bool(values_equal(&args[0], &args[1])))
}

/// Registers `equal?` in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define(
        "equal?".to_string(),
        Value::Primitive(crate::value::Primitive {
            name: "equal?",
            func: builtin_equal,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::list_from_vec;

    #[test]
    fn test_scalars() {
        assert!(matches!(
            builtin_equal(&[Value::Int(1), Value::Int(1)]).unwrap(),
            Value::Bool(true)
        ));
        assert!(matches!(
            builtin_equal(&[Value::Int(2), Value::Float(2.0)]).unwrap(),
            Value::Bool(false)
        ));
    }

    #[test]
    fn test_strings_and_symbols() {
        assert!(matches!(
            builtin_equal(&[
                Value::Str("hi".to_string()),
                Value::Str("hi".to_string())
            ])
            .unwrap(),
            Value::Bool(true)
        ));
        assert!(matches!(
            builtin_equal(&[
                Value::Symbol("a".to_string()),
                Value::Str("a".to_string())
            ])
            .unwrap(),
            Value::Bool(false)
        ));
    }

    #[test]
    fn test_lists_structural() {
        let a = list_from_vec(vec![Value::Int(1), Value::Int(2)], Value::Null);
        let b = list_from_vec(vec![Value::Int(1), Value::Int(2)], Value::Null);
        assert!(matches!(
            builtin_equal(&[a, b]).unwrap(),
            Value::Bool(true)
        ));
    }

    #[test]
    fn test_dotted_tail_matters() {
        let a = list_from_vec(vec![Value::Int(1)], Value::Int(2));
        let b = list_from_vec(vec![Value::Int(1)], Value::Null);
        assert!(matches!(
            builtin_equal(&[a, b]).unwrap(),
            Value::Bool(false)
        ));
    }

    #[test]
    fn test_arity_enforced() {
        assert!(builtin_equal(&[Value::Int(1)]).is_err());
    }
}
