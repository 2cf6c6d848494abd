//! List operations: cons, car, cdr, null?, list, append
//!
//! - `cons`: Construct a pair from two values (supports improper pairs)
//! - `car`: Get the first element of a pair
//! - `cdr`: Get the second element (rest) of a pair
//! - `null?`: Test whether a value is the empty list
//! - `list`: Create a proper list from arguments
//! - `append`: Concatenate proper lists, with the final argument as the tail

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{list_from_vec, list_to_vec, Primitive, Value};
use std::rc::Rc;

/// Constructs a pair from two values.
///
/// Unlike `list`, `cons` does not require its second argument to be a
/// list — `(cons 1 2)` builds the improper pair `(1 . 2)`.
///
/// # Examples
///
/// ```lisp
/// (cons 1 '(2 3)) => (1 2 3)
/// (cons 1 2) => (1 . 2)
/// ```
pub fn builtin_cons(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity("cons", "2", args.len()));
    }
    Ok(Value::Pair(
        Rc::new(args[0].clone()),
        Rc::new(args[1].clone()),
    ))
}

/// Returns the first element of a pair.
///
/// # Examples
///
/// ```lisp
/// (car '(1 2 3)) => 1
/// ```
pub fn builtin_car(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity("car", "1", args.len()));
    }
    match &args[0] {
        Value::Pair(car, _) => Ok((**car).clone()),
        other => Err(EvalError::wrong_type("car", "pair", other.type_name())),
    }
}

/// Returns everything but the first element of a pair.
///
/// # Examples
///
/// ```lisp
/// (cdr '(1 2 3)) => (2 3)
/// ```
pub fn builtin_cdr(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity("cdr", "1", args.len()));
    }
    match &args[0] {
        Value::Pair(_, cdr) => Ok((**cdr).clone()),
        other => Err(EvalError::wrong_type("cdr", "pair", other.type_name())),
    }
}

/// Tests whether a value is the empty list.
///
/// # Examples
///
/// ```lisp
/// (null? '()) => #t
/// (null? '(1)) => #f
/// ```
pub fn builtin_null_q(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity("null?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Null)))
}

/// Builds a proper list from its arguments, in order.
///
/// # Examples
///
/// ```lisp
/// (list 1 2 3) => (1 2 3)
/// (list) => ()
/// ```
pub fn builtin_list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(list_from_vec(args.to_vec(), Value::Null))
}

/// Concatenates its arguments. Every argument but the last must be a proper
/// list; the final argument becomes the tail of the result verbatim, so
/// `append` can produce an improper list when called with a non-list final
/// argument.
///
/// # Examples
///
/// ```lisp
/// (append '(1 2) '(3 4)) => (1 2 3 4)
/// (append '(1) '(2) 3) => (1 2 . 3)
/// (append) => ()
/// ```
pub fn builtin_append(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Ok(Value::Null);
    }
    let (init, last) = args.split_at(args.len() - 1);
    let mut items = Vec::new();
    for arg in init {
        let elems = list_to_vec(arg)
            .ok_or_else(|| EvalError::wrong_type("append", "proper list", arg.type_name()))?;
        items.extend(elems);
    }
    Ok(list_from_vec(items, last[0].clone()))
}

/// Registers `cons car cdr null? list append` in the environment.
pub fn register(env: &Rc<Environment>) {
    env.define(
        "cons".to_string(),
        Value::Primitive(Primitive {
            name: "cons",
            func: builtin_cons,
        }),
    );
    env.define(
        "car".to_string(),
        Value::Primitive(Primitive {
            name: "car",
            func: builtin_car,
        }),
    );
    env.define(
        "cdr".to_string(),
        Value::Primitive(Primitive {
            name: "cdr",
            func: builtin_cdr,
        }),
    );
    env.define(
        "null?".to_string(),
        Value::Primitive(Primitive {
            name: "null?",
            func: builtin_null_q,
        }),
    );
    env.define(
        "list".to_string(),
        Value::Primitive(Primitive {
            name: "list",
            func: builtin_list,
        }),
    );
    env.define(
        "append".to_string(),
        Value::Primitive(Primitive {
            name: "append",
            func: builtin_append,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cons_builds_proper_list() {
        let rest = list_from_vec(vec![Value::Int(2), Value::Int(3)], Value::Null);
        let result = builtin_cons(&[Value::Int(1), rest]).unwrap();
        assert_eq!(format!("{}", result), "(1 2 3)");
    }

    #[test]
    fn test_cons_builds_improper_pair() {
        let result = builtin_cons(&[Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(format!("{}", result), "(1 . 2)");
    }

    #[test]
    fn test_car_and_cdr() {
        let list = list_from_vec(vec![Value::Int(1), Value::Int(2)], Value::Null);
        assert!(matches!(builtin_car(&[list.clone()]).unwrap(), Value::Int(1)));
        assert_eq!(format!("{}", builtin_cdr(&[list]).unwrap()), "(2)");
    }

    #[test]
    fn test_car_cdr_require_pair() {
        assert!(builtin_car(&[Value::Null]).is_err());
        assert!(builtin_cdr(&[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_null_q() {
        assert!(matches!(
            builtin_null_q(&[Value::Null]).unwrap(),
            Value::Bool(true)
        ));
        assert!(matches!(
            builtin_null_q(&[Value::Int(0)]).unwrap(),
            Value::Bool(false)
        ));
    }

    #[test]
    fn test_list_builds_proper_list_and_empty() {
        let result = builtin_list(&[Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap();
        assert_eq!(format!("{}", result), "(1 2 3)");
        assert!(matches!(builtin_list(&[]).unwrap(), Value::Null));
    }

    #[test]
    fn test_append_concatenates() {
        let a = list_from_vec(vec![Value::Int(1), Value::Int(2)], Value::Null);
        let b = list_from_vec(vec![Value::Int(3), Value::Int(4)], Value::Null);
        let result = builtin_append(&[a, b]).unwrap();
        assert_eq!(format!("{}", result), "(1 2 3 4)");
    }

    #[test]
    fn test_append_final_arg_becomes_tail_verbatim() {
        let a = list_from_vec(vec![Value::Int(1)], Value::Null);
        let b = list_from_vec(vec![Value::Int(2)], Value::Null);
        let result = builtin_append(&[a, b, Value::Int(3)]).unwrap();
        assert_eq!(format!("{}", result), "(1 2 . 3)");
    }

    #[test]
    fn test_append_no_args_is_null() {
        assert!(matches!(builtin_append(&[]).unwrap(), Value::Null));
    }

    #[test]
    fn test_append_rejects_improper_non_final_arg() {
        let improper = Value::Pair(Rc::new(Value::Int(1)), Rc::new(Value::Int(2)));
        assert!(builtin_append(&[improper, Value::Null]).is_err());
    }
}
