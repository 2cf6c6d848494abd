// ABOUTME: Value types representing the tagged sum shared by lexer, parser and evaluator

use crate::env::Environment;
use std::fmt;
use std::rc::Rc;

/// Parameter list shape for a user-defined procedure.
///
/// A closure is either fixed-arity (a proper list of distinct symbols) or
/// variadic (a single symbol bound to the whole argument list).
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Fixed(Vec<String>),
    Rest(String),
}

/// The data captured by a `lambda`: its parameter shape, its body (a
/// non-empty sequence of expressions), and the frame active when it was
/// created.
#[derive(Debug)]
pub struct ClosureData {
    pub params: Params,
    pub body: Vec<Value>,
    pub env: Rc<Environment>,
}

/// A built-in procedure. Carries its name so arity/type errors raised from
/// inside the function can name the offending call.
#[derive(Clone, Copy)]
pub struct Primitive {
    pub name: &'static str,
    pub func: fn(&[Value]) -> Result<Value, crate::error::EvalError>,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive({})", self.name)
    }
}

/// The one universal node type shared by the lexer's literal tokens, the
/// parser's trees, and the evaluator's results.
///
/// `Pair`'s two arms are `Rc` rather than `Box`: every argument binding and
/// every environment capture clones the spine of a list, which stays O(1)
/// per cons under `Rc` instead of a deep recursive clone under `Box`.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Symbol(String),
    Null,
    Pair(Rc<Value>, Rc<Value>),
    Closure(Rc<ClosureData>),
    Primitive(Primitive),
    /// No-value result of side-effecting forms (`define`, `set!`, `display`, …).
    /// Suppressed by the top-level printer.
    Void,
    /// Sentinel occupying a `letrec` slot before its initializer has run.
    /// Observing this through a symbol lookup is always an error.
    Unspecified,
}

impl Value {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::Null => "null",
            Value::Pair(..) => "pair",
            Value::Closure(_) => "procedure",
            Value::Primitive(_) => "procedure",
            Value::Void => "void",
            Value::Unspecified => "unspecified",
        }
    }
}

/// Builds a cons chain from `items`, terminated by `tail` (`Value::Null` for
/// a proper list, or any other value for an improper one).
pub fn list_from_vec(items: Vec<Value>, tail: Value) -> Value {
    let mut result = tail;
    for item in items.into_iter().rev() {
        result = Value::Pair(Rc::new(item), Rc::new(result));
    }
    result
}

/// Walks a cons chain into a `Vec`, returning `None` if it is not a proper
/// (null-terminated) list.
pub fn list_to_vec(value: &Value) -> Option<Vec<Value>> {
    let mut out = Vec::new();
    let mut current = value;
    loop {
        match current {
            Value::Null => return Some(out),
            Value::Pair(car, cdr) => {
                out.push((**car).clone());
                current = cdr;
            }
            _ => return None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:.6}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Null => write!(f, "()"),
            Value::Pair(car, cdr) => {
                write!(f, "(")?;
                write!(f, "{}", car)?;
                let mut rest: &Value = cdr;
                loop {
                    match rest {
                        Value::Null => break,
                        Value::Pair(car2, cdr2) => {
                            write!(f, " {}", car2)?;
                            rest = cdr2;
                        }
                        other => {
                            write!(f, " . {}", other)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Closure(_) => write!(f, "#<procedure>"),
            Value::Primitive(_) => write!(f, "#<procedure>"),
            Value::Void => Ok(()),
            Value::Unspecified => write!(f, "#<unspecified>"),
        }
    }
}
