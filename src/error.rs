// ABOUTME: Error types for the lexer, parser and evaluator stages

use thiserror::Error;

/// Error raised while turning source text into tokens.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub line: u32,
    pub message: String,
}

/// Error raised while folding tokens into `Value` trees.
///
/// Some failures (an empty token stream, an unclosed bracket discovered only
/// at end-of-input) have no single offending line, hence `Option<u32>`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}{}", .line.map(|l| format!("line {}: ", l)).unwrap_or_default(), message)]
pub struct ParseError {
    pub line: Option<u32>,
    pub message: String,
}

#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// A symbol resolved to a `letrec` slot whose initializer hasn't run yet.
    #[error("{0} used before its letrec binding was initialized")]
    UnboundInLetrec(String),

    #[error("{context}: expected {expected}, got {got}")]
    WrongType {
        context: String,
        expected: String,
        got: String,
    },

    #[error("{context}: expected {expected} argument{}, got {got}", if *.expected == "1" { "" } else { "s" })]
    ArityMismatch {
        context: String,
        expected: String,
        got: usize,
    },

    #[error("value is not callable")]
    NotCallable,

    #[error("duplicate binding '{name}' in {context}")]
    DuplicateBinding { name: String, context: String },

    #[error("'else' clause must be the last clause in cond")]
    MisplacedElse,

    #[error("division by zero")]
    DivideByZero,

    #[error("{message}")]
    BadSpecialForm { message: String },
}

impl EvalError {
    pub fn wrong_type(context: &str, expected: &str, got: &str) -> Self {
        EvalError::WrongType {
            context: context.to_string(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    pub fn arity(context: &str, expected: impl Into<String>, got: usize) -> Self {
        EvalError::ArityMismatch {
            context: context.to_string(),
            expected: expected.into(),
            got,
        }
    }
}

/// Top-level error wrapping all three pipeline stages. Only `main` needs
/// this; library code propagates the stage-specific errors directly.
#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
