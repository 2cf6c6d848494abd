// ABOUTME: Library module exposing internal components for testing

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

use env::Environment;
use error::InterpreterError;
use value::Value;

/// Tokenizes, parses and evaluates `source` top to bottom against a fresh
/// global environment seeded with every built-in procedure.
///
/// Returns one line of output per `display` call plus one additional line
/// per top-level form whose result is not `Value::Void` — matching a REPL
/// that echoes the value of every non-side-effecting form it's given.
pub fn run_program(source: &str) -> Result<Vec<String>, InterpreterError> {
    let tokens = lexer::tokenize(source)?;
    let forms = parser::parse(&tokens)?;

    let env = Environment::new();
    builtins::register_builtins(&env);

    let mut out = Vec::new();
    for form in &forms {
        let result = eval::eval(form, &env, &mut out)?;
        if !matches!(result, Value::Void) {
            out.push(format!("{}", result));
        }
    }
    Ok(out)
}
