use clap::Parser;
use little_lisp::error::InterpreterError;
use little_lisp::run_program;
use std::io::Read;
use std::process::ExitCode;

/// A small Scheme-flavored Lisp interpreter. Reads a program from standard
/// input and prints the result of every non-void top-level form.
#[derive(Parser, Debug)]
#[command(name = "lisp")]
#[command(version)]
#[command(about = "Evaluates a Lisp program read from stdin and prints its output")]
struct CliArgs;

fn main() -> ExitCode {
    let _args = CliArgs::parse();

    let source = match read_stdin() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match run_program(&source) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn read_stdin() -> std::io::Result<String> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Maps each pipeline stage to a distinct exit code: 1 for a lexer error,
/// 3 for a parser error, 4 for an evaluation error. Exit code 2, reserved
/// for an I/O failure reading stdin, is assigned in `main` before the
/// pipeline ever runs and so never reaches this function.
fn exit_code_for(err: &InterpreterError) -> u8 {
    match err {
        InterpreterError::Lex(_) => 1,
        InterpreterError::Parse(_) => 3,
        InterpreterError::Eval(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let lex = InterpreterError::Lex(little_lisp::error::LexError {
            line: 1,
            message: "bad".to_string(),
        });
        assert_eq!(exit_code_for(&lex), 1);

        let parse = InterpreterError::Parse(little_lisp::error::ParseError {
            line: None,
            message: "bad".to_string(),
        });
        assert_eq!(exit_code_for(&parse), 3);

        let eval = InterpreterError::Eval(little_lisp::error::EvalError::NotCallable);
        assert_eq!(exit_code_for(&eval), 4);
    }
}
