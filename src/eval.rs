// ABOUTME: Evaluator walking parsed expressions against a lexical environment

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{list_from_vec, list_to_vec, ClosureData, Params, Value};
use std::rc::Rc;

const SPECIAL_FORMS: &[&str] = &[
    "quote", "if", "when", "unless", "cond", "and", "or", "not", "begin", "let", "let*", "letrec",
    "letrec*", "lambda", "define", "set!", "display",
];

fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(&name)
}

/// Evaluates `expr` against `env`. `out` collects the text produced by every
/// `display` call, one entry per call — the caller decides what to do with
/// each line (print it, assert on it, …).
pub fn eval(expr: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    match expr {
        Value::Int(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Bool(_)
        | Value::Closure(_)
        | Value::Primitive(_) => Ok(expr.clone()),
        Value::Symbol(name) => lookup(name, env),
        Value::Pair(head, tail) => eval_pair(head, tail, env, out),
        Value::Null => Err(EvalError::BadSpecialForm {
            message: "cannot evaluate () as an expression".to_string(),
        }),
        Value::Void | Value::Unspecified => Ok(expr.clone()),
    }
}

fn lookup(name: &str, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match env.get(name) {
        Some(Value::Unspecified) => Err(EvalError::UnboundInLetrec(name.to_string())),
        Some(v) => Ok(v),
        None => Err(EvalError::UndefinedSymbol(name.to_string())),
    }
}

/// Dispatches a `(head . tail)` combination: a symbolic head that is bound
/// is applied as an ordinary value (so user code can shadow keywords); a
/// symbolic head that is unbound falls back to special-form dispatch only
/// if its name is one of the recognized keywords, and is an undefined-symbol
/// error otherwise. A non-symbolic head is evaluated and applied normally.
fn eval_pair(
    head: &Value,
    tail: &Value,
    env: &Rc<Environment>,
    out: &mut Vec<String>,
) -> Result<Value, EvalError> {
    if let Value::Symbol(name) = head {
        match env.get(name) {
            Some(Value::Unspecified) => return Err(EvalError::UnboundInLetrec(name.clone())),
            Some(bound) => {
                let args = eval_args(tail, env, out)?;
                return apply(bound, args, out);
            }
            None => {
                if is_special_form(name) {
                    return eval_special_form(name, tail, env, out);
                }
                return Err(EvalError::UndefinedSymbol(name.clone()));
            }
        }
    }

    let func = eval(head, env, out)?;
    let args = eval_args(tail, env, out)?;
    apply(func, args, out)
}

fn eval_args(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Vec<Value>, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "improper argument list in procedure call".to_string(),
    })?;
    items.iter().map(|e| eval(e, env, out)).collect()
}

/// Applies an already-evaluated procedure to already-evaluated arguments.
pub fn apply(func: Value, args: Vec<Value>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    match func {
        Value::Primitive(p) => (p.func)(&args),
        Value::Closure(c) => {
            let frame = Environment::with_parent(c.env.clone());
            match &c.params {
                Params::Rest(name) => {
                    frame.define(name.clone(), list_from_vec(args, Value::Null));
                }
                Params::Fixed(names) => {
                    if names.len() != args.len() {
                        return Err(EvalError::arity(
                            "#<procedure>",
                            names.len().to_string(),
                            args.len(),
                        ));
                    }
                    for (name, arg) in names.iter().zip(args.into_iter()) {
                        frame.define(name.clone(), arg);
                    }
                }
            }
            eval_sequence(&c.body, &frame, out)
        }
        _ => Err(EvalError::NotCallable),
    }
}

fn eval_sequence(body: &[Value], env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let mut result = Value::Void;
    for expr in body {
        result = eval(expr, env, out)?;
    }
    Ok(result)
}

fn require_bool(v: Value, context: &str) -> Result<bool, EvalError> {
    match v {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::wrong_type(context, "boolean", other.type_name())),
    }
}

fn symbol_name(v: &Value, context: &str) -> Result<String, EvalError> {
    match v {
        Value::Symbol(s) => Ok(s.clone()),
        other => Err(EvalError::wrong_type(context, "symbol", other.type_name())),
    }
}

fn eval_special_form(
    name: &str,
    tail: &Value,
    env: &Rc<Environment>,
    out: &mut Vec<String>,
) -> Result<Value, EvalError> {
    match name {
        "quote" => eval_quote(tail),
        "if" => eval_if(tail, env, out),
        "when" => eval_when_unless(tail, env, out, true),
        "unless" => eval_when_unless(tail, env, out, false),
        "cond" => eval_cond(tail, env, out),
        "and" => eval_and(tail, env, out),
        "or" => eval_or(tail, env, out),
        "not" => eval_not(tail, env, out),
        "begin" => {
            let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
                message: "begin: improper body".to_string(),
            })?;
            eval_sequence(&items, env, out)
        }
        "let" => eval_let(tail, env, out),
        "let*" => eval_let_star(tail, env, out),
        "letrec" => eval_letrec(tail, env, out, false),
        "letrec*" => eval_letrec(tail, env, out, true),
        "lambda" => eval_lambda(tail, env),
        "define" => eval_define(tail, env, out),
        "set!" => eval_set(tail, env, out),
        "display" => eval_display(tail, env, out),
        _ => unreachable!("is_special_form guarantees `name` is one of the handled cases"),
    }
}

fn eval_quote(tail: &Value) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "quote: malformed form".to_string(),
    })?;
    if items.len() != 1 {
        return Err(EvalError::arity("quote", "1", items.len()));
    }
    Ok(items[0].clone())
}

fn eval_if(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "if: malformed form".to_string(),
    })?;
    if items.len() != 2 && items.len() != 3 {
        return Err(EvalError::arity("if", "2-3", items.len()));
    }
    let cond = require_bool(eval(&items[0], env, out)?, "if")?;
    if cond {
        eval(&items[1], env, out)
    } else if items.len() == 3 {
        eval(&items[2], env, out)
    } else {
        Ok(Value::Void)
    }
}

fn eval_when_unless(
    tail: &Value,
    env: &Rc<Environment>,
    out: &mut Vec<String>,
    is_when: bool,
) -> Result<Value, EvalError> {
    let context = if is_when { "when" } else { "unless" };
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: format!("{}: malformed form", context),
    })?;
    if items.is_empty() {
        return Err(EvalError::arity(context, "at least 1", 0));
    }
    let cond = require_bool(eval(&items[0], env, out)?, context)?;
    if cond == is_when {
        eval_sequence(&items[1..], env, out)
    } else {
        Ok(Value::Void)
    }
}

fn eval_cond(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let clauses = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "cond: malformed form".to_string(),
    })?;
    let last_index = clauses.len().checked_sub(1);

    for (i, clause) in clauses.iter().enumerate() {
        let parts = list_to_vec(clause).ok_or_else(|| EvalError::BadSpecialForm {
            message: "cond: each clause must be a list".to_string(),
        })?;
        if parts.is_empty() {
            return Err(EvalError::BadSpecialForm {
                message: "cond: empty clause".to_string(),
            });
        }

        let is_else = matches!(&parts[0], Value::Symbol(s) if s == "else");
        if is_else {
            if Some(i) != last_index {
                return Err(EvalError::MisplacedElse);
            }
            return eval_sequence(&parts[1..], env, out);
        }

        let matched = require_bool(eval(&parts[0], env, out)?, "cond")?;
        if matched {
            return eval_sequence(&parts[1..], env, out);
        }
    }

    Ok(Value::Void)
}

fn eval_and(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "and: malformed form".to_string(),
    })?;
    let mut last = Value::Bool(true);
    for item in &items {
        let v = eval(item, env, out)?;
        let b = require_bool(v.clone(), "and")?;
        if !b {
            return Ok(Value::Bool(false));
        }
        last = v;
    }
    Ok(last)
}

fn eval_or(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "or: malformed form".to_string(),
    })?;
    for item in &items {
        let v = eval(item, env, out)?;
        let b = require_bool(v.clone(), "or")?;
        if b {
            return Ok(v);
        }
    }
    Ok(Value::Bool(false))
}

fn eval_not(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "not: malformed form".to_string(),
    })?;
    if items.len() != 1 {
        return Err(EvalError::arity("not", "1", items.len()));
    }
    let b = require_bool(eval(&items[0], env, out)?, "not")?;
    Ok(Value::Bool(!b))
}

/// Shared by `let` and `let*`: parses a `((name expr) ...)` binding list,
/// rejecting non-symbol names and (for `let`) duplicate names.
fn parse_bindings(
    bindings_form: &Value,
    context: &str,
    reject_duplicates: bool,
) -> Result<Vec<(String, Value)>, EvalError> {
    let raw = list_to_vec(bindings_form).ok_or_else(|| EvalError::BadSpecialForm {
        message: format!("{}: malformed binding list", context),
    })?;
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for binding in raw {
        let pair = list_to_vec(&binding).ok_or_else(|| EvalError::BadSpecialForm {
            message: format!("{}: each binding must be a (name expr) pair", context),
        })?;
        if pair.len() != 2 {
            return Err(EvalError::BadSpecialForm {
                message: format!("{}: each binding must be a (name expr) pair", context),
            });
        }
        let name = symbol_name(&pair[0], context)?;
        if reject_duplicates && !seen.insert(name.clone()) {
            return Err(EvalError::DuplicateBinding {
                name,
                context: context.to_string(),
            });
        }
        out.push((name, pair[1].clone()));
    }
    Ok(out)
}

fn eval_let(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "let: malformed form".to_string(),
    })?;
    if items.is_empty() {
        return Err(EvalError::arity("let", "at least 1", 0));
    }
    let bindings = parse_bindings(&items[0], "let", true)?;

    // Every right-hand side is evaluated against the *enclosing* frame,
    // before any of the new names come into scope.
    let mut values = Vec::with_capacity(bindings.len());
    for (_, expr) in &bindings {
        values.push(eval(expr, env, out)?);
    }

    let frame = Environment::with_parent(env.clone());
    for ((name, _), value) in bindings.into_iter().zip(values.into_iter()) {
        frame.define(name, value);
    }
    eval_sequence(&items[1..], &frame, out)
}

fn eval_let_star(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "let*: malformed form".to_string(),
    })?;
    if items.is_empty() {
        return Err(EvalError::arity("let*", "at least 1", 0));
    }
    // let* permits rebinding a name already bound earlier in the same
    // form (the later binding simply shadows the earlier one), so
    // duplicates are not rejected here.
    let bindings = parse_bindings(&items[0], "let*", false)?;

    // Each binding gets its own child frame nested inside the previous
    // one, rather than one shared frame: a closure created by an earlier
    // binding's initializer captures the frame as it existed at that
    // point, so a later binding reusing the same name must not overwrite
    // the slot that closure already captured.
    let mut frame = env.clone();
    for (name, expr) in bindings {
        let value = eval(&expr, &frame, out)?;
        let child = Environment::with_parent(frame.clone());
        child.define(name, value);
        frame = child;
    }
    eval_sequence(&items[1..], &frame, out)
}

fn eval_letrec(
    tail: &Value,
    env: &Rc<Environment>,
    out: &mut Vec<String>,
    sequential: bool,
) -> Result<Value, EvalError> {
    let context = if sequential { "letrec*" } else { "letrec" };
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: format!("{}: malformed form", context),
    })?;
    if items.is_empty() {
        return Err(EvalError::arity(context, "at least 1", 0));
    }
    let bindings = parse_bindings(&items[0], context, true)?;

    let frame = Environment::with_parent(env.clone());
    for (name, _) in &bindings {
        frame.define(name.clone(), Value::Unspecified);
    }

    if sequential {
        for (name, expr) in &bindings {
            let value = eval(expr, &frame, out)?;
            frame.define(name.clone(), value);
        }
    } else {
        let mut values = Vec::with_capacity(bindings.len());
        for (_, expr) in &bindings {
            values.push(eval(expr, &frame, out)?);
        }
        for ((name, _), value) in bindings.into_iter().zip(values.into_iter()) {
            frame.define(name, value);
        }
    }

    eval_sequence(&items[1..], &frame, out)
}

fn eval_lambda(tail: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "lambda: malformed form".to_string(),
    })?;
    if items.len() < 2 {
        return Err(EvalError::arity("lambda", "at least 2", items.len()));
    }

    let params = match &items[0] {
        Value::Symbol(name) => Params::Rest(name.clone()),
        other => {
            let names = list_to_vec(other).ok_or_else(|| EvalError::BadSpecialForm {
                message: "lambda: parameter list must be a proper list of symbols or a single symbol"
                    .to_string(),
            })?;
            let mut seen = std::collections::HashSet::new();
            let mut fixed = Vec::with_capacity(names.len());
            for n in names {
                let s = symbol_name(&n, "lambda")?;
                if !seen.insert(s.clone()) {
                    return Err(EvalError::DuplicateBinding {
                        name: s,
                        context: "lambda".to_string(),
                    });
                }
                fixed.push(s);
            }
            Params::Fixed(fixed)
        }
    };

    Ok(Value::Closure(Rc::new(ClosureData {
        params,
        body: items[1..].to_vec(),
        env: env.clone(),
    })))
}

fn eval_define(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "define: malformed form".to_string(),
    })?;
    if items.is_empty() {
        return Err(EvalError::arity("define", "at least 2", items.len()));
    }

    match &items[0] {
        Value::Symbol(name) => {
            if items.len() != 2 {
                return Err(EvalError::arity("define", "2", items.len()));
            }
            let value = eval(&items[1], env, out)?;
            env.define(name.clone(), value);
            Ok(Value::Void)
        }
        Value::Pair(..) | Value::Null => {
            // (define (f params...) body...) sugar for (define f (lambda (params...) body...))
            let signature =
                list_to_vec(&items[0]).ok_or_else(|| EvalError::BadSpecialForm {
                    message: "define: malformed procedure signature".to_string(),
                })?;
            if signature.is_empty() {
                return Err(EvalError::BadSpecialForm {
                    message: "define: procedure signature is missing a name".to_string(),
                });
            }
            let name = symbol_name(&signature[0], "define")?;
            if items.len() < 2 {
                return Err(EvalError::arity("define", "at least 2", items.len()));
            }
            let mut seen = std::collections::HashSet::new();
            let mut params = Vec::with_capacity(signature.len() - 1);
            for p in &signature[1..] {
                let s = symbol_name(p, "define")?;
                if !seen.insert(s.clone()) {
                    return Err(EvalError::DuplicateBinding {
                        name: s,
                        context: "define".to_string(),
                    });
                }
                params.push(s);
            }
            let closure = Value::Closure(Rc::new(ClosureData {
                params: Params::Fixed(params),
                body: items[1..].to_vec(),
                env: env.clone(),
            }));
            env.define(name, closure);
            Ok(Value::Void)
        }
        other => Err(EvalError::wrong_type("define", "symbol or list", other.type_name())),
    }
}

fn eval_set(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "set!: malformed form".to_string(),
    })?;
    if items.len() != 2 {
        return Err(EvalError::arity("set!", "2", items.len()));
    }
    let name = symbol_name(&items[0], "set!")?;
    let value = eval(&items[1], env, out)?;
    env.set(&name, value)?;
    Ok(Value::Void)
}

fn eval_display(tail: &Value, env: &Rc<Environment>, out: &mut Vec<String>) -> Result<Value, EvalError> {
    let items = list_to_vec(tail).ok_or_else(|| EvalError::BadSpecialForm {
        message: "display: malformed form".to_string(),
    })?;
    if items.len() != 1 {
        return Err(EvalError::arity("display", "1", items.len()));
    }
    let value = eval(&items[0], env, out)?;
    out.push(format!("{}", value));
    Ok(Value::Void)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;
    use crate::parser::parse;
    use crate::lexer::tokenize;

    fn eval_all(src: &str) -> (Vec<Value>, Vec<String>) {
        let tokens = tokenize(src).unwrap();
        let forms = parse(&tokens).unwrap();
        let env = Environment::new();
        register_builtins(&env);
        let mut out = Vec::new();
        let results = forms
            .iter()
            .map(|f| eval(f, &env, &mut out).unwrap())
            .collect();
        (results, out)
    }

    fn eval_one(src: &str) -> Value {
        eval_all(src).0.pop().unwrap()
    }

    #[test]
    fn test_self_evaluating_atoms() {
        assert!(matches!(eval_one("42"), Value::Int(42)));
        assert!(matches!(eval_one("#t"), Value::Bool(true)));
        assert!(matches!(eval_one("\"hi\""), Value::Str(ref s) if s == "hi"));
    }

    #[test]
    fn test_quote_returns_unevaluated_datum() {
        let v = eval_one("'(a b c)");
        assert_eq!(format!("{}", v), "(a b c)");
    }

    #[test]
    fn test_if_both_branches() {
        assert!(matches!(eval_one("(if #t 1 2)"), Value::Int(1)));
        assert!(matches!(eval_one("(if #f 1 2)"), Value::Int(2)));
        assert!(matches!(eval_one("(if #f 1)"), Value::Void));
    }

    #[test]
    fn test_when_unless() {
        assert!(matches!(eval_one("(when #t 1 2 3)"), Value::Int(3)));
        assert!(matches!(eval_one("(unless #f 1 2 3)"), Value::Int(3)));
        assert!(matches!(eval_one("(when #f 1)"), Value::Void));
    }

    #[test]
    fn test_cond_with_else() {
        let v = eval_one("(cond (#f 1) (#f 2) (else 3))");
        assert!(matches!(v, Value::Int(3)));
    }

    #[test]
    fn test_cond_misplaced_else_errors() {
        let tokens = tokenize("(cond (else 1) (#t 2))").unwrap();
        let forms = parse(&tokens).unwrap();
        let env = Environment::new();
        register_builtins(&env);
        let mut out = Vec::new();
        let err = eval(&forms[0], &env, &mut out).unwrap_err();
        assert!(matches!(err, EvalError::MisplacedElse));
    }

    #[test]
    fn test_and_or_short_circuit() {
        assert!(matches!(eval_one("(and #t #t)"), Value::Bool(true)));
        assert!(matches!(eval_one("(and #t #f)"), Value::Bool(false)));
        assert!(matches!(eval_one("(or #f #t)"), Value::Bool(true)));
        assert!(matches!(eval_one("(or #f #f)"), Value::Bool(false)));
        // short circuit: the unbound symbol is never reached
        assert!(matches!(eval_one("(and #f bogus)"), Value::Bool(false)));
        assert!(matches!(eval_one("(or #t bogus)"), Value::Bool(true)));
    }

    #[test]
    fn test_not() {
        assert!(matches!(eval_one("(not #t)"), Value::Bool(false)));
        assert!(matches!(eval_one("(not #f)"), Value::Bool(true)));
    }

    #[test]
    fn test_let_does_not_see_sibling_bindings() {
        // y's initializer is evaluated in the enclosing scope, so it can't
        // see x even though x is bound earlier in the same let.
        let tokens = tokenize("(let ((x 1) (y x)) y)").unwrap();
        let forms = parse(&tokens).unwrap();
        let env = Environment::new();
        register_builtins(&env);
        let mut out = Vec::new();
        assert!(eval(&forms[0], &env, &mut out).is_err());
    }

    #[test]
    fn test_let_star_sees_sibling_bindings() {
        assert!(matches!(eval_one("(let* ((x 1) (y (+ x 1))) y)"), Value::Int(2)));
    }

    #[test]
    fn test_let_star_duplicate_name_does_not_retroactively_rebind_earlier_closure() {
        // f closes over x while it's still bound to 1, in the frame that
        // precedes the second (x 2) binding. Rebinding x afterward must not
        // reach back into the frame f already captured.
        let src = "(let* ((x 1) (f (lambda () x)) (x 2)) (f))";
        assert!(matches!(eval_one(src), Value::Int(1)));
    }

    #[test]
    fn test_let_rejects_duplicate_names() {
        let tokens = tokenize("(let ((x 1) (x 2)) x)").unwrap();
        let forms = parse(&tokens).unwrap();
        let env = Environment::new();
        register_builtins(&env);
        let mut out = Vec::new();
        assert!(eval(&forms[0], &env, &mut out).is_err());
    }

    #[test]
    fn test_letrec_mutual_recursion() {
        let src = "(letrec ((even? (lambda (n) (if (= n 0) #t (odd? (- n 1)))))
                            (odd? (lambda (n) (if (= n 0) #f (even? (- n 1))))))
                     (even? 10))";
        assert!(matches!(eval_one(src), Value::Bool(true)));
    }

    #[test]
    fn test_letrec_forward_reference_before_init_errors() {
        let tokens = tokenize("(letrec ((x y) (y 1)) x)").unwrap();
        let forms = parse(&tokens).unwrap();
        let env = Environment::new();
        register_builtins(&env);
        let mut out = Vec::new();
        let err = eval(&forms[0], &env, &mut out).unwrap_err();
        assert!(matches!(err, EvalError::UnboundInLetrec(_)));
    }

    #[test]
    fn test_lambda_fixed_arity() {
        assert!(matches!(eval_one("((lambda (x y) (+ x y)) 2 3)"), Value::Int(5)));
    }

    #[test]
    fn test_lambda_variadic() {
        assert!(matches!(eval_one("((lambda xs (car xs)) 7 8 9)"), Value::Int(7)));
    }

    #[test]
    fn test_define_value_and_function_sugar() {
        let src = "(define x 10) (define (sq n) (* n n)) (sq x)";
        assert!(matches!(eval_one(src), Value::Int(100)));
    }

    #[test]
    fn test_recursive_define_factorial() {
        let src = "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 5)";
        assert!(matches!(eval_one(src), Value::Int(120)));
    }

    #[test]
    fn test_set_mutates_captured_binding() {
        let src = "(define (make-counter)
                     (let ((n 0))
                       (lambda () (set! n (+ n 1)) n)))
                   (define c (make-counter))
                   (c) (c) (c)";
        let (results, _) = eval_all(src);
        assert!(matches!(results[results.len() - 3], Value::Int(1)));
        assert!(matches!(results[results.len() - 2], Value::Int(2)));
        assert!(matches!(results[results.len() - 1], Value::Int(3)));
    }

    #[test]
    fn test_display_collects_output_without_trailing_value() {
        let (_, out) = eval_all("(display 1) (display \"x\")");
        assert_eq!(out, vec!["1".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_shadowing_if_as_ordinary_binding() {
        // Once `if` is bound as an ordinary value, uses of it are an
        // ordinary procedure call rather than the special form.
        let src = "(define if (lambda (a b c) a)) (if 1 2 3)";
        assert!(matches!(eval_one(src), Value::Int(1)));
    }

    #[test]
    fn test_undefined_symbol_errors() {
        let tokens = tokenize("bogus").unwrap();
        let forms = parse(&tokens).unwrap();
        let env = Environment::new();
        register_builtins(&env);
        let mut out = Vec::new();
        assert!(eval(&forms[0], &env, &mut out).is_err());
    }
}
