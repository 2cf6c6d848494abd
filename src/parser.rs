// ABOUTME: Parser folding a token stream into Value trees (bracket folding, then quote/dot sugar)

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::value::Value;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone, Copy)]
enum BracketKind {
    Paren,
    Bracket,
}

/// An intermediate node from pass 1. `Quote` and `Dot` stay unresolved
/// markers here — they're lexer-only tags that must never reach `Value` —
/// until pass 2 rewrites them away.
#[derive(Debug, Clone)]
enum Raw {
    Atom(Value),
    List(Vec<Raw>),
    Quote,
    Dot,
}

/// Pass 1: folds brackets into a tree of `Raw` nodes, checking that every
/// opener has a matching closer of the *same* kind (`(` only closes with
/// `)`, `[` only with `]`) and that no bracket is left open at end of input.
fn fold_brackets(tokens: &[Token]) -> Result<Vec<Raw>, ParseError> {
    let mut stack: Vec<(BracketKind, Vec<Raw>)> = Vec::new();
    let mut top: Vec<Raw> = Vec::new();

    for tok in tokens {
        let raw = match &tok.kind {
            TokenKind::OpenParen => {
                stack.push((BracketKind::Paren, Vec::new()));
                continue;
            }
            TokenKind::OpenBracket => {
                stack.push((BracketKind::Bracket, Vec::new()));
                continue;
            }
            TokenKind::CloseParen | TokenKind::CloseBracket => {
                let want = if matches!(tok.kind, TokenKind::CloseParen) {
                    BracketKind::Paren
                } else {
                    BracketKind::Bracket
                };
                let (kind, items) = stack.pop().ok_or_else(|| ParseError {
                    line: Some(tok.line),
                    message: "close bracket with no matching open bracket".to_string(),
                })?;
                if kind != want {
                    return Err(ParseError {
                        line: Some(tok.line),
                        message: "mismatched bracket kinds, e.g. '(' closed by ']'".to_string(),
                    });
                }
                Raw::List(items)
            }
            TokenKind::Quote => Raw::Quote,
            TokenKind::Dot => Raw::Dot,
            TokenKind::Int(n) => Raw::Atom(Value::Int(*n)),
            TokenKind::Float(n) => Raw::Atom(Value::Float(*n)),
            TokenKind::Str(s) => Raw::Atom(Value::Str(s.clone())),
            TokenKind::Bool(b) => Raw::Atom(Value::Bool(*b)),
            TokenKind::Symbol(s) => Raw::Atom(Value::Symbol(s.clone())),
        };

        match stack.last_mut() {
            Some((_, items)) => items.push(raw),
            None => top.push(raw),
        }
    }

    if !stack.is_empty() {
        return Err(ParseError {
            line: None,
            message: "open bracket with no matching close bracket".to_string(),
        });
    }

    Ok(top)
}

fn quote_wrap(inner: Value) -> Value {
    Value::Pair(
        Rc::new(Value::Symbol("quote".to_string())),
        Rc::new(Value::Pair(Rc::new(inner), Rc::new(Value::Null))),
    )
}

fn build_pair_chain(elems: Vec<Value>, tail: Value) -> Value {
    let mut result = tail;
    for elem in elems.into_iter().rev() {
        result = Value::Pair(Rc::new(elem), Rc::new(result));
    }
    result
}

/// Resolves exactly one expression starting at `items[*i]`, advancing `*i`
/// past it. A `Quote` consumes itself plus the expression that follows
/// (recursively, so `''x` becomes `(quote (quote x))`); a bare `Dot` here is
/// always a syntax error (it is only meaningful inside `rewrite_list`).
fn rewrite_expr(items: &[Raw], i: &mut usize) -> Result<Value, ParseError> {
    match items.get(*i) {
        None => Err(ParseError {
            line: None,
            message: "quote with nothing to quote".to_string(),
        }),
        Some(Raw::Quote) => {
            *i += 1;
            let inner = rewrite_expr(items, i)?;
            Ok(quote_wrap(inner))
        }
        Some(Raw::Dot) => Err(ParseError {
            line: None,
            message: "'.' may only appear inside a list, before its final element".to_string(),
        }),
        Some(Raw::Atom(v)) => {
            let v = v.clone();
            *i += 1;
            Ok(v)
        }
        Some(Raw::List(inner)) => {
            *i += 1;
            rewrite_list(inner)
        }
    }
}

/// Resolves an entire list's contents into a (possibly improper) `Value`
/// cons chain, honoring a `Dot` that appears immediately before the final
/// element.
fn rewrite_list(raw_items: &[Raw]) -> Result<Value, ParseError> {
    let mut elems = Vec::new();
    let mut i = 0;
    let mut tail = Value::Null;

    while i < raw_items.len() {
        if let Raw::Dot = raw_items[i] {
            i += 1;
            if i >= raw_items.len() {
                return Err(ParseError {
                    line: None,
                    message: "'.' at the end of a list with nothing following it".to_string(),
                });
            }
            tail = rewrite_expr(raw_items, &mut i)?;
            if i != raw_items.len() {
                return Err(ParseError {
                    line: None,
                    message: "'.' must be followed by exactly one element before the close"
                        .to_string(),
                });
            }
            break;
        }
        elems.push(rewrite_expr(raw_items, &mut i)?);
    }

    Ok(build_pair_chain(elems, tail))
}

/// Pass 2, applied at the top level: resolves every top-level `Raw` node
/// (which may itself include quote/dot markers interleaved with atoms and
/// lists) into the final sequence of top-level forms.
fn rewrite_top(raw_items: Vec<Raw>) -> Result<Vec<Value>, ParseError> {
    let mut i = 0;
    let mut out = Vec::new();
    while i < raw_items.len() {
        out.push(rewrite_expr(&raw_items, &mut i)?);
    }
    Ok(out)
}

/// Parses a full token stream into the list of top-level forms.
pub fn parse(tokens: &[Token]) -> Result<Vec<Value>, ParseError> {
    let raw = fold_brackets(tokens)?;
    rewrite_top(raw)
}
