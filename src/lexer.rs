// ABOUTME: Tokenizer turning source text into the lexical token stream

use crate::error::LexError;
use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::pair,
    IResult,
};

/// The lexical tags of a token. Purely lexer-internal tags (the bracket and
/// sugar markers) never survive into `value::Value` — the parser consumes
/// them while building its tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Symbol(String),
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Dot,
    Quote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | ';' | '(' | ')' | '[' | ']' | '"' | '#')
}

fn symbol_initial(c: char) -> bool {
    c.is_ascii_alphabetic() || "!$%&*/:<=>?^_~".contains(c)
}

fn symbol_subsequent(c: char) -> bool {
    symbol_initial(c) || c.is_ascii_digit() || ".+-@".contains(c)
}

fn number_body(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    ))(input)
}

fn is_integer(token: &str) -> bool {
    all_consuming(recognize(pair(opt(one_of("+-")), digit1)))(token).is_ok()
}

fn is_float(token: &str) -> bool {
    all_consuming(number_body)(token).is_ok()
}

fn is_symbol(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if symbol_initial(c) => chars.all(symbol_subsequent),
        _ => false,
    }
}

fn classify_token(buf: &str, line: u32) -> Result<TokenKind, LexError> {
    let first = buf.chars().next().expect("read_token never returns empty");

    if first == '+' || first == '-' {
        if buf.len() == 1 {
            return Ok(TokenKind::Symbol(buf.to_string()));
        }
        if is_integer(buf) {
            return Ok(TokenKind::Int(buf.parse().unwrap()));
        }
        if is_float(buf) {
            return Ok(TokenKind::Float(buf.parse().unwrap()));
        }
        return Err(LexError {
            line,
            message: format!(
                "symbols may not begin with '{}' unless the whole symbol is '{}': '{}'",
                first, first, buf
            ),
        });
    }

    if first == '.' {
        if buf.len() == 1 {
            return Ok(TokenKind::Dot);
        }
        if buf == "..." {
            return Ok(TokenKind::Symbol(buf.to_string()));
        }
        if is_float(buf) {
            return Ok(TokenKind::Float(buf.parse().unwrap()));
        }
        return Err(LexError {
            line,
            message: format!("malformed token beginning with '.': '{}'", buf),
        });
    }

    if first.is_ascii_digit() {
        if is_integer(buf) {
            return Ok(TokenKind::Int(buf.parse().unwrap()));
        }
        if is_float(buf) {
            return Ok(TokenKind::Float(buf.parse().unwrap()));
        }
        return Err(LexError {
            line,
            message: format!("symbols may not begin with a digit: '{}'", buf),
        });
    }

    if is_symbol(buf) {
        Ok(TokenKind::Symbol(buf.to_string()))
    } else {
        Err(LexError {
            line,
            message: format!("token contains an invalid character: '{}'", buf),
        })
    }
}

/// Reads the maximal run of non-delimiter characters starting at `input`.
fn read_token(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|&(_, c)| is_delimiter(c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Turns `source` into its lexical token stream, per the lexical rules:
/// whitespace and `;` line comments are skipped, a lone CR is accepted as
/// whitespace, `(`/`)`/`[`/`]` become bracket tokens, `"..."` is a string
/// literal read up to the next unescaped quote, `'` is the quote-sugar
/// marker, `#t`/`#f` are booleans (any other `#...` is a syntax error), and
/// everything else is read as a maximal token and classified as an integer,
/// float, dot, or symbol.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut rest = source;

    while !rest.is_empty() {
        let c = rest.chars().next().unwrap();
        match c {
            ' ' | '\t' => rest = &rest[1..],
            '\r' => rest = &rest[1..],
            '\n' => {
                line += 1;
                rest = &rest[1..];
            }
            ';' => {
                let nl = rest.find('\n').unwrap_or(rest.len());
                rest = &rest[nl..];
            }
            '(' => {
                tokens.push(Token {
                    kind: TokenKind::OpenParen,
                    line,
                });
                rest = &rest[1..];
            }
            ')' => {
                tokens.push(Token {
                    kind: TokenKind::CloseParen,
                    line,
                });
                rest = &rest[1..];
            }
            '[' => {
                tokens.push(Token {
                    kind: TokenKind::OpenBracket,
                    line,
                });
                rest = &rest[1..];
            }
            ']' => {
                tokens.push(Token {
                    kind: TokenKind::CloseBracket,
                    line,
                });
                rest = &rest[1..];
            }
            '\'' => {
                tokens.push(Token {
                    kind: TokenKind::Quote,
                    line,
                });
                rest = &rest[1..];
            }
            '"' => {
                let (content, remainder, newlines) = read_string(&rest[1..], line)?;
                tokens.push(Token {
                    kind: TokenKind::Str(content),
                    line,
                });
                line += newlines;
                rest = remainder;
            }
            '#' => {
                let (buf, remainder) = read_token(&rest[1..]);
                match buf {
                    "t" => tokens.push(Token {
                        kind: TokenKind::Bool(true),
                        line,
                    }),
                    "f" => tokens.push(Token {
                        kind: TokenKind::Bool(false),
                        line,
                    }),
                    other => {
                        return Err(LexError {
                            line,
                            message: format!("unsupported '#{}' token", other),
                        })
                    }
                }
                rest = remainder;
            }
            _ => {
                let (buf, remainder) = read_token(rest);
                if buf.is_empty() {
                    return Err(LexError {
                        line,
                        message: format!("invalid character '{}'", c),
                    });
                }
                tokens.push(Token {
                    kind: classify_token(buf, line)?,
                    line,
                });
                rest = remainder;
            }
        }
    }

    Ok(tokens)
}

/// Reads a string literal's contents (the input just past the opening
/// quote). Contents are kept verbatim; a backslash only ever means "the
/// following quote does not end the string" — it is not a general escape
/// mechanism. Returns the content, the remaining input (past the closing
/// quote), and the number of embedded newlines for line tracking.
fn read_string(input: &str, start_line: u32) -> Result<(String, &str, u32), LexError> {
    let mut content = String::new();
    let mut chars = input.char_indices().peekable();
    let mut newlines = 0u32;

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                return Ok((content, &input[i + 1..], newlines));
            }
            '\\' => {
                content.push('\\');
                if let Some(&(j, next)) = chars.peek() {
                    content.push(next);
                    if next == '\n' {
                        newlines += 1;
                    }
                    chars.next();
                    let _ = j;
                }
            }
            '\n' => {
                newlines += 1;
                content.push(c);
            }
            other => content.push(other),
        }
    }

    Err(LexError {
        line: start_line,
        message: "unterminated string literal".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_parens_and_brackets() {
        assert_eq!(
            kinds("([])"),
            vec![
                TokenKind::OpenParen,
                TokenKind::OpenBracket,
                TokenKind::CloseBracket,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_integers_and_floats() {
        assert_eq!(kinds("42"), vec![TokenKind::Int(42)]);
        assert_eq!(kinds("-7"), vec![TokenKind::Int(-7)]);
        assert_eq!(kinds("3.14"), vec![TokenKind::Float(3.14)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Float(0.5)]);
        assert_eq!(kinds("-.5"), vec![TokenKind::Float(-0.5)]);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            kinds("#t #f"),
            vec![TokenKind::Bool(true), TokenKind::Bool(false)]
        );
    }

    #[test]
    fn test_unsupported_hash_token_errors() {
        assert!(tokenize("#x").is_err());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            kinds("foo bar? set! <=" ),
            vec![
                TokenKind::Symbol("foo".to_string()),
                TokenKind::Symbol("bar?".to_string()),
                TokenKind::Symbol("set!".to_string()),
                TokenKind::Symbol("<=".to_string()),
            ]
        );
    }

    #[test]
    fn test_plus_minus_as_symbols() {
        assert_eq!(
            kinds("(+ -)"),
            vec![
                TokenKind::OpenParen,
                TokenKind::Symbol("+".to_string()),
                TokenKind::Symbol("-".to_string()),
                TokenKind::CloseParen,
            ]
        );
        // a malformed +-prefixed token is a lex error
        assert!(tokenize("+foo").is_err());
    }

    #[test]
    fn test_dot_and_ellipsis() {
        assert_eq!(kinds("."), vec![TokenKind::Dot]);
        assert_eq!(kinds("..."), vec![TokenKind::Symbol("...".to_string())]);
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(
            kinds("\"hello world\""),
            vec![TokenKind::Str("hello world".to_string())]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let toks = kinds("\"a\\\"b\"");
        assert_eq!(toks, vec![TokenKind::Str("a\\\"b".to_string())]);
    }

    #[test]
    fn test_unterminated_string_errors() {
        assert!(tokenize("\"abc").is_err());
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(
            kinds("; a comment\n42"),
            vec![TokenKind::Int(42)]
        );
    }

    #[test]
    fn test_carriage_return_is_whitespace() {
        assert_eq!(kinds("1\r\n2"), vec![TokenKind::Int(1), TokenKind::Int(2)]);
    }

    #[test]
    fn test_quote_sugar_token() {
        assert_eq!(
            kinds("'x"),
            vec![TokenKind::Quote, TokenKind::Symbol("x".to_string())]
        );
    }

    #[test]
    fn test_line_tracking() {
        let tokens = tokenize("1\n2\n3").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_digit_leading_invalid_symbol_errors() {
        assert!(tokenize("1abc").is_err());
    }
}
