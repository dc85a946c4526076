//! Literal decoder for request text.
//!
//! Accepts only numbers, strings and (possibly nested) lists written with
//! `[...]` or `(...)`. Anything that would need evaluation (names,
//! operators, calls) is rejected.

use crate::{GeoError, Result};

/// Lists nested deeper than this are rejected before recursion gets expensive.
pub const MAX_DEPTH: usize = 32;

/// A decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    List(Vec<Literal>),
}

impl Literal {
    /// Short name of the literal's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Number(_) => "number",
            Literal::Str(_) => "string",
            Literal::List(_) => "list",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Open(char),
    Close(char),
    Comma,
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn parse_error(pos: usize, msg: impl std::fmt::Display) -> GeoError {
    GeoError::Parse(format!("{} at position {}", msg, pos))
}

/// Splits request text into tokens. Positions are byte offsets into the source.
struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    idx: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, chars: source.char_indices().collect(), idx: 0 }
    }

    /// Byte offset of the next character, or the source length at the end.
    fn offset(&self) -> usize {
        self.chars.get(self.idx).map_or(self.source.len(), |&(offset, _)| offset)
    }

    fn peekc(&self) -> Option<char> {
        self.chars.get(self.idx).map(|&(_, c)| c)
    }

    fn nextc(&mut self) -> Option<char> {
        let c = self.peekc();
        if c.is_some() {
            self.idx += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peekc(), Some(c) if c.is_whitespace()) {
            self.idx += 1;
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_ws();
            let pos = self.offset();
            let kind = match self.peekc() {
                None => break,
                Some(c @ ('[' | '(')) => {
                    self.nextc();
                    TokenKind::Open(c)
                }
                Some(c @ (']' | ')')) => {
                    self.nextc();
                    TokenKind::Close(c)
                }
                Some(',') => {
                    self.nextc();
                    TokenKind::Comma
                }
                Some(q @ ('\'' | '"')) => {
                    self.nextc();
                    TokenKind::Str(self.string(q, pos)?)
                }
                Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                    TokenKind::Number(self.number()?)
                }
                Some(c) => return Err(parse_error(pos, format!("unexpected character '{}'", c))),
            };
            tokens.push(Token { kind, pos });
        }
        Ok(tokens)
    }

    fn string(&mut self, quote: char, start: usize) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.nextc() {
                None => return Err(parse_error(start, "unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escape_pos = self.offset();
                    let escaped = match self.nextc() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some(c @ ('\\' | '\'' | '"')) => c,
                        Some(c) => {
                            return Err(parse_error(escape_pos, format!("unknown escape '\\{}'", c)))
                        }
                        None => return Err(parse_error(start, "unterminated string")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.idx;
        while matches!(self.peekc(), Some(c) if c.is_ascii_digit()) {
            self.idx += 1;
        }
        self.idx - start
    }

    fn number(&mut self) -> Result<f64> {
        let start = self.offset();
        if matches!(self.peekc(), Some('+' | '-')) {
            self.nextc();
        }
        let mut mantissa = self.digits();
        if self.peekc() == Some('.') {
            self.nextc();
            mantissa += self.digits();
        }
        if mantissa == 0 {
            return Err(parse_error(start, "malformed number"));
        }
        if matches!(self.peekc(), Some('e' | 'E')) {
            self.nextc();
            if matches!(self.peekc(), Some('+' | '-')) {
                self.nextc();
            }
            if self.digits() == 0 {
                return Err(parse_error(start, "malformed exponent"));
            }
        }
        if matches!(self.peekc(), Some(c) if c.is_alphanumeric() || c == '.' || c == '_') {
            return Err(parse_error(self.offset(), "malformed number"));
        }

        let text = &self.source[start..self.offset()];
        let value = text
            .parse::<f64>()
            .map_err(|_| parse_error(start, format!("cannot parse number '{}'", text)))?;
        if !value.is_finite() {
            return Err(parse_error(start, format!("number '{}' is out of range", text)));
        }
        Ok(value)
    }
}

/// Recursive-descent parser over the token stream.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn value(&mut self, depth: usize) -> Result<Literal> {
        let token = self
            .next()
            .ok_or_else(|| parse_error(self.end, "unexpected end of input"))?;
        match token.kind {
            TokenKind::Number(n) => Ok(Literal::Number(n)),
            TokenKind::Str(s) => Ok(Literal::Str(s)),
            TokenKind::Open(open) => {
                if depth >= MAX_DEPTH {
                    return Err(parse_error(token.pos, "lists are nested too deeply"));
                }
                let close = if open == '[' { ']' } else { ')' };
                self.list(close, depth + 1).map(Literal::List)
            }
            TokenKind::Close(c) => Err(parse_error(token.pos, format!("unexpected '{}'", c))),
            TokenKind::Comma => Err(parse_error(token.pos, "unexpected ','")),
        }
    }

    fn list(&mut self, close: char, depth: usize) -> Result<Vec<Literal>> {
        let mut items = Vec::new();
        loop {
            if let Some(Token { kind: TokenKind::Close(c), pos }) = self.peek() {
                let (c, pos) = (*c, *pos);
                if c != close {
                    return Err(parse_error(pos, format!("expected '{}', found '{}'", close, c)));
                }
                self.next();
                return Ok(items);
            }
            items.push(self.value(depth)?);
            match self.next() {
                Some(Token { kind: TokenKind::Comma, .. }) => continue,
                Some(Token { kind: TokenKind::Close(c), pos }) => {
                    if c != close {
                        return Err(parse_error(pos, format!("expected '{}', found '{}'", close, c)));
                    }
                    return Ok(items);
                }
                Some(token) => return Err(parse_error(token.pos, "expected ',' between list items")),
                None => return Err(parse_error(self.end, format!("missing '{}'", close))),
            }
        }
    }
}

/// Decodes request text into a single literal value.
pub fn decode(source: &str) -> Result<Literal> {
    let tokens = Lexer::new(source).tokenize()?;
    let end = source.len();
    if tokens.is_empty() {
        return Err(GeoError::Parse("request is empty".into()));
    }
    let mut parser = Parser { tokens, pos: 0, end };
    let value = parser.value(0)?;
    if let Some(token) = parser.peek() {
        return Err(parse_error(token.pos, "unexpected trailing input"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<Literal>) -> Literal {
        Literal::List(items)
    }

    #[test]
    fn test_decode_request_shapes() {
        let lit = decode(r#"[[1, 2, 3], [4.5, -5e1, .25], "addition"]"#).unwrap();
        assert_eq!(
            lit,
            list(vec![
                list(vec![Literal::Number(1.0), Literal::Number(2.0), Literal::Number(3.0)]),
                list(vec![Literal::Number(4.5), Literal::Number(-50.0), Literal::Number(0.25)]),
                Literal::Str("addition".into()),
            ])
        );
    }

    #[test]
    fn test_decode_tuples_and_single_quotes() {
        let lit = decode("((1, 2), 'Vectors')").unwrap();
        assert_eq!(
            lit,
            list(vec![
                list(vec![Literal::Number(1.0), Literal::Number(2.0)]),
                Literal::Str("Vectors".into()),
            ])
        );
    }

    #[test]
    fn test_decode_trailing_comma_and_whitespace() {
        let lit = decode("  [ 1 ,\n 2 , ]  ").unwrap();
        assert_eq!(lit, list(vec![Literal::Number(1.0), Literal::Number(2.0)]));
        assert_eq!(decode("[]").unwrap(), list(vec![]));
    }

    #[test]
    fn test_decode_string_escapes() {
        assert_eq!(decode(r#""a\"b""#).unwrap(), Literal::Str("a\"b".into()));
        assert_eq!(decode(r"'it\'s'").unwrap(), Literal::Str("it's".into()));
    }

    #[test]
    fn test_decode_rejects_expressions() {
        for src in [
            "__import__('os')",
            "[1 + 2]",
            "[abs(-1)]",
            "[1, 2] [3]",
            "[1 2]",
            "[inf]",
            "[1e999]",
            "[1.2.3]",
            "[-]",
            "[1e]",
            "[1, 2",
            "[1, 2)",
            "'open",
            "",
            "   ",
        ] {
            assert!(
                matches!(decode(src), Err(GeoError::Parse(_))),
                "expected parse error for {:?}",
                src
            );
        }
    }

    #[test]
    fn test_decode_error_reports_position() {
        let err = decode("[1, x]").unwrap_err();
        assert_eq!(err, GeoError::Parse("unexpected character 'x' at position 4".into()));
    }

    #[test]
    fn test_decode_error_position_is_byte_offset() {
        let err = decode("['é', x]").unwrap_err();
        assert_eq!(err, GeoError::Parse("unexpected character 'x' at position 7".into()));
        let err = decode("['é', 1").unwrap_err();
        assert_eq!(err, GeoError::Parse("missing ']' at position 8".into()));
        let err = decode("['é', 1.5x]").unwrap_err();
        assert_eq!(err, GeoError::Parse("malformed number at position 10".into()));
    }

    #[test]
    fn test_decode_depth_limit() {
        let deep = format!("{}1{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(matches!(decode(&deep), Err(GeoError::Parse(_))));
        let ok = format!("{}1{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(decode(&ok).is_ok());
    }
}
