//! Tokenizer for arithmetic expressions

use super::number::Number;
use super::parser::ParseError;

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(Number),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    LParen,
    RParen,
    Dot,
    Comma,
}

impl Token {
    /// Source-like rendering used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::DoubleStar => "**".to_string(),
            Token::Slash => "/".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Dot => ".".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// Token with its character offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Split an expression into tokens
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    scan(source, false)
}

/// Whether the source mentions an identifier anywhere, even if it does not lex.
///
/// Unknown characters and malformed literals are skipped instead of failing.
pub fn mentions_name(source: &str) -> bool {
    scan(source, true).is_ok_and(|tokens| {
        tokens
            .iter()
            .any(|s| matches!(s.token, Token::Ident(_)))
    })
}

fn scan(source: &str, lenient: bool) -> Result<Vec<Spanned>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let pos = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) {
            match lex_number(&chars, i) {
                Ok((number, next)) => {
                    tokens.push(Spanned {
                        token: Token::Number(number),
                        pos,
                    });
                    i = next;
                }
                Err(_) if lenient => {
                    while chars.get(i).is_some_and(|ch| ch.is_alphanumeric() || *ch == '.' || *ch == '_') {
                        i += 1;
                    }
                }
                Err(e) => return Err(e),
            }
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut name = String::new();
            while let Some(&ch) = chars.get(i) {
                if ch.is_alphanumeric() || ch == '_' {
                    name.push(ch);
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Spanned {
                token: Token::Ident(name),
                pos,
            });
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::DoubleStar
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '.' => Token::Dot,
            ',' => Token::Comma,
            _ if lenient => {
                i += 1;
                continue;
            }
            other => return Err(ParseError::UnexpectedChar { ch: other, pos }),
        };
        tokens.push(Spanned { token, pos });
        i += 1;
    }

    Ok(tokens)
}

/// Lex a numeric literal starting at `start`, returning the value and the next offset.
///
/// Digits only is an integer; a fractional part or exponent makes it a float.
/// Digit groups may use single `_` separators between digits (`1_000`).
fn lex_number(chars: &[char], start: usize) -> Result<(Number, usize), ParseError> {
    let mut text = String::new();
    let mut is_float = false;
    let mut i = lex_digits(chars, start, start, &mut text)?;

    if chars.get(i) == Some(&'.') {
        is_float = true;
        text.push('.');
        i = lex_digits(chars, i + 1, start, &mut text)?;
    }

    if matches!(chars.get(i).copied(), Some('e' | 'E')) {
        let mut exponent = String::from("e");
        let mut j = i + 1;
        if let Some(&sign) = chars.get(j).filter(|c| **c == '+' || **c == '-') {
            exponent.push(sign);
            j += 1;
        }
        let before = exponent.len();
        j = lex_digits(chars, j, start, &mut exponent)?;
        if exponent.len() == before {
            return Err(ParseError::InvalidLiteral { pos: start });
        }
        is_float = true;
        text.push_str(&exponent);
        i = j;
    }

    let number = if is_float {
        let value = text
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidLiteral { pos: start })?;
        Number::Float(value)
    } else {
        let value = text
            .parse::<i64>()
            .map_err(|_| ParseError::LiteralTooLarge { pos: start })?;
        Number::Int(value)
    };

    Ok((number, i))
}

/// Append a run of digits starting at `i` to `text`, skipping `_` separators.
///
/// A separator must sit between two digits; anything else is a malformed
/// literal reported at `literal_start`.
fn lex_digits(
    chars: &[char],
    mut i: usize,
    literal_start: usize,
    text: &mut String,
) -> Result<usize, ParseError> {
    while let Some(&ch) = chars.get(i) {
        if ch.is_ascii_digit() {
            text.push(ch);
            i += 1;
        } else if ch == '_' {
            let after_digit = i > 0 && chars.get(i - 1).is_some_and(char::is_ascii_digit);
            let before_digit = chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if !(after_digit && before_digit) {
                return Err(ParseError::InvalidLiteral { pos: literal_start });
            }
            i += 1;
        } else {
            break;
        }
    }
    Ok(i)
}
