//! Recursive-descent parser producing a surface syntax tree
//!
//! The surface grammar is wider than what is allowed to evaluate: names,
//! calls and attribute access are recognised here so they can be rejected
//! explicitly instead of showing up as syntax errors.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := postfix ('**' unary)?
//! postfix := atom ('(' args? ')' | '.' IDENT)*
//! atom    := NUMBER | IDENT | '(' expr ')'
//! ```

use super::lexer::{tokenize, Spanned, Token};
use super::number::Number;
use thiserror::Error;

/// Deepest nesting accepted before the parser gives up
const MAX_DEPTH: usize = 200;

/// Syntax error in an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid syntax: empty expression")]
    Empty,
    #[error("invalid syntax: unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid syntax: unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("invalid syntax: unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid syntax: malformed number at position {pos}")]
    InvalidLiteral { pos: usize },
    #[error("integer literal too large at position {pos}")]
    LiteralTooLarge { pos: usize },
    #[error("too many nested parentheses")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Surface syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Attribute {
        target: Box<Expr>,
        attr: String,
    },
}

/// Parse an expression string into a surface tree
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(extra) => Err(unexpected(extra)),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let next = self.tokens.get(self.cursor).cloned();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_token() == Some(expected) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        match self.advance() {
            Some(s) if &s.token == expected => Ok(()),
            Some(s) => Err(unexpected(&s)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep);
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.cursor += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        self.ascend();
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.cursor += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_token() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.cursor += 1;
        self.descend()?;
        let operand = self.unary()?;
        self.ascend();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.postfix()?;
        if self.eat(&Token::DoubleStar) {
            self.descend()?;
            let exponent = self.unary()?;
            self.ascend();
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.atom()?;
        loop {
            if self.eat(&Token::LParen) {
                let args = self.call_args()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else if self.eat(&Token::Dot) {
                match self.advance() {
                    Some(Spanned {
                        token: Token::Ident(attr),
                        ..
                    }) => {
                        expr = Expr::Attribute {
                            target: Box::new(expr),
                            attr,
                        };
                    }
                    Some(other) => return Err(unexpected(&other)),
                    None => return Err(ParseError::UnexpectedEnd),
                }
            } else {
                return Ok(expr);
            }
        }
    }

    /// Arguments after an opening parenthesis, consuming the closing one
    fn call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&Token::Comma) {
                if self.eat(&Token::RParen) {
                    return Ok(args);
                }
                continue;
            }
            self.expect(&Token::RParen)?;
            return Ok(args);
        }
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Spanned {
                token: Token::Number(n),
                ..
            }) => Ok(Expr::Literal(n)),
            Some(Spanned {
                token: Token::Ident(name),
                ..
            }) => Ok(Expr::Name(name)),
            Some(Spanned {
                token: Token::LParen,
                ..
            }) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(other) => Err(unexpected(&other)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn unexpected(spanned: &Spanned) -> ParseError {
    ParseError::UnexpectedToken {
        found: spanned.token.describe(),
        pos: spanned.pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Expr {
        Expr::Literal(Number::Int(i))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            binary(BinaryOp::Add, int(1), binary(BinaryOp::Mul, int(2), int(3)))
        );
    }

    #[test]
    fn test_left_associative_subtraction() {
        assert_eq!(
            parse("8 - 3 - 2").unwrap(),
            binary(BinaryOp::Sub, binary(BinaryOp::Sub, int(8), int(3)), int(2))
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(
            parse("2 ** 3 ** 2").unwrap(),
            binary(BinaryOp::Pow, int(2), binary(BinaryOp::Pow, int(3), int(2)))
        );
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(
            parse("-2 ** 2").unwrap(),
            Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(binary(BinaryOp::Pow, int(2), int(2))),
            }
        );
    }

    #[test]
    fn test_negative_exponent() {
        assert_eq!(
            parse("2 ** -1").unwrap(),
            binary(
                BinaryOp::Pow,
                int(2),
                Expr::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(int(1)),
                }
            )
        );
    }

    #[test]
    fn test_call_and_attribute_are_recognised() {
        assert!(matches!(parse("abs(-3)").unwrap(), Expr::Call { .. }));
        assert!(matches!(parse("(1).real").unwrap(), Expr::Attribute { .. }));
        assert!(matches!(parse("max(1, 2,)").unwrap(), Expr::Call { args, .. } if args.len() == 2));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("(1 + 2"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse("1 +"), Err(ParseError::UnexpectedEnd));
        assert!(matches!(
            parse("1 2"),
            Err(ParseError::UnexpectedToken { pos: 2, .. })
        ));
        assert!(matches!(
            parse("1 + )"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(parse(&deep), Err(ParseError::TooDeep));

        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse(&shallow), Ok(int(1)));
    }
}
