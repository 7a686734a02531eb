//! Tokenizer and precedence-climbing parser for function expressions.
//!
//! Operator precedence (highest to lowest):
//! - Unary sign: `-x`, `+x`
//! - Multiplication/Division: `*`, `/`
//! - Addition/Subtraction: `+`, `-`
//!
//! All binary operators are left associative.

use super::{BinaryOp, EvalError, Expr, Function, UnaryOp, Variable};

/// Nesting limit for parentheses and unary chains.
const MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    /// An operator character outside the grammar (`%`, `^`).
    Foreign(char),
    End,
}

/// A token and the 0-based column it starts at.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub(crate) token: Token,
    pub(crate) column: usize,
}

fn parse_error(column: usize, message: impl Into<String>) -> EvalError {
    EvalError::Parse {
        column,
        message: message.into(),
    }
}

/// Split an expression string into tokens.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let column = i;

        let token = match ch {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when a digit follows `e`, `e+` or `e-`
                if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(column, format!("invalid number '{text}'")))?;
                tokens.push(Spanned {
                    token: Token::Num(value),
                    column,
                });
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(chars[start..i].iter().collect()),
                    column,
                });
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '%' | '^' => Token::Foreign(ch),
            other => {
                return Err(parse_error(column, format!("unexpected character '{other}'")));
            }
        };

        tokens.push(Spanned { token, column });
        i += 1;
    }

    tokens.push(Spanned {
        token: Token::End,
        column: chars.len(),
    });
    Ok(tokens)
}

/// Parser state over a token stream.
pub(crate) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Tokenize and parse a complete expression.
    pub(crate) fn parse_str(input: &str) -> Result<Expr, EvalError> {
        let mut parser = Self::new(tokenize(input)?);
        let expr = parser.parse_expr(0)?;

        let trailing = parser.peek();
        if trailing.token != Token::End {
            return Err(parse_error(trailing.column, "unexpected trailing input"));
        }
        Ok(expr)
    }

    fn peek(&self) -> &Spanned {
        // tokenize always terminates the stream with End
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Spanned {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(parse_error(self.peek().column, "expression nested too deeply"));
        }
        Ok(())
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        let next = self.advance();
        match next.token {
            Token::RParen => Ok(()),
            _ => Err(parse_error(next.column, "expected ')'")),
        }
    }

    /// Parse an expression whose binary operators bind at least `min_prec`.
    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.peek().token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Foreign(c) => {
                    return Err(EvalError::Unsupported(format!("operator '{c}'")));
                }
                _ => break,
            };

            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let right = self.parse_expr(prec + 1)?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek().token {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Plus,
            _ => return self.parse_primary(),
        };
        self.advance();

        self.enter()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        let next = self.advance();
        match next.token {
            Token::Num(n) => Ok(Expr::Literal(n)),
            Token::Ident(name) => self.parse_identifier(name),
            Token::LParen => {
                self.enter()?;
                let inner = self.parse_expr(0)?;
                self.depth -= 1;
                self.expect_rparen()?;
                Ok(Expr::Grouping(Box::new(inner)))
            }
            Token::End => Err(parse_error(next.column, "unexpected end of expression")),
            Token::Foreign(c) => Err(EvalError::Unsupported(format!("operator '{c}'"))),
            other => Err(parse_error(next.column, format!("unexpected token {other:?}"))),
        }
    }

    fn parse_identifier(&mut self, name: String) -> Result<Expr, EvalError> {
        if self.peek().token != Token::LParen {
            return match name.as_str() {
                "x" => Ok(Expr::Variable(Variable::X)),
                "y" => Ok(Expr::Variable(Variable::Y)),
                _ if Function::from_name(&name).is_some() => {
                    Err(EvalError::Unsupported(format!("function '{name}' used without a call")))
                }
                _ => Err(EvalError::Unsupported(format!("unknown identifier '{name}'"))),
            };
        }

        self.advance(); // consume (
        self.enter()?;
        let args = self.parse_args()?;
        self.depth -= 1;
        self.expect_rparen()?;

        let function = Function::from_name(&name)
            .ok_or_else(|| EvalError::Unsupported(format!("unknown function '{name}'")))?;

        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (Some(arg), None) => Ok(Expr::call(function, arg)),
            _ => Err(EvalError::Unsupported(format!(
                "function '{name}' requires exactly one argument"
            ))),
        }
    }

    /// Parse comma-separated call arguments up to (not including) `)`.
    fn parse_args(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.peek().token == Token::RParen {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr(0)?);
            if self.peek().token == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(args)
    }
}
