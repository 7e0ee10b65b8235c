//! Recursive-descent evaluator
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! `^` is right associative and binds tighter than a leading sign, so
//! `-2^2` is `-4` while `2^-1` is `0.5`.

use super::CalcError;
use super::lexer::Token;

/// Deepest nesting of parentheses, signs and exponents accepted
pub const MAX_DEPTH: usize = 256;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    /// Evaluate the whole token stream
    pub fn evaluate(mut self) -> Result<f64, CalcError> {
        if self.tokens.is_empty() {
            return Err(CalcError::Empty);
        }
        let value = self.expr()?;
        if self.pos < self.tokens.len() {
            return Err(CalcError::TrailingInput(self.pos));
        }
        finite(value)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    // Floored modulo: the result takes the divisor's sign
                    value -= rhs * (value / rhs).floor();
                }
                _ => return Ok(value),
            }
        }
    }

    // All recursion goes through here, so this is where depth is bounded.
    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            return finite(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        let at = self.pos;
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(CalcError::UnbalancedParens),
                }
            }
            Some(Token::RParen) => Err(CalcError::UnbalancedParens),
            Some(_) => Err(CalcError::UnexpectedToken(at)),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

fn finite(value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite)
    }
}
