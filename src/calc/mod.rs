//! Calculator - a safe arithmetic evaluator and a keypad display buffer
//!
//! Only numerals and `+ - * / % ^ ( )` are understood; anything else is
//! rejected before evaluation.

pub mod keypad;
pub mod lexer;
pub mod parser;

pub use keypad::{Key, Keypad};

/// Evaluation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected input after position {0}")]
    TrailingInput(usize),

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("expression is nested too deeply")]
    TooDeep,

    #[error("division by zero")]
    DivisionByZero,

    #[error("square root of a negative number")]
    NegativeSqrt,

    #[error("result is not a finite number")]
    NotFinite,
}

/// Evaluate an arithmetic expression
pub fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let tokens = lexer::tokenize(expr)?;
    parser::Parser::new(&tokens).evaluate()
}

/// Evaluate an expression and take its square root
pub fn sqrt_of(expr: &str) -> Result<f64, CalcError> {
    let value = evaluate(expr)?;
    if value < 0.0 {
        return Err(CalcError::NegativeSqrt);
    }
    Ok(value.sqrt())
}

/// Render a result for the display.
///
/// Whole numbers print without a fractional part; everything else uses the
/// shortest representation that reads back to the same value.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{}", value)
}

/// Evaluate typed input in one go and render it, optionally as a square root.
///
/// Unlike the keypad, `e` here is only an exponent marker (`1.5e-3`).
pub fn calculate(expr: &str, sqrt: bool) -> Result<String, CalcError> {
    let value = if sqrt { sqrt_of(expr)? } else { evaluate(expr)? };
    Ok(format_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> f64 {
        evaluate(expr).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("20 / 4 / 5"), 1.0);
        assert_eq!(eval("7 / 2"), 3.5);
    }

    #[test]
    fn test_power() {
        assert_eq!(eval("2^10"), 1024.0);
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("-2^2"), -4.0);
        assert_eq!(eval("(-2)^2"), 4.0);
        assert_eq!(eval("2^-1"), 0.5);
        assert_eq!(eval("2*3^2"), 18.0);
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("-3"), -3.0);
        assert_eq!(eval("--3"), 3.0);
        assert_eq!(eval("+4 - -1"), 5.0);
    }

    #[test]
    fn test_floored_modulo() {
        assert_eq!(eval("7 % 3"), 1.0);
        assert_eq!(eval("-7 % 3"), 2.0);
        assert_eq!(eval("7 % -3"), -2.0);
        assert_eq!(eval("7.5 % 2"), 1.5);
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate(""), Err(CalcError::Empty));
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1 % 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("(1 + 2"), Err(CalcError::UnbalancedParens));
        assert_eq!(evaluate("1 + 2)"), Err(CalcError::TrailingInput(3)));
        assert_eq!(evaluate("2 +"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("2 * * 3"), Err(CalcError::UnexpectedToken(2)));
        assert_eq!(evaluate("2(3)"), Err(CalcError::TrailingInput(1)));
        assert_eq!(evaluate("10^400"), Err(CalcError::NotFinite));
        assert_eq!(evaluate("(-8)^0.5"), Err(CalcError::NotFinite));
        assert!(evaluate("__import__('os')").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let shallow = format!("{}2{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&shallow), 2.0);

        let parens = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(evaluate(&parens), Err(CalcError::TooDeep));

        let signs = format!("{}1", "-".repeat(200_000));
        assert_eq!(evaluate(&signs), Err(CalcError::TooDeep));

        let powers = vec!["2"; 1000].join("^");
        assert_eq!(evaluate(&powers), Err(CalcError::TooDeep));
    }

    #[test]
    fn test_calculate() {
        assert_eq!(calculate("1.5e-3", false).unwrap(), "0.0015");
        assert_eq!(calculate("2e3 / 4", false).unwrap(), "500");
        assert_eq!(calculate("5 + 4", true).unwrap(), "3");
        assert_eq!(calculate("1 / 0", false), Err(CalcError::DivisionByZero));
        assert_eq!(calculate("-9", true), Err(CalcError::NegativeSqrt));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt_of("5 + 4").unwrap(), 3.0);
        assert_eq!(sqrt_of("0 - 4"), Err(CalcError::NegativeSqrt));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }
}
