//! Tokenizer for calculator input

use super::CalcError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

/// Split an expression into tokens. Whitespace is skipped.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let token = match c {
            c if c.is_whitespace() => {
                pos += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let (number, next) = read_number(&chars, pos)?;
                pos = next;
                tokens.push(Token::Number(number));
                continue;
            }
            '+' => Token::Plus,
            '-' | '−' => Token::Minus,
            '*' | '×' => Token::Star,
            '/' | '÷' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(CalcError::UnexpectedChar(other, pos)),
        };
        tokens.push(token);
        pos += 1;
    }

    Ok(tokens)
}

/// Read `digits[.digits][e[+-]digits]` starting at `start`.
fn read_number(chars: &[char], start: usize) -> Result<(f64, usize), CalcError> {
    let mut pos = start;
    let mut seen_dot = false;

    while pos < chars.len() {
        match chars[pos] {
            '0'..='9' => pos += 1,
            '.' if !seen_dot => {
                seen_dot = true;
                pos += 1;
            }
            _ => break,
        }
    }

    // Exponent only when digits follow, so "2e" stays an error
    if pos < chars.len() && matches!(chars[pos], 'e' | 'E') {
        let mut cursor = pos + 1;
        if cursor < chars.len() && matches!(chars[cursor], '+' | '-') {
            cursor += 1;
        }
        if cursor < chars.len() && chars[cursor].is_ascii_digit() {
            pos = cursor;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }

    let text: String = chars[start..pos].iter().collect();
    text.parse::<f64>()
        .map(|n| (n, pos))
        .map_err(|_| CalcError::InvalidNumber(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_operators() {
        let tokens = tokenize("(1 + 2) * 3 ^ 4 % 5 / 6 - 7").unwrap();
        assert_eq!(tokens.len(), 15);
        assert_eq!(tokens[0], Token::LParen);
        assert_eq!(tokens[1], Token::Number(1.0));
        assert_eq!(tokens[7], Token::Caret);
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(tokenize("3.25").unwrap(), vec![Token::Number(3.25)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("1.5e-3").unwrap(), vec![Token::Number(0.0015)]);
        assert_eq!(tokenize("2E3").unwrap(), vec![Token::Number(2000.0)]);
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert!(matches!(tokenize("2 + x"), Err(CalcError::UnexpectedChar('x', 4))));
        assert!(matches!(tokenize("."), Err(CalcError::InvalidNumber(_))));
        assert!(tokenize("2e").is_err());
    }
}
