//! Keypad display buffer
//!
//! Mirrors a pocket calculator: keys append to the display, `=` and `√`
//! replace it with a result, and failures show `Error`.

use crate::{Error, Result};
use std::str::FromStr;

pub const ERROR_TEXT: &str = "Error";

/// Keypad labels in on-screen order, five per row
#[rustfmt::skip]
pub const LAYOUT: [&str; 25] = [
    "(", ")", "%", "C", "DEL",
    "7", "8", "9", "/", "√",
    "4", "5", "6", "*", "^",
    "1", "2", "3", "-", "π",
    "0", ".", "=", "+", "e",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Any character appended verbatim: digits, `.`, operators, parens
    Char(char),
    Clear,
    Delete,
    Pi,
    E,
    Sqrt,
    Equals,
}

impl Key {
    /// Map a single typed character to a key
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' | '.' | '+' | '-' | '*' | '/' | '%' | '^' | '(' | ')' => Some(Key::Char(c)),
            'π' => Some(Key::Pi),
            'e' => Some(Key::E),
            '√' => Some(Key::Sqrt),
            '=' => Some(Key::Equals),
            _ => None,
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C" | "c" | "clear" => return Ok(Key::Clear),
            "DEL" | "del" | "⌫" => return Ok(Key::Delete),
            "pi" | "PI" => return Ok(Key::Pi),
            "sqrt" => return Ok(Key::Sqrt),
            _ => {}
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::from_char(c).ok_or_else(|| Error::UnknownKey(s.to_string())),
            _ => Err(Error::UnknownKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    display: String,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_TEXT
    }

    pub fn press(&mut self, key: Key) {
        // A shown error is discarded by the next key
        if self.is_error() {
            self.display.clear();
            if key == Key::Delete {
                return;
            }
        }

        match key {
            Key::Char(c) => self.display.push(c),
            Key::Clear => self.display.clear(),
            Key::Delete => {
                self.display.pop();
            }
            Key::Pi => self.display.push_str(&std::f64::consts::PI.to_string()),
            Key::E => self.display.push_str(&std::f64::consts::E.to_string()),
            Key::Sqrt => {
                if self.display.is_empty() {
                    return;
                }
                self.show(super::sqrt_of(&self.display));
            }
            Key::Equals => self.show(super::evaluate(&self.display)),
        }
    }

    /// Type a run of characters, e.g. `"12+3"`. Whitespace is skipped.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            let key = Key::from_char(c).ok_or_else(|| Error::UnknownKey(c.to_string()))?;
            self.press(key);
        }
        Ok(())
    }

    /// Feed one line of keypad input.
    ///
    /// Words naming a key (`C`, `DEL`, `sqrt`, `=`) are pressed; other
    /// words are typed character by character.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        for word in line.split_whitespace() {
            match word.parse::<Key>() {
                Ok(key) => self.press(key),
                Err(_) => self.type_text(word)?,
            }
        }
        Ok(())
    }

    fn show(&mut self, result: std::result::Result<f64, super::CalcError>) {
        self.display = match result {
            Ok(value) => super::format_number(value),
            Err(e) => {
                tracing::debug!("Keypad evaluation failed: {}", e);
                ERROR_TEXT.to_string()
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_labels_parse() {
        for label in LAYOUT {
            assert!(label.parse::<Key>().is_ok(), "label {}", label);
        }
        assert!("x".parse::<Key>().is_err());
        assert!("12".parse::<Key>().is_err());
    }

    #[test]
    fn test_equals() {
        let mut pad = Keypad::new();
        pad.type_text("7*6").unwrap();
        assert_eq!(pad.display(), "7*6");
        pad.press(Key::Equals);
        assert_eq!(pad.display(), "42");

        pad.type_text("/4").unwrap();
        pad.press(Key::Equals);
        assert_eq!(pad.display(), "10.5");
    }

    #[test]
    fn test_sqrt_evaluates_first() {
        let mut pad = Keypad::new();
        pad.press(Key::Sqrt);
        assert_eq!(pad.display(), "");

        pad.type_text("5+4").unwrap();
        pad.press(Key::Sqrt);
        assert_eq!(pad.display(), "3");

        pad.feed_line("C 0-9 √").unwrap();
        assert!(pad.is_error());
    }

    #[test]
    fn test_delete_and_clear() {
        let mut pad = Keypad::new();
        pad.type_text("123").unwrap();
        pad.press(Key::Delete);
        assert_eq!(pad.display(), "12");
        pad.press(Key::Clear);
        assert_eq!(pad.display(), "");
        pad.press(Key::Delete);
        assert_eq!(pad.display(), "");
    }

    #[test]
    fn test_constants_and_power() {
        let mut pad = Keypad::new();
        pad.press(Key::Pi);
        assert_eq!(pad.display(), "3.141592653589793");

        pad.feed_line("C 2 ^ 8 =").unwrap();
        assert_eq!(pad.display(), "256");

        pad.feed_line("C e").unwrap();
        assert_eq!(pad.display(), "2.718281828459045");
    }

    #[test]
    fn test_error_then_recover() {
        let mut pad = Keypad::new();
        pad.feed_line("1/0 =").unwrap();
        assert_eq!(pad.display(), ERROR_TEXT);

        pad.press(Key::Char('4'));
        assert_eq!(pad.display(), "4");

        pad.press(Key::Equals);
        pad.type_text("+").unwrap();
        pad.press(Key::Equals);
        assert!(pad.is_error());
        pad.press(Key::Delete);
        assert_eq!(pad.display(), "");
    }

    #[test]
    fn test_empty_equals_is_error() {
        let mut pad = Keypad::new();
        pad.press(Key::Equals);
        assert!(pad.is_error());
    }

    #[test]
    fn test_unknown_character() {
        let mut pad = Keypad::new();
        assert!(matches!(pad.type_text("2+x"), Err(Error::UnknownKey(_))));
        assert_eq!(pad.display(), "2+");
    }
}
