//! Keypad calculator
//!
//! Models a four-function calculator one key press at a time. Chained
//! operations evaluate strictly left to right (`2 + 3 × 4 =` gives 20).
//! Dividing by zero or taking the root of a negative number puts the
//! display into an `Error` state instead of producing a non-finite value;
//! the next digit starts over.

use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

/// Text shown after an invalid operation
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// `None` when the result is not a finite number
    fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        let result = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide if rhs == 0.0 => return None,
            Self::Divide => lhs / rhs,
        };
        result.is_finite().then_some(result)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        };
        write!(f, "{}", symbol)
    }
}

/// A calculator key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Percent,
    SquareRoot,
}

impl TryFrom<char> for Key {
    type Error = LedgerError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let key = match c {
            '0'..='9' => Self::Digit(c as u8 - b'0'),
            '.' => Self::Decimal,
            '+' => Self::Operator(Operator::Add),
            '-' => Self::Operator(Operator::Subtract),
            '*' | 'x' | '×' => Self::Operator(Operator::Multiply),
            '/' | '÷' => Self::Operator(Operator::Divide),
            '=' => Self::Equals,
            'c' | 'C' => Self::Clear,
            '%' => Self::Percent,
            'r' | '√' => Self::SquareRoot,
            other => {
                return Err(LedgerError::Validation(format!(
                    "Unknown calculator key: '{}'",
                    other
                )))
            }
        };
        Ok(key)
    }
}

/// Parsed key sequence; whitespace is ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySequence(pub Vec<Key>);

impl FromStr for KeySequence {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(Key::try_from)
            .collect::<LedgerResult<Vec<_>>>()
            .map(Self)
    }
}

/// Calculator state
#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    display: String,
    accumulator: Option<f64>,
    pending: Option<Operator>,
    /// The next digit replaces the display rather than extending it
    fresh_entry: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            accumulator: None,
            pending: None,
            fresh_entry: false,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Numeric value on the display; `None` in the error state
    pub fn value(&self) -> Option<f64> {
        self.display.parse().ok()
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    /// Apply one key press and return the new display
    pub fn press(&mut self, key: Key) -> &str {
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Decimal => self.input_decimal(),
            Key::Operator(op) => self.operate(Some(op)),
            Key::Equals => self.operate(None),
            Key::Clear => *self = Self::new(),
            Key::Percent => self.transform(|v| Some(v / 100.0)),
            Key::SquareRoot => self.transform(|v| (v >= 0.0).then(|| v.sqrt())),
        }
        &self.display
    }

    /// Press every key in `keys`, returning the final display
    pub fn run(&mut self, keys: &str) -> LedgerResult<&str> {
        let KeySequence(sequence) = keys.parse()?;
        for key in sequence {
            self.press(key);
        }
        Ok(&self.display)
    }

    fn input_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit.min(9));
        if self.fresh_entry || self.is_error() || self.display == "0" {
            self.display = digit.to_string();
            self.fresh_entry = false;
        } else {
            self.display.push(digit);
        }
    }

    fn input_decimal(&mut self) {
        if self.fresh_entry || self.is_error() {
            self.display = "0.".to_string();
            self.fresh_entry = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Fold the display into the accumulator and remember `next`
    fn operate(&mut self, next: Option<Operator>) {
        let Some(input) = self.value() else {
            return;
        };

        // Pressing a second operator in a row only swaps the operator
        if !self.fresh_entry {
            match (self.accumulator, self.pending) {
                (Some(lhs), Some(op)) => match op.apply(lhs, input) {
                    Some(result) => {
                        self.display = format_number(result);
                        self.accumulator = Some(result);
                    }
                    None => {
                        self.fail();
                        return;
                    }
                },
                _ => self.accumulator = Some(input),
            }
        }

        self.pending = next;
        self.fresh_entry = true;
    }

    fn transform(&mut self, f: impl Fn(f64) -> Option<f64>) {
        let Some(value) = self.value() else {
            return;
        };
        match f(value) {
            Some(result) if result.is_finite() => self.display = format_number(result),
            _ => self.fail(),
        }
    }

    fn fail(&mut self) {
        tracing::debug!("calculator entered error state");
        self.display = ERROR_DISPLAY.to_string();
        self.accumulator = None;
        self.pending = None;
        self.fresh_entry = true;
    }
}

/// Interest on `principal` at `rate_percent` per year for `years`
pub fn simple_interest(principal: f64, rate_percent: f64, years: f64) -> f64 {
    principal * rate_percent * years / 100.0
}

/// Twelve months of `monthly`
pub fn annual_total(monthly: f64) -> f64 {
    monthly * 12.0
}

/// Shortest round-trip form, without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoids showing "-0"
        return "0".to_string();
    }
    format!("{}", value)
}
