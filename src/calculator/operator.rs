use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculator::number::parse_number;

/// Binary operator of the calculator.
///
/// `Percent` is "b percent of a", not modulo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Percent,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Percent,
    ];

    /// ASCII symbol used in history expressions.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Percent => '%',
        }
    }

    /// Symbol shown on the keypad.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Percent => "%",
        }
    }

    pub fn from_symbol(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == ch)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Apply `op` to the operands as written on the display.
///
/// Division by zero yields `0`. Without an operator the right operand is
/// returned unchanged.
pub fn apply(a: &str, b: &str, op: Option<Operator>) -> f64 {
    let lhs = parse_number(a);
    let rhs = parse_number(b);
    match op {
        Some(Operator::Add) => lhs + rhs,
        Some(Operator::Subtract) => lhs - rhs,
        Some(Operator::Multiply) => lhs * rhs,
        Some(Operator::Divide) => {
            if rhs != 0.0 {
                lhs / rhs
            } else {
                0.0
            }
        }
        Some(Operator::Percent) => (lhs * rhs) / 100.0,
        None => rhs,
    }
}
