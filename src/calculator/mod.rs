//! Chained, left-to-right four-function calculator.
//!
//! Values are kept as display strings; arithmetic happens on demand through
//! [`apply`] and results go back through [`format_number`].

pub mod number;
pub mod operator;
pub mod state;

pub use number::{format_number, parse_number};
pub use operator::{Operator, apply};
pub use state::{Action, CalculatorState, Phase, transition};
