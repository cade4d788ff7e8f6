use crate::calculator::number::{format_number, parse_number};
use crate::calculator::operator::{Operator, apply};
use crate::history::History;

/// Conceptual phase of the state machine, derived from the fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No operator pending, display shows a result or the initial zero.
    Idle,
    /// Operator chosen, waiting for the second operand.
    OperatorPending,
    /// Digits are being typed.
    Entering,
}

/// A single user gesture on the calculator.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Digit(char),
    DecimalPoint,
    Operator(Operator),
    Evaluate,
    Clear,
    Backspace,
    Negate,
    Percent,
    ClearHistory,
    OracleAnswer { prompt: String, answer: String },
}

#[derive(Clone, Debug)]
pub struct CalculatorState {
    pub current_value: String,
    pub previous_value: Option<String>,
    pub operator: Option<Operator>,
    pub is_new_entry: bool,
    pub history: History,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_value: "0".to_string(),
            previous_value: None,
            operator: None,
            is_new_entry: true,
            history: History::new(),
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.operator.is_some() && self.is_new_entry {
            Phase::OperatorPending
        } else if self.is_new_entry {
            Phase::Idle
        } else {
            Phase::Entering
        }
    }

    /// Numeric value of the display.
    pub fn value(&self) -> f64 {
        parse_number(&self.current_value)
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Digit(d) => self.enter_digit(d),
            Action::DecimalPoint => self.enter_decimal_point(),
            Action::Operator(op) => self.choose_operator(op),
            Action::Evaluate => self.evaluate(),
            Action::Clear => self.clear(),
            Action::Backspace => self.backspace(),
            Action::Negate => self.negate(),
            Action::Percent => self.percent_of(),
            Action::ClearHistory => self.history.clear(),
            Action::OracleAnswer { prompt, answer } => {
                self.apply_oracle_answer(&prompt, &answer);
            }
        }
    }

    /// Non-digit characters are ignored.
    pub fn enter_digit(&mut self, d: char) {
        if !d.is_ascii_digit() {
            return;
        }
        if self.is_new_entry {
            self.current_value = d.to_string();
            self.is_new_entry = false;
        } else if self.current_value == "0" {
            self.current_value = d.to_string();
        } else {
            self.current_value.push(d);
        }
    }

    pub fn enter_decimal_point(&mut self) {
        if self.is_new_entry {
            self.current_value = "0.".to_string();
            self.is_new_entry = false;
        } else if !self.current_value.contains('.') {
            self.current_value.push('.');
        }
    }

    /// Store `op`, resolving a pending operation first (left-to-right chaining).
    pub fn choose_operator(&mut self, op: Operator) {
        let resolved = match (self.operator, self.previous_value.as_deref()) {
            (Some(pending), Some(previous)) if !self.is_new_entry => Some(format_number(
                apply(previous, &self.current_value, Some(pending)),
            )),
            _ => None,
        };
        match resolved {
            Some(result) => {
                self.previous_value = Some(result.clone());
                self.current_value = result;
            }
            None => self.previous_value = Some(self.current_value.clone()),
        }
        self.operator = Some(op);
        self.is_new_entry = true;
    }

    /// Resolve the pending operation and record it. No-op when nothing is pending.
    pub fn evaluate(&mut self) {
        let (Some(op), Some(previous)) = (self.operator, self.previous_value.as_deref()) else {
            return;
        };
        let result = format_number(apply(previous, &self.current_value, Some(op)));
        let expression = format!("{previous} {op} {}", self.current_value);
        self.history.record(expression, result.clone(), false);

        self.current_value = result;
        self.previous_value = None;
        self.operator = None;
        self.is_new_entry = true;
    }

    /// Reset the entry. History is kept.
    pub fn clear(&mut self) {
        self.current_value = "0".to_string();
        self.previous_value = None;
        self.operator = None;
        self.is_new_entry = true;
    }

    pub fn backspace(&mut self) {
        if self.is_new_entry {
            return;
        }
        self.current_value.pop();
        if self.current_value.is_empty() || self.current_value == "-" {
            self.current_value = "0".to_string();
        }
    }

    pub fn negate(&mut self) {
        self.current_value = format_number(self.value() * -1.0);
    }

    pub fn percent_of(&mut self) {
        self.choose_operator(Operator::Percent);
    }

    /// Record an oracle answer and show its number, if it has one.
    ///
    /// Returns the extracted value.
    pub fn apply_oracle_answer(&mut self, prompt: &str, answer: &str) -> Option<f64> {
        let extracted = crate::oracle::extract_number(answer);
        self.history.record(prompt, answer, true);
        if let Some(value) = extracted {
            self.current_value = format_number(value);
        }
        self.is_new_entry = true;
        extracted
    }
}

/// Pure transition: consume a state and an action, return the next state.
pub fn transition(mut state: CalculatorState, action: Action) -> CalculatorState {
    state.dispatch(action);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut CalculatorState, keys: &str) {
        for ch in keys.chars() {
            let action = match ch {
                '0'..='9' => Action::Digit(ch),
                '.' => Action::DecimalPoint,
                '=' => Action::Evaluate,
                'C' => Action::Clear,
                '<' => Action::Backspace,
                'n' => Action::Negate,
                'p' => Action::Percent,
                _ => Action::Operator(Operator::from_symbol(ch).unwrap()),
            };
            state.dispatch(action);
        }
    }

    #[test]
    fn test_defaults() {
        let state = CalculatorState::new();
        assert_eq!(state.current_value, "0");
        assert_eq!(state.previous_value, None);
        assert_eq!(state.operator, None);
        assert!(state.is_new_entry);
        assert!(state.history.is_empty());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_fresh_digit_replaces_display() {
        let mut state = CalculatorState::new();
        state.enter_digit('7');
        assert_eq!(state.current_value, "7");
        assert!(!state.is_new_entry);
        state.enter_digit('2');
        assert_eq!(state.current_value, "72");
        assert_eq!(state.phase(), Phase::Entering);
    }

    #[test]
    fn test_solitary_zero_is_replaced() {
        let mut state = CalculatorState::new();
        state.enter_digit('0');
        assert_eq!(state.current_value, "0");
        state.enter_digit('5');
        assert_eq!(state.current_value, "5");
    }

    #[test]
    fn test_zero_after_decimal_is_kept() {
        let mut state = CalculatorState::new();
        press(&mut state, "0.05");
        assert_eq!(state.current_value, "0.05");
    }

    #[test]
    fn test_decimal_point_is_idempotent() {
        let mut state = CalculatorState::new();
        state.enter_decimal_point();
        assert_eq!(state.current_value, "0.");
        state.enter_digit('5');
        state.enter_decimal_point();
        state.enter_decimal_point();
        assert_eq!(state.current_value, "0.5");
    }

    #[test]
    fn test_non_digit_ignored() {
        let mut state = CalculatorState::new();
        state.enter_digit('x');
        assert_eq!(state.current_value, "0");
        assert!(state.is_new_entry);
    }

    #[test]
    fn test_chained_operators_evaluate_left_to_right() {
        let mut state = CalculatorState::new();
        press(&mut state, "C3+4*");
        // 3 + 4 is resolved as soon as * is pressed
        assert_eq!(state.current_value, "7");
        assert_eq!(state.previous_value.as_deref(), Some("7"));
        assert_eq!(state.operator, Some(Operator::Multiply));
        press(&mut state, "5=");
        assert_eq!(state.current_value, "35");
    }

    #[test]
    fn test_operator_change_without_operand_does_not_evaluate() {
        let mut state = CalculatorState::new();
        press(&mut state, "8+-");
        assert_eq!(state.current_value, "8");
        assert_eq!(state.previous_value.as_deref(), Some("8"));
        assert_eq!(state.operator, Some(Operator::Subtract));
        assert_eq!(state.phase(), Phase::OperatorPending);
        press(&mut state, "3=");
        assert_eq!(state.current_value, "5");
    }

    #[test]
    fn test_end_to_end_addition() {
        let mut state = CalculatorState::new();
        press(&mut state, "7+3=");
        assert_eq!(state.current_value, "10");
        let item = state.history.latest().unwrap();
        assert_eq!(item.expression, "7 + 3");
        assert_eq!(item.result, "10");
        assert!(!item.is_ai);
        assert_eq!(state.previous_value, None);
        assert_eq!(state.operator, None);
        assert!(state.is_new_entry);
    }

    #[test]
    fn test_evaluate_without_operator_is_noop() {
        let mut state = CalculatorState::new();
        press(&mut state, "42");
        let before = state.clone();
        state.evaluate();
        assert_eq!(state.current_value, before.current_value);
        assert_eq!(state.previous_value, before.previous_value);
        assert_eq!(state.operator, before.operator);
        assert_eq!(state.is_new_entry, before.is_new_entry);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_repeated_equals_is_noop() {
        let mut state = CalculatorState::new();
        press(&mut state, "2*3==");
        assert_eq!(state.current_value, "6");
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_division_by_zero_shows_zero() {
        let mut state = CalculatorState::new();
        press(&mut state, "9/0=");
        assert_eq!(state.current_value, "0");
        assert_eq!(state.history.latest().unwrap().expression, "9 / 0");
    }

    #[test]
    fn test_percent_button() {
        let mut state = CalculatorState::new();
        press(&mut state, "850p15=");
        assert_eq!(state.current_value, "127.5");
        assert_eq!(state.history.latest().unwrap().expression, "850 % 15");
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut state = CalculatorState::new();
        press(&mut state, "1+1=5*");
        state.clear();
        assert_eq!(state.current_value, "0");
        assert_eq!(state.previous_value, None);
        assert_eq!(state.operator, None);
        assert!(state.is_new_entry);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_backspace() {
        let mut state = CalculatorState::new();
        press(&mut state, "123<");
        assert_eq!(state.current_value, "12");
        press(&mut state, "<<");
        assert_eq!(state.current_value, "0");
    }

    #[test]
    fn test_backspace_ignored_on_fresh_entry() {
        let mut state = CalculatorState::new();
        press(&mut state, "12+3=");
        press(&mut state, "<");
        assert_eq!(state.current_value, "15");
    }

    #[test]
    fn test_backspace_never_leaves_lone_minus() {
        let mut state = CalculatorState::new();
        press(&mut state, "5n");
        assert_eq!(state.current_value, "-5");
        press(&mut state, "<");
        assert_eq!(state.current_value, "0");
    }

    #[test]
    fn test_negate_keeps_entry_flag() {
        let mut state = CalculatorState::new();
        press(&mut state, "12n");
        assert_eq!(state.current_value, "-12");
        assert!(!state.is_new_entry);
        press(&mut state, "3");
        assert_eq!(state.current_value, "-123");

        let mut fresh = CalculatorState::new();
        fresh.negate();
        assert_eq!(fresh.current_value, "0");
        assert!(fresh.is_new_entry);
    }

    #[test]
    fn test_many_evaluations_stay_capped() {
        let mut state = CalculatorState::new();
        for _ in 0..60 {
            press(&mut state, "1+1=");
        }
        assert_eq!(state.history.len(), crate::history::MAX_HISTORY);
    }

    #[test]
    fn test_oracle_answer_updates_display() {
        let mut state = CalculatorState::new();
        press(&mut state, "12");
        let value = state.apply_oracle_answer("15% z 850", "127,5");
        assert_eq!(value, Some(127.5));
        assert_eq!(state.current_value, "127.5");
        assert!(state.is_new_entry);
        let item = state.history.latest().unwrap();
        assert!(item.is_ai);
        assert_eq!(item.expression, "15% z 850");
        assert_eq!(item.result, "127,5");
    }

    #[test]
    fn test_oracle_answer_without_number_keeps_display() {
        let mut state = CalculatorState::new();
        press(&mut state, "12");
        let value = state.apply_oracle_answer("kolik je hodin?", "Nevím");
        assert_eq!(value, None);
        assert_eq!(state.current_value, "12");
        assert_eq!(state.history.latest().unwrap().result, "Nevím");
    }

    #[test]
    fn test_transition_is_pure_over_owned_state() {
        let state = CalculatorState::new();
        let state = transition(state, Action::Digit('6'));
        let state = transition(state, Action::Operator(Operator::Divide));
        let state = transition(state, Action::Digit('4'));
        let state = transition(state, Action::Evaluate);
        assert_eq!(state.current_value, "1.5");
        let state = transition(state, Action::ClearHistory);
        assert!(state.history.is_empty());
        assert_eq!(state.current_value, "1.5");
    }
}
