use std::sync::Arc;
use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::calculator::{Action, CalculatorState, Operator};
use crate::config::Config;
use crate::event::{AppEvent, spawn_oracle_request};
use crate::oracle::{MathOracle, OracleReply};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Calculator,
    Prompt,
    Fault,
}

/// The most recent oracle exchange, shown under the display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastAnswer {
    pub prompt: String,
    pub reply: OracleReply,
}

/// Calculator action bound to a key on the main screen.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char(ch) if ch.is_ascii_digit() => Some(Action::Digit(ch)),
        KeyCode::Char('.' | ',') => Some(Action::DecimalPoint),
        KeyCode::Char('%') => Some(Action::Percent),
        KeyCode::Char('=') | KeyCode::Enter => Some(Action::Evaluate),
        KeyCode::Char('n') => Some(Action::Negate),
        KeyCode::Char('c') | KeyCode::Esc | KeyCode::Delete => Some(Action::Clear),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(ch) => Operator::from_symbol(ch).map(Action::Operator),
        _ => None,
    }
}

pub struct App {
    pub screen: AppScreen,
    pub calc: CalculatorState,
    pub config: Config,
    pub theme: &'static Theme,
    pub prompt: LineInput,
    pub show_history: bool,
    pub history_selected: usize,
    /// Prompt of the oracle call in flight.
    pub pending_prompt: Option<String>,
    pub last_answer: Option<LastAnswer>,
    pub fault: Option<String>,
    pub should_quit: bool,
    pub ticks: u64,
    oracle: Arc<dyn MathOracle>,
    events: Option<mpsc::Sender<AppEvent>>,
}

impl App {
    pub fn new(config: Config, oracle: Arc<dyn MathOracle>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "unknown theme, using default");
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        Self {
            screen: AppScreen::Calculator,
            calc: CalculatorState::new(),
            config,
            theme,
            prompt: LineInput::default(),
            show_history: false,
            history_selected: 0,
            pending_prompt: None,
            last_answer: None,
            fault: None,
            should_quit: false,
            ticks: 0,
            oracle,
            events: None,
        }
    }

    /// Route oracle replies through the event loop.
    pub fn attach_events(&mut self, tx: mpsc::Sender<AppEvent>) {
        self.events = Some(tx);
    }

    /// An oracle call is in flight; calculator input is gated.
    pub fn is_busy(&self) -> bool {
        self.pending_prompt.is_some()
    }

    /// Apply a calculator action unless an oracle call is pending.
    pub fn press(&mut self, action: Action) -> bool {
        if self.is_busy() {
            return false;
        }
        self.calc.dispatch(action);
        true
    }

    pub fn open_prompt(&mut self) {
        self.screen = AppScreen::Prompt;
    }

    pub fn close_prompt(&mut self) {
        self.screen = AppScreen::Calculator;
    }

    /// Send the typed prompt to the oracle.
    ///
    /// Blank prompts, a call already in flight, or no attached event loop
    /// leave everything as is and return `None`.
    pub fn submit_prompt(&mut self) -> Option<String> {
        if self.is_busy() || self.prompt.is_blank() {
            return None;
        }
        let tx = self.events.clone()?;
        let prompt = self.prompt.value().to_string();
        tracing::debug!(%prompt, "submitting prompt");
        self.pending_prompt = Some(prompt.clone());
        spawn_oracle_request(Arc::clone(&self.oracle), prompt.clone(), tx);
        Some(prompt)
    }

    /// Fold a finished oracle call into the calculator.
    pub fn handle_oracle_reply(&mut self, prompt: String, reply: OracleReply) {
        if self.pending_prompt.as_deref() != Some(prompt.as_str()) {
            tracing::warn!(%prompt, "reply for a prompt that is not pending");
        }
        self.pending_prompt = None;
        self.calc.apply_oracle_answer(&prompt, &reply.answer);
        self.last_answer = Some(LastAnswer { prompt, reply });
        self.prompt.clear();
        self.history_selected = 0;
        if self.screen == AppScreen::Prompt {
            self.screen = AppScreen::Calculator;
        }
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
        self.history_selected = 0;
    }

    pub fn clear_history(&mut self) {
        if self.is_busy() {
            return;
        }
        self.calc.dispatch(Action::ClearHistory);
        self.history_selected = 0;
    }

    pub fn history_next(&mut self) {
        if self.history_selected + 1 < self.calc.history.len() {
            self.history_selected += 1;
        }
    }

    pub fn history_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// Switch to the fault notice.
    pub fn record_fault(&mut self, message: String) {
        tracing::error!(%message, "unexpected failure");
        self.fault = Some(message);
        self.screen = AppScreen::Fault;
    }

    /// Start a fresh session after a fault. Config and theme are kept.
    pub fn restart(&mut self) {
        tracing::info!("restarting session");
        self.calc = CalculatorState::new();
        self.prompt.clear();
        self.show_history = false;
        self.history_selected = 0;
        self.pending_prompt = None;
        self.last_answer = None;
        self.fault = None;
        self.screen = AppScreen::Calculator;
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::oracle::OracleError;

    struct Fixed(&'static str);

    impl MathOracle for Fixed {
        fn query(&self, _prompt: &str) -> Result<OracleReply, OracleError> {
            Ok(OracleReply {
                answer: self.0.to_string(),
                explanation: "Vysvětlení.".to_string(),
            })
        }
    }

    struct Offline;

    impl MathOracle for Offline {
        fn query(&self, _prompt: &str) -> Result<OracleReply, OracleError> {
            Err(OracleError::Transport("offline".to_string()))
        }
    }

    struct Exploding;

    impl MathOracle for Exploding {
        fn query(&self, _prompt: &str) -> Result<OracleReply, OracleError> {
            panic!("client blew up");
        }
    }

    fn app_with(oracle: Arc<dyn MathOracle>) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(Config::default(), oracle);
        app.attach_events(tx);
        (app, rx)
    }

    fn type_prompt(app: &mut App, text: &str) {
        app.prompt = LineInput::new(text);
    }

    fn deliver(app: &mut App, rx: &mpsc::Receiver<AppEvent>) {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Oracle { prompt, reply } => app.handle_oracle_reply(prompt, reply),
            _ => panic!("expected oracle reply"),
        }
    }

    #[test]
    fn test_prompt_roundtrip_updates_display_and_history() {
        let (mut app, rx) = app_with(Arc::new(Fixed("1 500,25 Kč")));
        app.open_prompt();
        type_prompt(&mut app, "  kolik stojí 3 lístky?  ");
        assert_eq!(app.submit_prompt().as_deref(), Some("  kolik stojí 3 lístky?  "));
        assert!(app.is_busy());

        deliver(&mut app, &rx);
        assert!(!app.is_busy());
        assert_eq!(app.screen, AppScreen::Calculator);
        assert_eq!(app.calc.current_value, "1500.25");
        let item = app.calc.history.latest().unwrap();
        assert!(item.is_ai);
        assert_eq!(item.expression, "  kolik stojí 3 lístky?  ");
        assert_eq!(item.result, "1 500,25 Kč");
        assert_eq!(app.prompt.value(), "");
        assert_eq!(app.last_answer.as_ref().unwrap().reply.explanation, "Vysvětlení.");
    }

    #[test]
    fn test_offline_oracle_records_sentinel() {
        let (mut app, rx) = app_with(Arc::new(Offline));
        app.press(Action::Digit('9'));
        type_prompt(&mut app, "2 + 2");
        app.submit_prompt().unwrap();
        deliver(&mut app, &rx);

        assert_eq!(app.calc.current_value, "9");
        assert_eq!(app.calc.history.latest().unwrap().result, "Chyba");
        assert!(app.last_answer.as_ref().unwrap().reply.is_sentinel());
    }

    #[test]
    fn test_panicking_oracle_releases_input() {
        let (mut app, rx) = app_with(Arc::new(Exploding));
        type_prompt(&mut app, "2 + 2");
        app.submit_prompt().unwrap();
        deliver(&mut app, &rx);

        assert!(!app.is_busy());
        assert!(app.last_answer.as_ref().unwrap().reply.is_sentinel());
        assert!(app.press(Action::Digit('3')));
        assert_eq!(app.calc.current_value, "3");
    }

    #[test]
    fn test_blank_prompt_is_not_submitted() {
        let (mut app, _rx) = app_with(Arc::new(Fixed("1")));
        type_prompt(&mut app, "   ");
        assert_eq!(app.submit_prompt(), None);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_input_gated_while_pending() {
        let (mut app, rx) = app_with(Arc::new(Fixed("4")));
        app.press(Action::Digit('7'));
        type_prompt(&mut app, "2 + 2");
        app.submit_prompt().unwrap();

        assert!(!app.press(Action::Digit('1')));
        assert!(!app.press(Action::Operator(Operator::Add)));
        type_prompt(&mut app, "3 + 3");
        assert_eq!(app.submit_prompt(), None);
        assert_eq!(app.calc.current_value, "7");

        deliver(&mut app, &rx);
        assert_eq!(app.calc.current_value, "4");
        assert!(app.press(Action::Digit('1')));
        // The AI result starts a fresh entry
        assert_eq!(app.calc.current_value, "1");
    }

    #[test]
    fn test_submit_without_event_loop_is_noop() {
        let mut app = App::new(Config::default(), Arc::new(Fixed("1")));
        type_prompt(&mut app, "1 + 0");
        assert_eq!(app.submit_prompt(), None);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_history_navigation_and_clear() {
        let (mut app, _rx) = app_with(Arc::new(Fixed("1")));
        for _ in 0..3 {
            app.press(Action::Digit('2'));
            app.press(Action::Operator(Operator::Multiply));
            app.press(Action::Digit('3'));
            app.press(Action::Evaluate);
        }
        app.toggle_history();
        assert!(app.show_history);
        app.history_next();
        app.history_next();
        app.history_next();
        assert_eq!(app.history_selected, 2);
        app.history_prev();
        assert_eq!(app.history_selected, 1);

        app.clear_history();
        assert!(app.calc.history.is_empty());
        assert_eq!(app.history_selected, 0);
        assert_eq!(app.calc.current_value, "6");
    }

    #[test]
    fn test_fault_and_restart() {
        let (mut app, _rx) = app_with(Arc::new(Fixed("1")));
        app.press(Action::Digit('5'));
        app.record_fault("boom".to_string());
        assert_eq!(app.screen, AppScreen::Fault);
        assert_eq!(app.fault.as_deref(), Some("boom"));

        app.restart();
        assert_eq!(app.screen, AppScreen::Calculator);
        assert_eq!(app.calc.current_value, "0");
        assert!(app.fault.is_none());
    }

    #[test]
    fn test_key_bindings() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(action_for_key(key(KeyCode::Char('7'))), Some(Action::Digit('7')));
        assert_eq!(action_for_key(key(KeyCode::Char(','))), Some(Action::DecimalPoint));
        assert_eq!(
            action_for_key(key(KeyCode::Char('*'))),
            Some(Action::Operator(Operator::Multiply))
        );
        assert_eq!(
            action_for_key(key(KeyCode::Char('-'))),
            Some(Action::Operator(Operator::Subtract))
        );
        assert_eq!(action_for_key(key(KeyCode::Char('%'))), Some(Action::Percent));
        assert_eq!(action_for_key(key(KeyCode::Enter)), Some(Action::Evaluate));
        assert_eq!(action_for_key(key(KeyCode::Esc)), Some(Action::Clear));
        assert_eq!(action_for_key(key(KeyCode::Char('q'))), None);
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }
}
