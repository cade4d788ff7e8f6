use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::calculator::{CalculatorState, parse_number};
use crate::ui::theme::Theme;

/// The calculator readout: pending operation above, current value below.
pub struct CalcDisplay<'a> {
    calc: &'a CalculatorState,
    busy: bool,
    theme: &'a Theme,
}

impl<'a> CalcDisplay<'a> {
    pub fn new(calc: &'a CalculatorState, busy: bool, theme: &'a Theme) -> Self {
        Self { calc, busy, theme }
    }
}

/// Fit `value` into `width` cells.
///
/// Results that are too wide switch to exponent form; digits being typed keep
/// their tail.
fn fit_value(value: &str, width: usize, is_result: bool) -> String {
    let len = value.chars().count();
    if len <= width || width == 0 {
        return value.to_string();
    }
    let number = parse_number(value);
    if is_result && number.is_finite() {
        let compact = format!("{number:e}");
        if compact.chars().count() <= width {
            return compact;
        }
    }
    let tail: String = value.chars().skip(len - width + 1).collect();
    format!("\u{2026}{tail}")
}

impl Widget for CalcDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.display_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let pending = match (self.calc.previous_value.as_deref(), self.calc.operator) {
            (Some(previous), Some(op)) => format!("{previous} {}", op.label()),
            _ => String::new(),
        };

        let status = if self.busy {
            Span::styled(
                t!("display.thinking").to_string(),
                Style::default().fg(colors.ai()).add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::styled(pending, Style::default().fg(colors.muted()))
        };

        let value = fit_value(
            &self.calc.current_value,
            inner.width as usize,
            self.calc.is_new_entry,
        );
        let mut lines = vec![
            Line::from(status),
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        // Vertically anchor to the bottom like a physical display
        let padding = inner.height.saturating_sub(lines.len() as u16);
        for _ in 0..padding {
            lines.insert(0, Line::from(""));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Right)
            .render(inner, buf);
    }
}
