use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::calculator::{CalculatorState, Operator, Phase};
use crate::ui::theme::{Theme, ThemeColors};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    Digit,
    Operator,
    Function,
    Danger,
    Equals,
}

#[derive(Clone, Copy, Debug)]
pub struct KeyCap {
    pub label: &'static str,
    pub kind: KeyKind,
    /// Columns occupied.
    pub span: u16,
    pub operator: Option<Operator>,
}

const fn cap(label: &'static str, kind: KeyKind) -> KeyCap {
    KeyCap {
        label,
        kind,
        span: 1,
        operator: None,
    }
}

const fn op(label: &'static str, operator: Operator) -> KeyCap {
    KeyCap {
        label,
        kind: KeyKind::Operator,
        span: 1,
        operator: Some(operator),
    }
}

pub const COLUMNS: u16 = 4;

pub const ROWS: [&[KeyCap]; 5] = [
    &[
        cap("C", KeyKind::Danger),
        cap("±", KeyKind::Function),
        op("%", Operator::Percent),
        op("÷", Operator::Divide),
    ],
    &[
        cap("7", KeyKind::Digit),
        cap("8", KeyKind::Digit),
        cap("9", KeyKind::Digit),
        op("×", Operator::Multiply),
    ],
    &[
        cap("4", KeyKind::Digit),
        cap("5", KeyKind::Digit),
        cap("6", KeyKind::Digit),
        op("−", Operator::Subtract),
    ],
    &[
        cap("1", KeyKind::Digit),
        cap("2", KeyKind::Digit),
        cap("3", KeyKind::Digit),
        op("+", Operator::Add),
    ],
    &[
        KeyCap {
            label: "0",
            kind: KeyKind::Digit,
            span: 2,
            operator: None,
        },
        cap(".", KeyKind::Digit),
        cap("=", KeyKind::Equals),
    ],
];

impl KeyKind {
    fn color(self, colors: &ThemeColors) -> Color {
        match self {
            KeyKind::Digit => colors.key_digit(),
            KeyKind::Operator => colors.key_operator(),
            KeyKind::Function => colors.key_function(),
            KeyKind::Danger => colors.key_danger(),
            KeyKind::Equals => colors.key_equals(),
        }
    }
}

/// Rectangles for every key cap, row by row.
pub fn key_rects(area: Rect) -> Vec<(KeyCap, Rect)> {
    let rows = ROWS.len() as u16;
    let cell_w = area.width / COLUMNS;
    let cell_h = area.height / rows;
    if cell_w == 0 || cell_h == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for (r, row) in ROWS.iter().enumerate() {
        let mut col = 0u16;
        for key in row.iter() {
            let rect = Rect::new(
                area.x + col * cell_w,
                area.y + r as u16 * cell_h,
                cell_w * key.span,
                cell_h,
            );
            out.push((*key, rect));
            col += key.span;
        }
    }
    out
}

/// Visual keypad. Input comes from the keyboard; the pad mirrors it.
pub struct Keypad<'a> {
    calc: &'a CalculatorState,
    dimmed: bool,
    theme: &'a Theme,
}

impl<'a> Keypad<'a> {
    pub fn new(calc: &'a CalculatorState, dimmed: bool, theme: &'a Theme) -> Self {
        Self {
            calc,
            dimmed,
            theme,
        }
    }
}

impl Widget for Keypad<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let armed = match self.calc.phase() {
            Phase::OperatorPending => self.calc.operator,
            _ => None,
        };

        for (key, rect) in key_rects(area) {
            let mut style = Style::default().fg(key.kind.color(colors));
            let is_armed = key.operator.is_some() && key.operator == armed;
            if is_armed {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            if self.dimmed {
                style = style.fg(colors.muted()).add_modifier(Modifier::DIM);
            }

            if rect.height >= 3 {
                let border = if is_armed {
                    colors.border_focused()
                } else {
                    colors.border()
                };
                let block = Block::bordered().border_style(Style::default().fg(border));
                let inner = block.inner(rect);
                block.render(rect, buf);
                let label_area = Rect::new(
                    inner.x,
                    inner.y + inner.height.saturating_sub(1) / 2,
                    inner.width,
                    inner.height.min(1),
                );
                Paragraph::new(key.label)
                    .style(style)
                    .alignment(Alignment::Center)
                    .render(label_area, buf);
            } else {
                let label_area = Rect::new(rect.x, rect.y + rect.height / 2, rect.width, 1);
                Paragraph::new(key.label)
                    .style(style)
                    .alignment(Alignment::Center)
                    .render(label_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_fill_four_columns() {
        for row in ROWS {
            let used: u16 = row.iter().map(|k| k.span).sum();
            assert_eq!(used, COLUMNS);
        }
    }

    #[test]
    fn zero_key_spans_two_cells() {
        let rects = key_rects(Rect::new(0, 0, 40, 15));
        assert_eq!(rects.len(), 19);
        let (zero, rect) = rects.iter().find(|(k, _)| k.label == "0").unwrap();
        assert_eq!(zero.span, 2);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 12);
    }

    #[test]
    fn too_small_area_renders_nothing() {
        assert!(key_rects(Rect::new(0, 0, 3, 20)).is_empty());
    }

    #[test]
    fn every_operator_has_a_key() {
        let on_pad: Vec<Operator> = ROWS
            .iter()
            .flat_map(|row| row.iter().filter_map(|k| k.operator))
            .collect();
        for op in Operator::ALL {
            assert!(on_pad.contains(&op), "{op:?} missing");
        }
    }
}
