use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::history::{History, HistoryItem};
use crate::ui::theme::Theme;

const AI_MARKER: &str = "\u{2726}"; // ✦

pub struct HistoryPanel<'a> {
    history: &'a History,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(history: &'a History, selected: usize, theme: &'a Theme) -> Self {
        Self {
            history,
            selected,
            theme,
        }
    }
}

/// First visible entry so that `selected` stays on screen.
fn scroll_offset(selected: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    selected
        .saturating_sub(visible - 1)
        .min(total - visible)
}

fn item_lines<'l>(item: &HistoryItem, selected: bool, theme: &Theme) -> [Line<'l>; 2] {
    let colors = &theme.colors;
    let mut expr_style = Style::default().fg(colors.muted());
    let mut result_style = Style::default()
        .fg(if item.is_ai { colors.ai() } else { colors.fg() })
        .add_modifier(Modifier::BOLD);
    if selected {
        expr_style = expr_style.bg(colors.border());
        result_style = result_style.bg(colors.border());
    }

    let mut head = Vec::new();
    if item.is_ai {
        head.push(Span::styled(
            format!("{AI_MARKER} "),
            Style::default().fg(colors.ai()),
        ));
    }
    head.push(Span::styled(item.expression.clone(), expr_style));
    head.push(Span::styled(
        format!("  {}", item.timestamp.format("%H:%M")),
        Style::default().fg(colors.muted()).add_modifier(Modifier::DIM),
    ));

    [
        Line::from(head),
        Line::from(Span::styled(format!("= {}", item.result), result_style)),
    ]
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = t!("history.title", count = self.history.len());
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if self.history.is_empty() {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    t!("history.empty").to_string(),
                    Style::default().fg(colors.muted()),
                )),
                Line::from(Span::styled(
                    t!("history.empty_hint").to_string(),
                    Style::default()
                        .fg(colors.muted())
                        .add_modifier(Modifier::DIM),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        // Two lines per entry plus a spacer
        let visible = ((inner.height as usize) + 1) / 3;
        let offset = scroll_offset(self.selected, self.history.len(), visible.max(1));

        let mut lines: Vec<Line> = Vec::new();
        for (i, item) in self.history.iter().enumerate().skip(offset).take(visible.max(1)) {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.extend(item_lines(item, i == self.selected, self.theme));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10, 4), 0);
        assert_eq!(scroll_offset(3, 10, 4), 0);
        assert_eq!(scroll_offset(4, 10, 4), 1);
        assert_eq!(scroll_offset(9, 10, 4), 6);
        assert_eq!(scroll_offset(5, 3, 4), 0);
    }

    #[test]
    fn ai_entries_are_marked() {
        let theme = Theme::default();
        let mut history = History::new();
        history.record("2 + 2", "4", false);
        history.record("polovina z 90", "45", true);

        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        HistoryPanel::new(&history, 0, &theme).render(area, &mut buf);
        let text = screen(&buf);

        assert!(text.contains("✦ polovina z 90"));
        assert!(text.contains("= 45"));
        assert!(text.contains("2 + 2"));
        // Newest entry is drawn first
        assert!(text.find("polovina").unwrap() < text.find("2 + 2").unwrap());
    }
}
