use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use rust_i18n::t;

use crate::app::{App, AppScreen};
use crate::ui::layout::pack_hint_lines;
use crate::ui::theme::Theme;

/// Top bar: app name, model and assistant status.
pub struct Header<'a> {
    model: &'a str,
    busy: bool,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(model: &'a str, busy: bool, theme: &'a Theme) -> Self {
        Self { model, busy, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let base = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

        let status = if self.busy {
            t!("header.busy").to_string()
        } else {
            t!("header.ready").to_string()
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", t!("app.title")),
                base.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("\u{2726} {} ", self.model),
                base.fg(colors.ai()),
            ),
            Span::styled(format!("\u{00b7} {status}"), base.fg(colors.muted())),
        ]);
        Paragraph::new(line).style(base).render(area, buf);
    }
}

/// Key hints for the current screen.
pub fn footer_hints(app: &App) -> Vec<String> {
    match app.screen {
        AppScreen::Calculator => {
            let mut hints = vec![
                t!("footer.ai").to_string(),
                t!("footer.history").to_string(),
            ];
            if app.show_history {
                hints.push(t!("footer.clear_history").to_string());
                hints.push(t!("footer.scroll").to_string());
            }
            hints.push(t!("footer.clear").to_string());
            hints.push(t!("footer.quit").to_string());
            hints
        }
        AppScreen::Prompt => vec![
            t!("footer.submit").to_string(),
            t!("footer.back").to_string(),
        ],
        AppScreen::Fault => vec![
            t!("footer.restart").to_string(),
            t!("footer.quit").to_string(),
        ],
    }
}

pub struct Footer<'a> {
    hints: Vec<String>,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(hints: Vec<String>, theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let hints: Vec<&str> = self.hints.iter().map(String::as_str).collect();
        let lines: Vec<Line> = pack_hint_lines(&hints, area.width as usize)
            .into_iter()
            .take(area.height as usize)
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}
