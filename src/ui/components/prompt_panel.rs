use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::app::LastAnswer;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn spinner_frame(ticks: u64) -> &'static str {
    SPINNER[(ticks % SPINNER.len() as u64) as usize]
}

/// Popup for asking the AI assistant.
pub struct PromptPanel<'a> {
    input: &'a LineInput,
    pending: Option<&'a str>,
    last_answer: Option<&'a LastAnswer>,
    ticks: u64,
    theme: &'a Theme,
}

impl<'a> PromptPanel<'a> {
    pub fn new(
        input: &'a LineInput,
        pending: Option<&'a str>,
        last_answer: Option<&'a LastAnswer>,
        ticks: u64,
        theme: &'a Theme,
    ) -> Self {
        Self {
            input,
            pending,
            last_answer,
            ticks,
            theme,
        }
    }
}

impl Widget for PromptPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" {} {} ", "\u{2726}", t!("prompt.title")))
            .border_style(Style::default().fg(colors.ai()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        // Input line
        let input_block = Block::bordered().border_style(Style::default().fg(
            if self.pending.is_some() {
                colors.border()
            } else {
                colors.border_focused()
            },
        ));
        let input_inner = input_block.inner(sections[0]);
        input_block.render(sections[0], buf);

        let line = if let Some(prompt) = self.pending {
            Line::from(vec![
                Span::styled(
                    format!("{} ", spinner_frame(self.ticks)),
                    Style::default().fg(colors.ai()),
                ),
                Span::styled(prompt.to_string(), Style::default().fg(colors.muted())),
            ])
        } else if self.input.value().is_empty() {
            Line::from(vec![
                Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
                Span::styled(
                    t!("prompt.placeholder").to_string(),
                    Style::default().fg(colors.muted()),
                ),
            ])
        } else {
            let (before, cursor, after) = self.input.render_parts();
            let cursor_str = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
            Line::from(vec![
                Span::styled(before.to_string(), Style::default().fg(colors.fg())),
                Span::styled(
                    cursor_str,
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(Modifier::REVERSED),
                ),
                Span::styled(after.to_string(), Style::default().fg(colors.fg())),
            ])
        };
        Paragraph::new(line).render(input_inner, buf);

        // Status or previous answer
        let mut body: Vec<Line> = Vec::new();
        if self.pending.is_some() {
            body.push(Line::from(Span::styled(
                t!("prompt.pending").to_string(),
                Style::default().fg(colors.ai()).add_modifier(Modifier::ITALIC),
            )));
        } else if let Some(last) = self.last_answer {
            let answer_color = if last.reply.is_sentinel() {
                colors.error()
            } else {
                colors.ai()
            };
            body.push(Line::from(vec![
                Span::styled(last.prompt.clone(), Style::default().fg(colors.muted())),
            ]));
            if last.reply.is_empty() {
                body.push(Line::from(Span::styled(
                    t!("prompt.not_math").to_string(),
                    Style::default().fg(colors.error()),
                )));
            } else {
                body.push(Line::from(Span::styled(
                    format!("= {}", last.reply.answer),
                    Style::default().fg(answer_color).add_modifier(Modifier::BOLD),
                )));
            }
            if !last.reply.explanation.is_empty() {
                body.push(Line::from(""));
                body.push(Line::from(Span::styled(
                    last.reply.explanation.clone(),
                    Style::default().fg(colors.fg()),
                )));
            }
        } else {
            body.push(Line::from(Span::styled(
                t!("prompt.intro").to_string(),
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .render(sections[1], buf);

        Paragraph::new(Line::from(Span::styled(
            t!("prompt.hints").to_string(),
            Style::default().fg(colors.muted()),
        )))
        .render(sections[2], buf);
    }
}
