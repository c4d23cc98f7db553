use crate::tui::app::Exchange;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

#[derive(Clone, Copy, PartialEq)]
enum LineKind {
    Meta,
    Question,
    Answer,
    AnswerFailed,
    Pending,
    Blank,
}

/// Scrollable view over the session's exchange log. Sticks to the bottom
/// while `follow` is set; any manual scroll takes over until End re-enables
/// it.
pub struct ChatView {
    scroll: usize,
    following: bool,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            following: true,
        }
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
        self.following = true;
    }

    pub fn follow(&mut self) {
        self.following = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => {
                self.following = false;
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.scroll += 1;
                true
            }
            KeyCode::PageUp => {
                self.following = false;
                self.scroll = self.scroll.saturating_sub(10);
                true
            }
            KeyCode::PageDown => {
                self.scroll += 10;
                true
            }
            KeyCode::End => {
                self.following = true;
                true
            }
            _ => false,
        }
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        exchanges: &[Exchange],
        pending: Option<&str>,
    ) {
        let inner_width = area.width.saturating_sub(2).max(1) as usize;
        let visible = area.height.saturating_sub(2) as usize;

        let lines = layout_lines(exchanges, pending, inner_width);
        let max_scroll = lines.len().saturating_sub(visible);

        if self.following {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
            if self.scroll == max_scroll {
                self.following = true;
            }
        }

        let styled: Vec<Line> = lines
            .into_iter()
            .skip(self.scroll)
            .take(visible)
            .map(|(text, kind)| {
                let style = match kind {
                    LineKind::Meta => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    LineKind::Question => Style::default().fg(Color::White),
                    LineKind::Answer => Style::default().fg(Color::Green),
                    LineKind::AnswerFailed => Style::default().fg(Color::Red),
                    LineKind::Pending => Style::default().fg(Color::DarkGray),
                    LineKind::Blank => Style::default(),
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        let paragraph =
            Paragraph::new(styled).block(Block::default().borders(Borders::ALL).title("Chat"));
        f.render_widget(paragraph, area);
    }
}

fn layout_lines(
    exchanges: &[Exchange],
    pending: Option<&str>,
    width: usize,
) -> Vec<(String, LineKind)> {
    let mut lines = Vec::new();

    for exchange in exchanges {
        lines.push((
            format!("You  {}", exchange.at.format("%H:%M")),
            LineKind::Meta,
        ));
        push_wrapped(&mut lines, &exchange.question, width, LineKind::Question);

        let answer_kind = if exchange.failed {
            LineKind::AnswerFailed
        } else {
            LineKind::Answer
        };
        lines.push(("Assistant".to_string(), LineKind::Meta));
        push_wrapped(&mut lines, &exchange.answer, width, answer_kind);
        lines.push((String::new(), LineKind::Blank));
    }

    if let Some(question) = pending {
        lines.push(("You".to_string(), LineKind::Meta));
        push_wrapped(&mut lines, question, width, LineKind::Question);
        lines.push(("Assistant is thinking...".to_string(), LineKind::Pending));
    }

    lines
}

fn push_wrapped(lines: &mut Vec<(String, LineKind)>, text: &str, width: usize, kind: LineKind) {
    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            lines.push((String::new(), kind));
            continue;
        }
        for wrapped in textwrap::wrap(raw_line, width.max(1)) {
            lines.push((wrapped.into_owned(), kind));
        }
    }
}
