use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Single-line text input. The cursor is a character index, so multibyte
/// input edits cleanly.
#[derive(Debug, Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub placeholder: String,
    pub label: String,
    pub focused: bool,
}

impl InputField {
    pub fn new(label: &str, placeholder: &str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            label: label.to_string(),
            focused: false,
        }
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                let idx = self.byte_index(self.cursor);
                self.value.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.char_count() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.label.as_str())
            .border_style(if self.focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner_width = area.width.saturating_sub(2) as usize;

        let text = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(
                &self.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let start = self.window_start(inner_width);
            let start_byte = self.byte_index(start);
            let visible = &self.value[start_byte..];

            if self.focused {
                let cursor_byte = self.byte_index(self.cursor) - start_byte;
                let (before, after) = visible.split_at(cursor_byte);
                Line::from(vec![
                    Span::raw(before),
                    Span::styled("│", Style::default().fg(Color::Yellow)),
                    Span::raw(after),
                ])
            } else {
                Line::from(Span::raw(visible))
            }
        };

        let paragraph = Paragraph::new(text).block(block);
        f.render_widget(paragraph, area);
    }

    /// First visible character index, chosen so the cursor stays inside a
    /// window of `width` display columns.
    fn window_start(&self, width: usize) -> usize {
        if width == 0 {
            return self.cursor;
        }

        let chars: Vec<char> = self.value.chars().collect();
        let mut start = self.cursor.min(chars.len());
        let mut used = 1; // one column for the cursor bar

        while start > 0 {
            let cell = chars[start - 1].width().unwrap_or(0);
            if used + cell > width {
                break;
            }
            used += cell;
            start -= 1;
        }

        start
    }

    pub fn is_valid(&self) -> bool {
        !self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.char_count();
    }
}

#[cfg(test)]
mod tests {
    use super::InputField;
    use crossterm::event::{KeyCode, KeyEvent};

    fn type_str(field: &mut InputField, s: &str) {
        for c in s.chars() {
            field.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_backspace() {
        let mut field = InputField::new("q", "");
        type_str(&mut field, "hello");
        field.handle_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(field.value, "hell");
        assert_eq!(field.cursor, 4);
    }

    #[test]
    fn editing_in_the_middle_of_multibyte_text() {
        let mut field = InputField::new("q", "");
        type_str(&mut field, "süß");
        field.handle_key(KeyEvent::from(KeyCode::Left));
        field.handle_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(field.value, "sß");
        field.handle_key(KeyEvent::from(KeyCode::Char('o')));
        assert_eq!(field.value, "soß");
    }

    #[test]
    fn blank_value_is_invalid() {
        let mut field = InputField::new("q", "");
        assert!(!field.is_valid());
        type_str(&mut field, "   ");
        assert!(!field.is_valid());
        type_str(&mut field, "x");
        assert!(field.is_valid());
    }
}
