//! Text entry widgets shared by the login and profile forms

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

const MASK_CHAR: char = '•';

pub enum FormField {
    /// Single-line input; `cursor` counts chars, not bytes
    TextInput {
        value: String,
        cursor: usize,
        placeholder: String,
        max_length: Option<usize>,
        masked: bool,
    },
    /// Multi-line input backed by tui-textarea
    TextArea { textarea: Box<TextArea<'static>> },
}

impl FormField {
    pub fn text(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            max_length: None,
            masked: false,
        }
    }

    /// Single-line input that renders every character as a bullet
    pub fn password(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            max_length: None,
            masked: true,
        }
    }

    pub fn multiline(placeholder: &str) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(placeholder);
        FormField::TextArea {
            textarea: Box::new(textarea),
        }
    }

    pub fn with_max_length(mut self, limit: usize) -> Self {
        if let FormField::TextInput { max_length, .. } = &mut self {
            *max_length = Some(limit);
        }
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput { value, cursor, .. } => {
                *value = new_value.to_string();
                *cursor = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
        }
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    pub fn is_blank(&self) -> bool {
        self.value().trim().is_empty()
    }

    /// Handle a key press, returning true when the field consumed it
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor,
                max_length,
                ..
            } => {
                let len = value.chars().count();
                match key {
                    KeyCode::Char(c) => {
                        if max_length.map_or(true, |m| len < m) {
                            let at = byte_offset(value, *cursor);
                            value.insert(at, c);
                            *cursor += 1;
                        }
                        true
                    }
                    KeyCode::Backspace => {
                        if *cursor > 0 {
                            *cursor -= 1;
                            let at = byte_offset(value, *cursor);
                            value.remove(at);
                        }
                        true
                    }
                    KeyCode::Delete => {
                        if *cursor < len {
                            let at = byte_offset(value, *cursor);
                            value.remove(at);
                        }
                        true
                    }
                    KeyCode::Left => {
                        *cursor = cursor.saturating_sub(1);
                        true
                    }
                    KeyCode::Right => {
                        *cursor = (*cursor + 1).min(len);
                        true
                    }
                    KeyCode::Home => {
                        *cursor = 0;
                        true
                    }
                    KeyCode::End => {
                        *cursor = len;
                        true
                    }
                    _ => false,
                }
            }
            FormField::TextArea { textarea, .. } => match key {
                // Focus movement belongs to the form
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => false,
                _ => {
                    textarea.input(KeyEvent::new(key, KeyModifiers::NONE));
                    true
                }
            },
        }
    }

    /// Rows needed inside the border
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 1,
            FormField::TextArea { .. } => 4,
        }
    }

    /// Text as shown on screen, with the cursor bar when focused
    pub fn display_text(&self, focused: bool) -> String {
        match self {
            FormField::TextInput {
                value,
                cursor,
                masked,
                ..
            } => {
                let mut shown: Vec<char> = if *masked {
                    std::iter::repeat(MASK_CHAR)
                        .take(value.chars().count())
                        .collect()
                } else {
                    value.chars().collect()
                };
                if focused {
                    shown.insert((*cursor).min(shown.len()), '|');
                }
                shown.into_iter().collect()
            }
            FormField::TextArea { .. } => self.value(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let display = self.display_text(focused);
        match self {
            FormField::TextInput {
                value,
                placeholder,
                max_length,
                ..
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let suffix = max_length
                        .map(|m| format!(" ({}/{m})", value.chars().count()))
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(display),
                        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                    ])
                };
                frame.render_widget(Paragraph::new(content).block(block), area);
            }
            FormField::TextArea { textarea, .. } => {
                textarea.set_block(block);
                textarea.set_cursor_style(if focused {
                    Style::default().bg(Color::White)
                } else {
                    Style::default()
                });
                frame.render_widget(&**textarea, area);
            }
        }
    }
}

fn byte_offset(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map_or(value.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(field: &mut FormField, text: &str) {
        for c in text.chars() {
            field.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut field = FormField::text("Email");
        type_str(&mut field, "amara@kijani.org");
        assert_eq!(field.value(), "amara@kijani.org");

        field.handle_key(KeyCode::Home);
        field.handle_key(KeyCode::Delete);
        field.handle_key(KeyCode::End);
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "mara@kijani.or");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut field = FormField::text("Location");
        type_str(&mut field, "Zürich");
        field.handle_key(KeyCode::Left);
        field.handle_key(KeyCode::Left);
        field.handle_key(KeyCode::Left);
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "Zrich");
        field.handle_key(KeyCode::Char('ü'));
        assert_eq!(field.value(), "Zürich");
    }

    #[test]
    fn test_password_is_masked() {
        let mut field = FormField::password("Password");
        type_str(&mut field, "secret1");
        assert_eq!(field.value(), "secret1");
        assert_eq!(field.display_text(false), "•••••••");
        assert_eq!(field.display_text(true), "•••••••|");
    }

    #[test]
    fn test_max_length() {
        let mut field = FormField::text("Phone").with_max_length(3);
        type_str(&mut field, "12345");
        assert_eq!(field.value(), "123");
    }

    #[test]
    fn test_multiline_keeps_lines_and_releases_tab() {
        let mut field = FormField::multiline("Bio").with_value("first\nsecond");
        assert_eq!(field.value(), "first\nsecond");
        assert!(!field.handle_key(KeyCode::Tab));
        field.clear();
        assert!(field.is_blank());
    }
}
