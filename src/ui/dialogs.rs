use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::keybindings::{shortcuts_for_context, ShortcutContext};

/// Centered sub-rectangle taking the given percentages of `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmSelection {
    Yes,
    No,
}

/// Answer from a confirm dialog key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Pending,
    Confirmed,
    Cancelled,
}

/// Yes/No prompt
pub struct ConfirmDialog {
    pub visible: bool,
    title: String,
    message: String,
    pub selection: ConfirmSelection,
}

impl ConfirmDialog {
    pub fn new(title: &str) -> Self {
        Self {
            visible: false,
            title: title.to_string(),
            message: String::new(),
            selection: ConfirmSelection::No,
        }
    }

    pub fn show(&mut self, message: &str) {
        self.message = message.to_string();
        self.selection = ConfirmSelection::No;
        self.visible = true;
    }

    pub fn handle_key(&mut self, key: KeyCode) -> ConfirmOutcome {
        let outcome = match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h' | 'l') => {
                self.selection = match self.selection {
                    ConfirmSelection::Yes => ConfirmSelection::No,
                    ConfirmSelection::No => ConfirmSelection::Yes,
                };
                ConfirmOutcome::Pending
            }
            KeyCode::Char('y' | 'Y') => ConfirmOutcome::Confirmed,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => ConfirmOutcome::Cancelled,
            KeyCode::Enter => match self.selection {
                ConfirmSelection::Yes => ConfirmOutcome::Confirmed,
                ConfirmSelection::No => ConfirmOutcome::Cancelled,
            },
            _ => ConfirmOutcome::Pending,
        };
        if outcome != ConfirmOutcome::Pending {
            self.visible = false;
        }
        outcome
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);

        let button = |label: &'static str, selected: bool| {
            if selected {
                Span::styled(
                    format!("[{label}]"),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
            }
        };

        let text = vec![
            Line::from(""),
            Line::from(self.message.as_str()),
            Line::from(""),
            Line::from(vec![
                button("Yes", self.selection == ConfirmSelection::Yes),
                Span::raw("    "),
                button("No", self.selection == ConfirmSelection::No),
            ]),
        ];

        let dialog = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        frame.render_widget(dialog, area);
    }
}

/// Shortcut overlay for the current screen
pub struct HelpDialog {
    pub visible: bool,
}

impl Default for HelpDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpDialog {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame, context: ShortcutContext) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let mut help_text = vec![
            Line::from(Span::styled(
                "Keyboard Shortcuts",
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            )),
            Line::from(""),
        ];

        let sections = if context == ShortcutContext::Global {
            vec![ShortcutContext::Global]
        } else {
            vec![context, ShortcutContext::Global]
        };

        for (i, section) in sections.into_iter().enumerate() {
            if i > 0 {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                section.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for shortcut in shortcuts_for_context(section) {
                help_text.push(Line::from(vec![
                    Span::styled(
                        shortcut.key_display_padded(),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(shortcut.description),
                ]));
            }
        }

        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(Color::DarkGray),
        )));

        let help = Paragraph::new(help_text).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(help, area);
    }
}
