//! Sign-in form

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::dialogs::centered_rect;
use crate::ui::form_field::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
}

/// What the app should do after a key press on the login screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit { email: String, password: String },
    Cancel,
}

pub struct LoginScreen {
    email: FormField,
    password: FormField,
    pub focus: LoginFocus,
    error: Option<String>,
    submitting: bool,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            email: FormField::text("you@example.org"),
            password: FormField::password("At least 8 characters"),
            focus: LoginFocus::Email,
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
        if submitting {
            self.error = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> LoginAction {
        // Input is frozen while the request is in flight
        if self.submitting {
            return LoginAction::None;
        }

        match key {
            KeyCode::Esc => LoginAction::Cancel,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    LoginFocus::Email => LoginFocus::Password,
                    LoginFocus::Password => LoginFocus::Email,
                };
                LoginAction::None
            }
            KeyCode::Enter => match self.focus {
                LoginFocus::Email => {
                    self.focus = LoginFocus::Password;
                    LoginAction::None
                }
                LoginFocus::Password => LoginAction::Submit {
                    email: self.email.value(),
                    password: self.password.value(),
                },
            },
            other => {
                if self.focused_field().handle_key(other) {
                    self.error = None;
                }
                LoginAction::None
            }
        }
    }

    fn focused_field(&mut self) -> &mut FormField {
        match self.focus {
            LoginFocus::Email => &mut self.email,
            LoginFocus::Password => &mut self.password,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = centered_rect(50, 60, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "Civic",
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Sign in "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Intro
                Constraint::Length(3), // Email
                Constraint::Length(3), // Password
                Constraint::Length(2), // Status / error
                Constraint::Min(0),
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let intro = Paragraph::new("Welcome back. Sign in to reach your dashboard.")
            .alignment(Alignment::Center);
        frame.render_widget(intro, chunks[0]);

        let focus = self.focus;
        self.email
            .render(frame, chunks[1], "Email", focus == LoginFocus::Email);
        self.password
            .render(frame, chunks[2], "Password", focus == LoginFocus::Password);

        let status = if self.submitting {
            Line::from(Span::styled(
                "Signing in...",
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(error) = &self.error {
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[3]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
            Span::raw(" switch field  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" sign in  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[5]);
    }
}
