//! Profile editor for the signed-in user

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::session::{User, UserPatch};
use crate::ui::form_field::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Location,
    Pronouns,
    Phone,
    Website,
    Bio,
}

impl ProfileField {
    pub fn all() -> &'static [ProfileField] {
        &[
            ProfileField::Location,
            ProfileField::Pronouns,
            ProfileField::Phone,
            ProfileField::Website,
            ProfileField::Bio,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Location => "Location",
            ProfileField::Pronouns => "Pronouns",
            ProfileField::Phone => "Phone",
            ProfileField::Website => "Website",
            ProfileField::Bio => "Bio",
        }
    }

    fn current(&self, user: &User) -> Option<String> {
        match self {
            ProfileField::Location => user.location.clone(),
            ProfileField::Pronouns => user.pronouns.clone(),
            ProfileField::Phone => user.phone.clone(),
            ProfileField::Website => user.website.clone(),
            ProfileField::Bio => user.bio.clone(),
        }
    }

    fn widget(&self) -> FormField {
        match self {
            ProfileField::Bio => FormField::multiline("A few lines about you"),
            ProfileField::Phone => FormField::text("+254 700 000 000").with_max_length(20),
            ProfileField::Pronouns => FormField::text("e.g., they/them").with_max_length(20),
            ProfileField::Location => FormField::text("City, country"),
            ProfileField::Website => FormField::text("https://"),
        }
    }
}

/// Position of the keyboard focus: a field, then the two buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFocus {
    Field(usize),
    Save,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    None,
    Save(UserPatch),
    Cancel,
}

pub struct ProfileScreen {
    /// Values at open time; only changed fields end up in the patch
    original: Vec<Option<String>>,
    fields: Vec<FormField>,
    pub focus: ProfileFocus,
    status: Option<String>,
    title: String,
}

impl ProfileScreen {
    pub fn new(user: &User) -> Self {
        let original: Vec<Option<String>> =
            ProfileField::all().iter().map(|f| f.current(user)).collect();
        let fields = ProfileField::all()
            .iter()
            .zip(&original)
            .map(|(field, value)| field.widget().with_value(value.as_deref().unwrap_or("")))
            .collect();
        Self {
            original,
            fields,
            focus: ProfileFocus::Field(0),
            status: None,
            title: format!("{} · {}", user.display_name, user.email),
        }
    }

    pub fn value(&self, field: ProfileField) -> String {
        self.index_of(field)
            .map(|i| self.fields[i].value())
            .unwrap_or_default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Patch holding the fields whose trimmed value changed
    pub fn patch(&self) -> UserPatch {
        let mut patch = UserPatch::default();
        for ((field, widget), original) in ProfileField::all()
            .iter()
            .zip(&self.fields)
            .zip(&self.original)
        {
            let value = widget.value().trim().to_string();
            if original.as_deref().unwrap_or("") == value {
                continue;
            }
            let slot = match field {
                ProfileField::Location => &mut patch.location,
                ProfileField::Pronouns => &mut patch.pronouns,
                ProfileField::Phone => &mut patch.phone,
                ProfileField::Website => &mut patch.website,
                ProfileField::Bio => &mut patch.bio,
            };
            *slot = Some(value);
        }
        patch
    }

    /// Accept the current values as the new baseline after a save
    pub fn mark_saved(&mut self) {
        self.original = self
            .fields
            .iter()
            .map(|f| Some(f.value().trim().to_string()).filter(|v| !v.is_empty()))
            .collect();
        self.status = Some("Profile updated".to_string());
    }

    fn index_of(&self, field: ProfileField) -> Option<usize> {
        ProfileField::all().iter().position(|f| *f == field)
    }

    fn focus_next(&mut self) {
        let count = self.fields.len();
        self.focus = match self.focus {
            ProfileFocus::Field(i) if i + 1 < count => ProfileFocus::Field(i + 1),
            ProfileFocus::Field(_) => ProfileFocus::Save,
            ProfileFocus::Save => ProfileFocus::Cancel,
            ProfileFocus::Cancel => ProfileFocus::Field(0),
        };
    }

    fn focus_prev(&mut self) {
        let count = self.fields.len();
        self.focus = match self.focus {
            ProfileFocus::Field(0) => ProfileFocus::Cancel,
            ProfileFocus::Field(i) => ProfileFocus::Field(i - 1),
            ProfileFocus::Save => ProfileFocus::Field(count - 1),
            ProfileFocus::Cancel => ProfileFocus::Save,
        };
    }

    pub fn handle_key(&mut self, key: KeyCode) -> ProfileAction {
        match (self.focus, key) {
            (_, KeyCode::Esc) => return ProfileAction::Cancel,
            (_, KeyCode::Tab) => self.focus_next(),
            (_, KeyCode::BackTab) => self.focus_prev(),
            (ProfileFocus::Save, KeyCode::Enter) => {
                let patch = self.patch();
                if patch.is_empty() {
                    self.status = Some("Nothing to save".to_string());
                    return ProfileAction::None;
                }
                return ProfileAction::Save(patch);
            }
            (ProfileFocus::Cancel, KeyCode::Enter) => return ProfileAction::Cancel,
            (ProfileFocus::Field(i), KeyCode::Enter)
                if !matches!(self.fields[i], FormField::TextArea { .. }) =>
            {
                self.focus_next();
            }
            (ProfileFocus::Field(i), other) => {
                if self.fields[i].handle_key(other) {
                    self.status = None;
                }
            }
            _ => {}
        }
        ProfileAction::None
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let block = Block::default()
            .title(format!(" Profile · {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(frame.area());
        frame.render_widget(block, frame.area());

        let mut constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|f| Constraint::Length(f.render_height() + 2))
            .collect();
        constraints.push(Constraint::Length(1)); // Buttons
        constraints.push(Constraint::Length(1)); // Status
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        let focus = self.focus;
        for (i, (field, widget)) in ProfileField::all()
            .iter()
            .zip(self.fields.iter_mut())
            .enumerate()
        {
            widget.render(frame, chunks[i], field.label(), focus == ProfileFocus::Field(i));
        }

        let button = |label: &'static str, focused: bool| {
            if focused {
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
        let count = self.fields.len();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                button("Save", focus == ProfileFocus::Save),
                Span::raw("  "),
                button("Cancel", focus == ProfileFocus::Cancel),
            ])),
            chunks[count],
        );

        if let Some(status) = &self.status {
            frame.render_widget(
                Paragraph::new(Span::styled(status.as_str(), Style::default().fg(Color::Green))),
                chunks[count + 1],
            );
        }
    }
}
