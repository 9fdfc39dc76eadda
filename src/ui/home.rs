//! Landing menu plus the placeholder pages (restoring, not found)

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::routes::{DashboardKind, LOGIN_PATH, PROFILE_PATH};
use crate::session::User;
use crate::ui::dialogs::centered_rect;
use crate::wizard::FlowKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    None,
    Navigate(&'static str),
    SignOut,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MenuItem {
    label: &'static str,
    action: HomeAction,
}

fn menu(user: Option<&User>) -> Vec<MenuItem> {
    let mut items = Vec::new();
    match user {
        Some(user) => {
            items.push(MenuItem {
                label: "Go to my dashboard",
                action: HomeAction::Navigate(DashboardKind::for_role(user.role).route()),
            });
            items.push(MenuItem {
                label: "Edit my profile",
                action: HomeAction::Navigate(PROFILE_PATH),
            });
        }
        None => items.push(MenuItem {
            label: "Sign in",
            action: HomeAction::Navigate(LOGIN_PATH),
        }),
    }

    items.extend(FlowKind::all().iter().map(|flow| MenuItem {
        label: flow.label(),
        action: HomeAction::Navigate(flow.entry_route()),
    }));

    if user.is_some() {
        items.push(MenuItem {
            label: "Sign out",
            action: HomeAction::SignOut,
        });
    }
    items.push(MenuItem {
        label: "Quit",
        action: HomeAction::Quit,
    });
    items
}

pub struct HomeScreen {
    state: ListState,
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, user: Option<&User>) -> HomeAction {
        let items = menu(user);
        let current = self.state.selected().unwrap_or(0).min(items.len() - 1);
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.select(Some((current + 1) % items.len()));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state
                    .select(Some((current + items.len() - 1) % items.len()));
            }
            KeyCode::Enter => return items[current].action,
            _ => {}
        }
        HomeAction::None
    }

    pub fn render(&mut self, frame: &mut Frame, user: Option<&User>) {
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
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Greeting
                Constraint::Min(4),    // Menu
            ])
            .split(inner);

        let greeting = match user {
            Some(user) => format!("Welcome back, {}", user.first_name),
            None => "Connecting NGOs, donors and volunteers".to_string(),
        };
        frame.render_widget(
            Paragraph::new(greeting).alignment(Alignment::Center),
            chunks[0],
        );

        let items: Vec<ListItem> = menu(user)
            .into_iter()
            .map(|item| ListItem::new(item.label))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.state);
    }
}

/// Centered one-line notice used for the restoring and not-found pages
pub fn render_notice(frame: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let notice = Paragraph::new(vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to go home",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(notice, area);
}
