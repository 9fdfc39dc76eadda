//! Role dashboard: tabbed catalog tables with a detail panel

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::catalog::{dashboard_tabs, CatalogError, ListDetailView};
use crate::routes::DashboardKind;
use crate::session::User;
use crate::ui::form_field::FormField;
use crate::wizard::FlowKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    EditProfile,
    StartOnboarding(FlowKind),
    SignOut,
}

pub struct DashboardScreen {
    kind: DashboardKind,
    tabs: Vec<ListDetailView>,
    active_tab: usize,
    /// Present while the search box has focus
    search: Option<FormField>,
}

impl DashboardScreen {
    pub fn new(kind: DashboardKind, page_size: usize) -> Result<Self, CatalogError> {
        let tabs = dashboard_tabs(kind)?
            .into_iter()
            .map(|catalog| ListDetailView::new(catalog, page_size))
            .collect();
        Ok(Self {
            kind,
            tabs,
            active_tab: 0,
            search: None,
        })
    }

    pub fn kind(&self) -> DashboardKind {
        self.kind
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn view(&self) -> &ListDetailView {
        &self.tabs[self.active_tab]
    }

    fn view_mut(&mut self) -> &mut ListDetailView {
        &mut self.tabs[self.active_tab]
    }

    /// True while keys go to the search box instead of shortcuts
    pub fn is_editing(&self) -> bool {
        self.search.is_some()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> DashboardAction {
        if let Some(search) = self.search.as_mut() {
            match key {
                KeyCode::Enter => self.search = None,
                KeyCode::Esc => {
                    self.search = None;
                    self.view_mut().set_search("");
                }
                other => {
                    search.handle_key(other);
                    let query = search.value();
                    self.view_mut().set_search(&query);
                }
            }
            return DashboardAction::None;
        }

        match key {
            KeyCode::Tab | KeyCode::Right => {
                self.active_tab = (self.active_tab + 1) % self.tabs.len();
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
            }
            KeyCode::Down | KeyCode::Char('j') => self.view_mut().select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.view_mut().select_prev(),
            KeyCode::Char('n') => self.view_mut().next_page(),
            KeyCode::Char('p') => self.view_mut().prev_page(),
            KeyCode::Char('f') => self.cycle_filter(0),
            KeyCode::Char('F') => self.cycle_filter(1),
            KeyCode::Char('c') => self.view_mut().clear_filters(),
            KeyCode::Char('/') => {
                let current = self.view().search().to_string();
                self.search = Some(FormField::text("Search").with_value(&current));
            }
            KeyCode::Char('o') => {
                return DashboardAction::StartOnboarding(self.kind.onboarding_flow())
            }
            KeyCode::Char('e') => return DashboardAction::EditProfile,
            KeyCode::Char('L') => return DashboardAction::SignOut,
            _ => {}
        }
        DashboardAction::None
    }

    fn cycle_filter(&mut self, index: usize) {
        let key = self.view().config().filters.get(index).map(|f| f.key.clone());
        if let Some(key) = key {
            self.view_mut().cycle_filter(&key);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, user: Option<&User>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Filters / search
                Constraint::Min(8),    // Table + detail
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], user);

        let titles: Vec<Line> = self
            .tabs
            .iter()
            .map(|t| Line::from(t.title().to_string()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active_tab)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[1]);

        self.render_filter_bar(frame, chunks[2]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Table
                Constraint::Percentage(35), // Detail
            ])
            .split(chunks[3]);
        self.render_table(frame, body[0]);
        self.render_detail(frame, body[1]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("[/]", Style::default().fg(Color::Yellow)),
            Span::raw(" search  "),
            Span::styled("[f/F]", Style::default().fg(Color::Yellow)),
            Span::raw(" filter  "),
            Span::styled("[o]", Style::default().fg(Color::Yellow)),
            Span::raw(" onboarding  "),
            Span::styled("[e]", Style::default().fg(Color::Yellow)),
            Span::raw(" profile  "),
            Span::styled("[?]", Style::default().fg(Color::Yellow)),
            Span::raw(" help"),
        ]));
        frame.render_widget(footer, chunks[4]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, user: Option<&User>) {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.kind.title()),
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(user) = user {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("({}) {}", user.initials(), user.display_name),
                Style::default().fg(Color::White),
            ));
            if user.verified {
                spans.push(Span::styled(" ✓ Verified", Style::default().fg(Color::Green)));
            }
            if let Some(org) = &user.organization {
                spans.push(Span::styled(
                    format!("  {} · {}", org.role_title, org.name),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let view = self.view();
        let mut spans = Vec::new();
        for filter in &view.config().filters {
            let value = view.active_filter(&filter.key).unwrap_or("Any");
            spans.push(Span::styled(
                format!(" {}: ", filter.label),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::styled(value.to_string(), Style::default().fg(Color::Cyan)));
        }

        spans.push(Span::styled("  Search: ", Style::default().fg(Color::DarkGray)));
        match &self.search {
            Some(field) => spans.push(Span::styled(
                field.display_text(true),
                Style::default().fg(Color::Yellow),
            )),
            None if view.search().is_empty() => {
                spans.push(Span::styled("-", Style::default().fg(Color::DarkGray)));
            }
            None => spans.push(Span::raw(view.search().to_string())),
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let view = &mut self.tabs[self.active_tab];
        let columns = view.config().columns.clone();

        let header = Row::new(columns.iter().map(|c| {
            Cell::from(c.label.clone()).style(Style::default().add_modifier(Modifier::BOLD))
        }));
        let rows: Vec<Row> = view
            .list()
            .current_page_items()
            .iter()
            .map(|entry| {
                Row::new(
                    columns
                        .iter()
                        .map(|c| Cell::from(entry.field(&c.key).to_string())),
                )
            })
            .collect();
        let widths: Vec<Constraint> = columns
            .iter()
            .map(|c| Constraint::Percentage(c.width))
            .collect();

        let title = Span::styled(
            format!(" {} ", view.title()),
            Style::default().fg(Color::Cyan),
        );
        let footer = view.list().footer_line();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .title(title)
                    .title_bottom(footer)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );

        frame.render_stateful_widget(table, area, view.list_mut().table_state_mut());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let view = self.view();
        let lines: Vec<Line> = if view.list().is_empty() {
            vec![Line::from(Span::styled(
                "No entries match the current filters",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            view.detail()
                .into_iter()
                .flat_map(|(label, value)| {
                    [
                        Line::from(Span::styled(
                            label,
                            Style::default().fg(Color::Yellow),
                        )),
                        Line::from(format!("  {value}")),
                    ]
                })
                .collect()
        };

        let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
        frame.render_widget(detail, area);
    }
}
