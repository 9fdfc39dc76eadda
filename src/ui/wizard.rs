//! Onboarding wizard screen

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::wizard::{
    DraftError, DraftStore, FlowKind, SelectionMode, Transition, WizardNavigator,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    None,
    /// The navigator moved; the app should follow this route
    Navigate(&'static str),
    /// Next was pressed on the last step
    Finished(FlowKind),
    /// Leave the wizard without finishing
    Exit,
}

pub struct WizardScreen {
    navigator: WizardNavigator,
    drafts: DraftStore,
    /// Whether drafts outlive the process; drives the "progress saved" note
    persisted: bool,
    /// Indices into the current step's choices
    selected: Vec<usize>,
    list_state: ListState,
    status: Option<String>,
}

impl WizardScreen {
    pub fn new(navigator: WizardNavigator, drafts: DraftStore, persisted: bool) -> Self {
        let mut screen = Self {
            navigator,
            drafts,
            persisted,
            selected: Vec::new(),
            list_state: ListState::default(),
            status: None,
        };
        screen.load_step();
        screen
    }

    pub fn navigator(&self) -> &WizardNavigator {
        &self.navigator
    }

    pub fn selected_choices(&self) -> Vec<String> {
        let choices = self.navigator.current().choices;
        self.selected
            .iter()
            .filter_map(|i| choices.get(*i))
            .map(|c| (*c).to_string())
            .collect()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Reposition on `route` when the app navigates within this flow
    pub fn sync_route(&mut self, route: &str) -> bool {
        if self.navigator.current().route == route {
            return true;
        }
        if self.navigator.jump_to_route(route) {
            self.load_step();
            true
        } else {
            false
        }
    }

    /// Restore the saved answers of the current step, if any
    fn load_step(&mut self) {
        let step = self.navigator.current();
        let saved = match self.drafts.load(self.navigator.flow()) {
            Ok(draft) => draft.map(|d| d.answers_for(step.key).to_vec()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read onboarding draft");
                None
            }
        };

        self.selected = saved
            .unwrap_or_default()
            .iter()
            .filter_map(|answer| step.choices.iter().position(|c| c == answer))
            .collect();
        self.list_state
            .select(if step.choices.is_empty() { None } else { Some(0) });
    }

    fn save_step(&self) -> Result<(), DraftError> {
        let step = self.navigator.current();
        if step.selection == SelectionMode::None {
            return Ok(());
        }
        self.drafts
            .save_step(self.navigator.flow(), step.key, self.selected_choices())?;
        Ok(())
    }

    fn toggle_current(&mut self) {
        let Some(index) = self.list_state.selected() else {
            return;
        };
        match self.navigator.current().selection {
            SelectionMode::None => {}
            SelectionMode::Single => self.selected = vec![index],
            SelectionMode::Multiple => {
                if let Some(pos) = self.selected.iter().position(|i| *i == index) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(index);
                    self.selected.sort_unstable();
                }
            }
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.navigator.current().choices.len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.list_state.select(Some(next));
    }

    fn follow(&mut self, transition: Transition) -> WizardAction {
        match transition {
            Transition::Moved(step) => {
                self.load_step();
                WizardAction::Navigate(step.route)
            }
            Transition::Finished => WizardAction::Finished(self.navigator.flow()),
            Transition::Stay => WizardAction::None,
            Transition::Blocked => {
                self.status = Some("Choose an option to continue".to_string());
                WizardAction::None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> WizardAction {
        self.status = None;
        match key {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(false),
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Enter => {
                let has_selection = !self.selected.is_empty();
                if self.navigator.can_advance(has_selection) {
                    if let Err(e) = self.save_step() {
                        self.status = Some(format!("Could not save your answers: {e}"));
                        return WizardAction::None;
                    }
                }
                let transition = self.navigator.next(has_selection);
                return self.follow(transition);
            }
            KeyCode::Char('s') => {
                if self.navigator.can_skip() {
                    if let Err(e) = self.save_step() {
                        self.status = Some(format!("Could not save your answers: {e}"));
                        return WizardAction::None;
                    }
                }
                let transition = self.navigator.skip();
                return self.follow(transition);
            }
            KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Left => {
                let transition = self.navigator.back();
                return self.follow(transition);
            }
            KeyCode::Esc => return WizardAction::Exit,
            _ => {}
        }
        WizardAction::None
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let outer = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    self.navigator.flow().label(),
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = outer.inner(frame.area());
        frame.render_widget(outer, frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([
                Constraint::Length(24), // Step list
                Constraint::Min(30),    // Current step
            ])
            .split(inner);

        self.render_steps(frame, columns[0]);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Progress gauge
                Constraint::Length(2), // Prompt
                Constraint::Min(4),    // Choices
                Constraint::Length(1), // Status
                Constraint::Length(1), // Saved note
                Constraint::Length(1), // Footer
            ])
            .split(columns[1]);

        let progress = self.navigator.progress();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(progress.fraction())
            .label(progress.label());
        frame.render_widget(gauge, chunks[0]);

        let step = self.navigator.current();
        let prompt = Paragraph::new(Line::from(Span::styled(
            step.prompt,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true });
        frame.render_widget(prompt, chunks[1]);

        self.render_choices(frame, chunks[2]);

        if let Some(status) = &self.status {
            frame.render_widget(
                Paragraph::new(Span::styled(status.as_str(), Style::default().fg(Color::Red))),
                chunks[3],
            );
        }

        if self.persisted {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Your progress is saved automatically",
                    Style::default().fg(Color::DarkGray),
                )),
                chunks[4],
            );
        }

        frame.render_widget(Paragraph::new(self.footer_line()), chunks[5]);
    }

    fn render_steps(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .navigator
            .steps()
            .into_iter()
            .map(|view| {
                let (marker, style) = if view.completed {
                    ("✓", Style::default().fg(Color::Green))
                } else if view.active {
                    (
                        "▸",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    (" ", Style::default().fg(Color::DarkGray))
                };
                ListItem::new(Line::from(Span::styled(
                    format!("{marker} {}. {}", view.index, view.label),
                    style,
                )))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" Steps ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
        frame.render_widget(list, area);
    }

    fn render_choices(&mut self, frame: &mut Frame, area: Rect) {
        let step = self.navigator.current();
        if step.choices.is_empty() {
            let summary = self.answers_summary();
            frame.render_widget(
                Paragraph::new(summary).wrap(Wrap { trim: false }).block(
                    Block::default()
                        .title(" Your answers ")
                        .borders(Borders::ALL),
                ),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = step
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let checked = self.selected.contains(&i);
                let marker = match (step.selection, checked) {
                    (SelectionMode::Single, true) => "(•)",
                    (SelectionMode::Single, false) => "( )",
                    (_, true) => "[x]",
                    (_, false) => "[ ]",
                };
                ListItem::new(format!("{marker} {choice}"))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    /// Saved answers of the whole flow, for the review step
    fn answers_summary(&self) -> Vec<Line<'static>> {
        let draft = self.drafts.load(self.navigator.flow()).ok().flatten();
        let mut lines = Vec::new();
        for step in self.navigator.flow().steps() {
            if step.selection == SelectionMode::None {
                continue;
            }
            let answers = draft
                .as_ref()
                .map(|d| d.answers_for(step.key).join(", "))
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", step.label), Style::default().fg(Color::Yellow)),
                Span::raw(answers),
            ]));
        }
        lines
    }

    fn footer_line(&self) -> Line<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
        let disabled = Style::default().fg(Color::DarkGray);

        let mut spans = Vec::new();
        if self.navigator.back_target().is_some() {
            spans.push(key("[b]"));
            spans.push(Span::raw(" Back  "));
        }

        let next_label = if self.navigator.is_terminal() {
            " Finish  "
        } else {
            " Next  "
        };
        if self.navigator.can_advance(!self.selected.is_empty()) {
            spans.push(key("[Enter]"));
            spans.push(Span::raw(next_label));
        } else {
            spans.push(Span::styled("[Enter]", disabled));
            spans.push(Span::styled(next_label, disabled));
        }

        if self.navigator.can_skip() {
            spans.push(key("[s]"));
            spans.push(Span::raw(" Skip  "));
        }
        spans.push(key("[Esc]"));
        spans.push(Span::raw(" Leave"));
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn new_screen(flow: FlowKind, storage: &MemoryStore) -> WizardScreen {
        WizardScreen::new(
            WizardNavigator::new(flow),
            DraftStore::new(Arc::new(storage.clone())),
            true,
        )
    }

    #[test]
    fn test_next_blocked_until_selection() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Ngo, &storage);
        assert_eq!(screen.handle_key(KeyCode::Enter), WizardAction::None);
        assert!(screen.status().is_some());
        assert_eq!(screen.navigator().index(), 1);

        screen.handle_key(KeyCode::Char(' '));
        assert_eq!(
            screen.handle_key(KeyCode::Enter),
            WizardAction::Navigate("/onboarding/ngo/legal")
        );
    }

    #[test]
    fn test_skip_keeps_answers_of_skipped_step() {
        let storage = MemoryStore::new();
        let mut screen = WizardScreen::new(
            WizardNavigator::at(FlowKind::Donor, 2).unwrap(),
            DraftStore::new(Arc::new(storage.clone())),
            true,
        );
        screen.handle_key(KeyCode::Char(' '));
        assert_eq!(
            screen.handle_key(KeyCode::Char('s')),
            WizardAction::Navigate("/onboarding/donor/geography")
        );

        let draft = DraftStore::new(Arc::new(storage))
            .load(FlowKind::Donor)
            .unwrap()
            .unwrap();
        assert_eq!(draft.answers_for("interests"), ["Education".to_string()]);
    }

    #[test]
    fn test_skip_refused_on_identity_step_saves_nothing() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Donor, &storage);
        screen.handle_key(KeyCode::Char(' '));
        assert_eq!(screen.handle_key(KeyCode::Char('s')), WizardAction::None);
        assert_eq!(screen.navigator().index(), 1);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_single_selection_replaces() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Donor, &storage);
        screen.handle_key(KeyCode::Char(' '));
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Char(' '));
        assert_eq!(screen.selected_choices(), vec!["Family foundation"]);
    }

    #[test]
    fn test_multiple_selection_toggles() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Talent, &storage);
        screen.handle_key(KeyCode::Char(' '));
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Char(' '));
        assert_eq!(screen.selected_choices().len(), 2);
        screen.handle_key(KeyCode::Char(' '));
        assert_eq!(screen.selected_choices().len(), 1);
    }

    #[test]
    fn test_answers_restored_when_returning() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Donor, &storage);
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Char(' '));
        screen.handle_key(KeyCode::Enter);
        assert_eq!(screen.navigator().index(), 2);

        assert_eq!(
            screen.handle_key(KeyCode::Char('b')),
            WizardAction::Navigate("/onboarding/donor/identity")
        );
        assert_eq!(screen.selected_choices(), vec!["Family foundation"]);

        // A fresh screen over the same storage sees the draft too
        let again = new_screen(FlowKind::Donor, &storage);
        assert_eq!(again.selected_choices(), vec!["Family foundation"]);
    }

    #[test]
    fn test_skip_and_finish() {
        let storage = MemoryStore::new();
        let mut screen = WizardScreen::new(
            WizardNavigator::at(FlowKind::Donor, 3).unwrap(),
            DraftStore::new(Arc::new(storage.clone())),
            false,
        );
        assert_eq!(
            screen.handle_key(KeyCode::Char('s')),
            WizardAction::Navigate("/onboarding/donor/notifications")
        );
        assert_eq!(
            screen.handle_key(KeyCode::Enter),
            WizardAction::Finished(FlowKind::Donor)
        );
    }

    #[test]
    fn test_skip_blocked_on_required_step() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Ngo, &storage);
        assert_eq!(screen.handle_key(KeyCode::Char('s')), WizardAction::None);
        assert_eq!(screen.handle_key(KeyCode::Esc), WizardAction::Exit);
    }

    #[test]
    fn test_sync_route_within_flow() {
        let storage = MemoryStore::new();
        let mut screen = new_screen(FlowKind::Ngo, &storage);
        assert!(screen.sync_route("/onboarding/ngo/verify"));
        assert_eq!(screen.navigator().index(), 4);
        assert!(!screen.sync_route("/onboarding/donor/identity"));
    }
}
