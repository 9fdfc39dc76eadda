use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::routes::{DashboardKind, Page, Resolution, Router, HOME_PATH, LOGIN_PATH, PROFILE_PATH};
use crate::session::SessionService;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::ui::home::render_notice;
use crate::ui::keybindings::ShortcutContext;
use crate::ui::terminal_guard::TerminalGuard;
use crate::ui::{
    ConfirmDialog, ConfirmOutcome, DashboardAction, DashboardScreen, HelpDialog, HomeAction,
    HomeScreen, LoginAction, LoginScreen, ProfileAction, ProfileScreen, WizardAction,
    WizardScreen,
};
use crate::wizard::{DraftStore, FileSubmissionSink, FlowKind, SubmissionSink, WizardNavigator};

/// Redirect hops followed before giving up on a route
const MAX_REDIRECTS: usize = 4;

enum Screen {
    Home(HomeScreen),
    Login(LoginScreen),
    Dashboard(Box<DashboardScreen>),
    Onboarding(WizardScreen),
    Profile(ProfileScreen),
    /// Guarded route waiting on session restore
    Restoring,
    NotFound(String),
}

impl Screen {
    fn shortcut_context(&self) -> ShortcutContext {
        match self {
            Screen::Dashboard(_) => ShortcutContext::Dashboard,
            Screen::Onboarding(_) => ShortcutContext::Onboarding,
            Screen::Login(_) | Screen::Profile(_) => ShortcutContext::Form,
            _ => ShortcutContext::Global,
        }
    }

    /// Whether printable keys belong to a text field
    fn captures_text(&self) -> bool {
        match self {
            Screen::Login(_) | Screen::Profile(_) => true,
            Screen::Dashboard(d) => d.is_editing(),
            _ => false,
        }
    }
}

/// Action waiting on the confirm dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingConfirm {
    SignOut,
    Submit(FlowKind),
}

pub struct App {
    config: Config,
    session: Arc<dyn SessionService>,
    router: Router,
    drafts: DraftStore,
    sink: Arc<dyn SubmissionSink>,
    route: String,
    screen: Screen,
    help: HelpDialog,
    confirm: ConfirmDialog,
    pending_confirm: Option<PendingConfirm>,
    /// Credentials submitted on the login screen, sent after the next draw
    pending_login: Option<(String, String)>,
    /// One-line message shown on the next screen
    flash: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        session: Arc<dyn SessionService>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        // Without persistence, answers still live for the length of the run
        let drafts = if config.wizard.persist_drafts {
            DraftStore::new(storage)
        } else {
            DraftStore::new(Arc::new(MemoryStore::new()))
        };
        let sink: Arc<dyn SubmissionSink> =
            Arc::new(FileSubmissionSink::new(config.submissions_path()));

        Self {
            config,
            session,
            router: Router::new(),
            drafts,
            sink,
            route: HOME_PATH.to_string(),
            screen: Screen::Home(HomeScreen::new()),
            help: HelpDialog::new(),
            confirm: ConfirmDialog::new("Confirm"),
            pending_confirm: None,
            pending_login: None,
            flash: None,
            should_quit: false,
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self, start_route: &str) -> Result<()> {
        self.session.initialize();
        self.navigate(start_route)?;

        let guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            // Draw "Signing in..." before awaiting the authenticator
            if let Some((email, password)) = self.pending_login.take() {
                self.complete_login(&email, &password).await?;
                continue;
            }

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code).await?;
                    }
                }
            }

            if matches!(self.screen, Screen::Restoring) && !self.session.is_loading() {
                let route = self.route.clone();
                self.navigate(&route)?;
            }
        }

        drop(guard);
        Ok(())
    }

    /// Resolve `path` against the guards and switch screens
    pub fn navigate(&mut self, path: &str) -> Result<()> {
        let mut target = path.to_string();
        for _ in 0..MAX_REDIRECTS {
            match self.router.resolve(&target, self.session.as_ref()) {
                Resolution::Redirect(to) => {
                    tracing::debug!(from = %target, to, "Redirecting");
                    target = to.to_string();
                }
                Resolution::Pending => {
                    self.screen = Screen::Restoring;
                    self.route = target;
                    return Ok(());
                }
                Resolution::Render(page) => {
                    self.show(page, &target)?;
                    tracing::debug!(route = %target, "Navigated");
                    self.route = target;
                    return Ok(());
                }
            }
        }
        anyhow::bail!("Too many redirects starting at {path}")
    }

    fn show(&mut self, page: Page, path: &str) -> Result<()> {
        let screen = match page {
            Page::Home => Screen::Home(HomeScreen::new()),
            Page::Login => Screen::Login(LoginScreen::new()),
            Page::Profile => match self.session.current_user() {
                Some(user) => Screen::Profile(ProfileScreen::new(&user)),
                None => Screen::Login(LoginScreen::new()),
            },
            Page::Dashboard(kind) => {
                if let Screen::Dashboard(current) = &self.screen {
                    if current.kind() == kind {
                        return Ok(());
                    }
                }
                let dashboard = DashboardScreen::new(kind, self.config.ui.page_size)
                    .context("Failed to load dashboard data")?;
                Screen::Dashboard(Box::new(dashboard))
            }
            Page::Onboarding { flow, step } => {
                if let Screen::Onboarding(wizard) = &mut self.screen {
                    if wizard.navigator().flow() == flow && wizard.sync_route(path) {
                        return Ok(());
                    }
                }
                let navigator = WizardNavigator::at(flow, step)
                    .with_context(|| format!("No step {step} in the {flow} flow"))?;
                Screen::Onboarding(WizardScreen::new(
                    navigator,
                    self.drafts.clone(),
                    self.config.wizard.persist_drafts,
                ))
            }
            Page::NotFound => Screen::NotFound(path.to_string()),
        };
        self.screen = screen;
        Ok(())
    }

    /// Where to go when leaving a screen: the user's dashboard, or home
    fn landing_route(&self) -> &'static str {
        match self.session.current_user() {
            Some(user) => DashboardKind::for_role(user.role).route(),
            None => HOME_PATH,
        }
    }

    async fn complete_login(&mut self, email: &str, password: &str) -> Result<()> {
        match self.session.login(email, password).await {
            Ok(user) => {
                self.flash = Some(format!("Signed in as {}", user.email));
                self.navigate(DashboardKind::for_role(user.role).route())
            }
            Err(e) => {
                tracing::info!(error = %e, "Sign-in rejected");
                if let Screen::Login(login) = &mut self.screen {
                    login.set_error(e.to_string());
                }
                Ok(())
            }
        }
    }

    async fn submit_onboarding(&mut self, flow: FlowKind) -> Result<()> {
        let email = self.session.current_user().map(|u| u.email);
        match self
            .drafts
            .submit(flow, email.as_deref(), self.sink.as_ref())
            .await
        {
            Ok(submission) => {
                self.flash = Some(format!(
                    "Thanks! Your {} answers were submitted ({})",
                    flow.label(),
                    submission.id
                ));
                let landing = self.landing_route();
                self.navigate(landing)
            }
            Err(e) => {
                tracing::error!(error = %e, flow = %flow, "Submission failed");
                if let Screen::Onboarding(wizard) = &mut self.screen {
                    wizard.set_status(format!("Could not submit: {e}"));
                }
                Ok(())
            }
        }
    }

    fn sign_out(&mut self) -> Result<()> {
        self.session.logout();
        self.flash = Some("You have been signed out".to_string());
        self.navigate(LOGIN_PATH)
    }

    async fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        if self.confirm.visible {
            match self.confirm.handle_key(key) {
                ConfirmOutcome::Pending => {}
                ConfirmOutcome::Cancelled => self.pending_confirm = None,
                ConfirmOutcome::Confirmed => match self.pending_confirm.take() {
                    Some(PendingConfirm::SignOut) => self.sign_out()?,
                    Some(PendingConfirm::Submit(flow)) => self.submit_onboarding(flow).await?,
                    None => {}
                },
            }
            return Ok(());
        }

        if self.help.visible {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc) {
                self.help.toggle();
            }
            return Ok(());
        }

        if !self.screen.captures_text() {
            match key {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('?') => {
                    self.help.toggle();
                    return Ok(());
                }
                _ => {}
            }
        }

        // Any key dismisses the flash message
        self.flash = None;

        match &mut self.screen {
            Screen::Home(home) => {
                let user = self.session.current_user();
                match home.handle_key(key, user.as_ref()) {
                    HomeAction::None => {}
                    HomeAction::Navigate(path) => self.navigate(path)?,
                    HomeAction::SignOut => self.ask(PendingConfirm::SignOut),
                    HomeAction::Quit => self.should_quit = true,
                }
            }
            Screen::Login(login) => match login.handle_key(key) {
                LoginAction::None => {}
                LoginAction::Submit { email, password } => {
                    login.set_submitting(true);
                    self.pending_login = Some((email, password));
                }
                LoginAction::Cancel => self.navigate(HOME_PATH)?,
            },
            Screen::Dashboard(dashboard) => {
                let editing = dashboard.is_editing();
                match dashboard.handle_key(key) {
                    DashboardAction::None if key == KeyCode::Esc && !editing => {
                        self.navigate(HOME_PATH)?;
                    }
                    DashboardAction::None => {}
                    DashboardAction::EditProfile => self.navigate(PROFILE_PATH)?,
                    DashboardAction::StartOnboarding(flow) => self.navigate(flow.entry_route())?,
                    DashboardAction::SignOut => self.ask(PendingConfirm::SignOut),
                }
            }
            Screen::Onboarding(wizard) => match wizard.handle_key(key) {
                WizardAction::None => {}
                WizardAction::Navigate(route) => self.navigate(route)?,
                WizardAction::Finished(flow) => self.ask(PendingConfirm::Submit(flow)),
                WizardAction::Exit => {
                    let landing = self.landing_route();
                    self.navigate(landing)?;
                }
            },
            Screen::Profile(profile) => match profile.handle_key(key) {
                ProfileAction::None => {}
                ProfileAction::Save(patch) => {
                    self.session.update_user(patch);
                    profile.mark_saved();
                }
                ProfileAction::Cancel => {
                    let landing = self.landing_route();
                    self.navigate(landing)?;
                }
            },
            Screen::Restoring => {}
            Screen::NotFound(_) => {
                if key == KeyCode::Enter {
                    self.navigate(HOME_PATH)?;
                }
            }
        }
        Ok(())
    }

    fn ask(&mut self, action: PendingConfirm) {
        let message = match action {
            PendingConfirm::SignOut => "Sign out of Civic?".to_string(),
            PendingConfirm::Submit(flow) => format!("Submit your {} answers?", flow.label()),
        };
        self.pending_confirm = Some(action);
        self.confirm.show(&message);
    }

    fn render(&mut self, frame: &mut Frame) {
        let user = self.session.current_user();
        match &mut self.screen {
            Screen::Home(home) => home.render(frame, user.as_ref()),
            Screen::Login(login) => login.render(frame),
            Screen::Dashboard(dashboard) => dashboard.render(frame, user.as_ref()),
            Screen::Onboarding(wizard) => wizard.render(frame),
            Screen::Profile(profile) => profile.render(frame),
            Screen::Restoring => render_notice(frame, "Loading", "Restoring your session..."),
            Screen::NotFound(path) => {
                render_notice(frame, "Not found", &format!("Nothing lives at {path}"));
            }
        }

        if let Some(flash) = &self.flash {
            let area = frame.area();
            let line = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
            frame.render_widget(
                Paragraph::new(flash.as_str()).style(Style::default().fg(Color::Green)),
                line,
            );
        }

        self.help.render(frame, self.screen.shortcut_context());
        self.confirm.render(frame);
    }
}
