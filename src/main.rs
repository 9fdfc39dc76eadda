use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use civic_dpi::app::App;
use civic_dpi::catalog::{dashboard_tabs, ListDetailView};
use civic_dpi::config::Config;
use civic_dpi::env_vars::env_vars_by_category;
use civic_dpi::logging;
use civic_dpi::routes::{DashboardKind, Router, HOME_PATH};
use civic_dpi::session::{AuthError, SessionService, SessionStore, User};
use civic_dpi::storage::{FileStore, KeyValueStore};
use civic_dpi::ui::terminal_guard::install_panic_hook;
use civic_dpi::wizard::{DraftStore, FlowKind, SelectionMode, StepGate, WizardNavigator};

#[derive(Parser)]
#[command(name = "civic")]
#[command(about = "Dashboards and onboarding for NGOs, donors and volunteers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Route to open when starting the TUI
    #[arg(long, default_value = HOME_PATH)]
    route: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session marker
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out and remove the session marker
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show an onboarding step with its progress
    Onboard {
        /// Flow (ngo, donor, talent)
        flow: FlowKind,

        /// 1-based step index
        #[arg(short, long, default_value_t = 1)]
        step: usize,
    },

    /// List saved onboarding drafts
    Drafts {
        /// Delete the draft of this flow
        #[arg(long)]
        discard: Option<FlowKind>,
    },

    /// Print a dashboard tab as a table
    List {
        /// Dashboard (ngo, donor, talent)
        dashboard: DashboardKind,

        /// 1-based tab index
        #[arg(short, long, default_value_t = 1)]
        tab: usize,

        /// Case-insensitive search over the table columns
        #[arg(short, long)]
        search: Option<String>,

        /// Exact-match filter as key=value (repeatable)
        #[arg(short, long)]
        filter: Vec<String>,
    },

    /// Print the route table with guards
    Routes,

    /// Print the supported environment variables
    Env,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Login { email, password }) => cmd_login(&config, &email, &password).await?,
        Some(Commands::Logout) => cmd_logout(&config),
        Some(Commands::Whoami) => cmd_whoami(&config),
        Some(Commands::Onboard { flow, step }) => cmd_onboard(&config, flow, step)?,
        Some(Commands::Drafts { discard }) => cmd_drafts(&config, discard)?,
        Some(Commands::List {
            dashboard,
            tab,
            search,
            filter,
        }) => cmd_list(dashboard, tab, search.as_deref(), &filter)?,
        Some(Commands::Routes) => cmd_routes(),
        Some(Commands::Env) => cmd_env(),
        None => run_tui(config, &cli.route, logging_handle.log_file_path).await?,
    }

    Ok(())
}

fn storage(config: &Config) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(config.storage_file()))
}

/// Session restored from the persisted marker, for one-shot commands
fn restored_session(config: &Config) -> SessionStore {
    let session = SessionStore::from_config(config);
    session.initialize();
    session
}

async fn run_tui(config: Config, route: &str, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    // Drafts share the session's store, so both land in one storage file
    let session = SessionStore::from_config(&config);
    let storage = session.storage();
    let session: Arc<dyn SessionService> = Arc::new(session);
    let mut app = App::new(config, session, storage);
    let result = app.run(route).await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

async fn cmd_login(config: &Config, email: &str, password: &str) -> Result<()> {
    let session = restored_session(config);
    match session.login(email, password).await {
        Ok(user) => {
            let dashboard = DashboardKind::for_role(user.role);
            println!("Signed in as {} ({})", user.display_name, user.email);
            println!("Dashboard: {}", dashboard.route());
            Ok(())
        }
        Err(e @ AuthError::Storage(_)) => Err(e).context("Sign-in failed"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_logout(config: &Config) {
    let session = restored_session(config);
    let was_signed_in = session.is_authenticated();
    session.logout();
    if was_signed_in {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
}

fn cmd_whoami(config: &Config) {
    let session = restored_session(config);
    match session.current_user() {
        Some(user) => print!("{}", format_user(&user)),
        None => println!("Not signed in"),
    }
}

fn format_user(user: &User) -> String {
    let mut out = String::new();
    let badge = if user.verified { " ✓ verified" } else { "" };
    out.push_str(&format!("{}{badge}\n", user.display_name));
    out.push_str(&format!("  Email:     {}\n", user.email));
    out.push_str(&format!("  Role:      {}\n", user.role.label()));
    if let Some(org) = &user.organization {
        out.push_str(&format!("  Org:       {} ({})\n", org.name, org.role_title));
    }
    for (label, value) in [
        ("Location", &user.location),
        ("Pronouns", &user.pronouns),
        ("Phone", &user.phone),
        ("Website", &user.website),
    ] {
        if let Some(value) = value {
            out.push_str(&format!("  {:<10} {value}\n", format!("{label}:")));
        }
    }
    if !user.skills.is_empty() {
        out.push_str(&format!("  Skills:    {}\n", user.skills.join(", ")));
    }
    out.push_str(&format!(
        "  Dashboard: {}\n",
        DashboardKind::for_role(user.role).route()
    ));
    out
}

fn cmd_onboard(config: &Config, flow: FlowKind, step: usize) -> Result<()> {
    let navigator = WizardNavigator::at(flow, step).with_context(|| {
        format!(
            "The {flow} flow has {} steps; pick one from 1 to {}",
            flow.steps().len(),
            flow.steps().len()
        )
    })?;
    let drafts = DraftStore::new(storage(config));
    let saved = drafts
        .load(flow)?
        .map(|d| d.answers_for(navigator.current().key).to_vec())
        .unwrap_or_default();

    print!("{}", format_step(&navigator, &saved));
    if config.wizard.persist_drafts {
        println!("Your progress is saved automatically");
    }
    Ok(())
}

fn format_step(navigator: &WizardNavigator, saved: &[String]) -> String {
    let progress = navigator.progress();
    let mut out = format!(
        "{}  {}  [{}%]\n\n",
        navigator.flow().label(),
        progress.label(),
        progress.percent()
    );

    for view in navigator.steps() {
        let marker = if view.completed {
            "✓"
        } else if view.active {
            "▸"
        } else {
            " "
        };
        out.push_str(&format!("  {marker} {}. {}\n", view.index, view.label));
    }

    let step = navigator.current();
    out.push_str(&format!("\n{}\n", step.prompt));
    for choice in step.choices {
        let checked = saved.iter().any(|s| s == choice);
        let marker = match (step.selection, checked) {
            (SelectionMode::Single, true) => "(•)",
            (SelectionMode::Single, false) => "( )",
            (_, true) => "[x]",
            (_, false) => "[ ]",
        };
        out.push_str(&format!("  {marker} {choice}\n"));
    }

    out.push('\n');
    if let Some(back) = navigator.back_target() {
        out.push_str(&format!("Back: {}\n", back.route));
    }
    match navigator.next_target() {
        Some(next) => out.push_str(&format!("Next: {}", next.route)),
        None => out.push_str("Next: finish"),
    }
    if step.gate == StepGate::RequiresSelection {
        out.push_str(" (requires a selection)");
    }
    out.push('\n');
    if navigator.can_skip() {
        out.push_str("This step can be skipped\n");
    }
    out
}

fn cmd_drafts(config: &Config, discard: Option<FlowKind>) -> Result<()> {
    let drafts = DraftStore::new(storage(config));

    if let Some(flow) = discard {
        drafts.discard(flow)?;
        println!("Discarded the {flow} draft");
        return Ok(());
    }

    let saved = drafts.list()?;
    if saved.is_empty() {
        println!("No saved drafts");
        return Ok(());
    }

    for draft in saved {
        println!(
            "{} ({} of {} steps answered, updated {})",
            draft.flow.label(),
            draft.answered_steps(),
            draft.flow.steps().len(),
            draft.updated_at.format("%Y-%m-%d %H:%M UTC")
        );
        for (step, answers) in &draft.answers {
            let shown = if answers.is_empty() {
                "-".to_string()
            } else {
                answers.join(", ")
            };
            println!("  {step}: {shown}");
        }
    }
    Ok(())
}

fn cmd_list(
    dashboard: DashboardKind,
    tab: usize,
    search: Option<&str>,
    filters: &[String],
) -> Result<()> {
    let tabs = dashboard_tabs(dashboard)?;
    let count = tabs.len();
    let catalog = tabs
        .into_iter()
        .nth(tab.wrapping_sub(1))
        .with_context(|| format!("{} has {count} tabs", dashboard.title()))?;

    // One page holding every row
    let rows = catalog.entries.len();
    let mut view = ListDetailView::new(catalog, rows);
    for filter in filters {
        let (key, value) = filter
            .split_once('=')
            .with_context(|| format!("Filter '{filter}' is not key=value"))?;
        view.set_filter(key, Some(value.to_string()));
    }
    if let Some(query) = search {
        view.set_search(query);
    }

    print!("{}", format_table(&view));
    Ok(())
}

/// Plain-text table of the visible rows, widths fitted to content
fn format_table(view: &ListDetailView) -> String {
    let columns = &view.config().columns;
    let rows: Vec<Vec<&str>> = view
        .list()
        .items()
        .iter()
        .map(|entry| columns.iter().map(|c| entry.field(&c.key)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = format!("{} ({} entries)\n", view.title(), rows.len());
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c.label))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    out.push_str(&"─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn cmd_routes() {
    let router = Router::new();
    let width = router.routes().iter().map(|r| r.path.len()).max().unwrap_or(0);
    for route in router.routes() {
        println!(
            "{:<width$}  {:<10}  {}",
            route.path,
            route.guard.label(),
            route.page.describe()
        );
    }
}

fn cmd_env() {
    for (category, vars) in env_vars_by_category() {
        println!("{}", category.display_name());
        for var in vars {
            let default = var
                .default
                .map(|d| format!(" (default: {d})"))
                .unwrap_or_default();
            println!("  {}{default}", var.name);
            println!("      {}", var.description);
            if let Some(example) = var.example {
                println!("      e.g. {}={example}", var.name);
            }
        }
        println!();
    }
}
