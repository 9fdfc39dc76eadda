//! Keyboard shortcut registry.
//!
//! Single source for the help overlay and the footer hints of each screen.

use crossterm::event::KeyCode;

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    /// Alternative key (e.g., arrow key for a vim key)
    pub alt_key: Option<KeyCode>,
    pub description: &'static str,
    pub context: ShortcutContext,
}

/// Screens where a shortcut is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Every screen without a focused text field
    Global,
    Dashboard,
    Onboarding,
    /// Login and profile forms
    Form,
}

impl ShortcutContext {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Global => "Everywhere",
            ShortcutContext::Dashboard => "Dashboard",
            ShortcutContext::Onboarding => "Onboarding",
            ShortcutContext::Form => "Forms",
        }
    }

    pub fn all() -> &'static [ShortcutContext] {
        &[
            ShortcutContext::Global,
            ShortcutContext::Dashboard,
            ShortcutContext::Onboarding,
            ShortcutContext::Form,
        ]
    }
}

impl Shortcut {
    /// Key label for display (e.g., "q", "Tab", "j/↓")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Left-padded to line up in the help overlay
    pub fn key_display_padded(&self) -> String {
        format!("{:<11}", self.key_display())
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        other => format!("{other:?}"),
    }
}

pub static SHORTCUTS: &[Shortcut] = &[
    // Global
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        description: "Quit",
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        description: "Toggle help",
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Back / Close",
        context: ShortcutContext::Global,
    },
    // Dashboard
    Shortcut {
        key: KeyCode::Tab,
        alt_key: Some(KeyCode::BackTab),
        description: "Next / previous tab",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        description: "Move down",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        description: "Move up",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('n'),
        alt_key: Some(KeyCode::Char('p')),
        description: "Next / previous page",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('f'),
        alt_key: Some(KeyCode::Char('F')),
        description: "Cycle first / second filter",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('/'),
        alt_key: None,
        description: "Search",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('c'),
        alt_key: None,
        description: "Clear filters and search",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('o'),
        alt_key: None,
        description: "Start onboarding",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('e'),
        alt_key: None,
        description: "Edit profile",
        context: ShortcutContext::Dashboard,
    },
    Shortcut {
        key: KeyCode::Char('L'),
        alt_key: None,
        description: "Sign out",
        context: ShortcutContext::Dashboard,
    },
    // Onboarding
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        description: "Next choice",
        context: ShortcutContext::Onboarding,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        description: "Previous choice",
        context: ShortcutContext::Onboarding,
    },
    Shortcut {
        key: KeyCode::Char(' '),
        alt_key: None,
        description: "Select choice",
        context: ShortcutContext::Onboarding,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Next step",
        context: ShortcutContext::Onboarding,
    },
    Shortcut {
        key: KeyCode::Char('s'),
        alt_key: None,
        description: "Skip step",
        context: ShortcutContext::Onboarding,
    },
    Shortcut {
        key: KeyCode::Char('b'),
        alt_key: Some(KeyCode::Backspace),
        description: "Previous step",
        context: ShortcutContext::Onboarding,
    },
    // Forms
    Shortcut {
        key: KeyCode::Tab,
        alt_key: Some(KeyCode::BackTab),
        description: "Next / previous field",
        context: ShortcutContext::Form,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Submit / activate button",
        context: ShortcutContext::Form,
    },
];

pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// Look up a shortcut's description by key within a context
pub fn describe(context: ShortcutContext, key: KeyCode) -> Option<&'static str> {
    shortcuts_for_context(context)
        .find(|s| s.key == key || s.alt_key == Some(key))
        .map(|s| s.description)
}
