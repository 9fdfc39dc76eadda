//! Centralized environment variable registry.
//!
//! All environment variables use the `CIVIC_` prefix with `__` separator
//! for nested config paths (e.g., `CIVIC_AUTH__LOGIN_LATENCY_MS`).
//! Printed by `civic env`.

/// An environment variable definition
#[derive(Debug, Clone)]
pub struct EnvVar {
    /// Environment variable name (e.g., "`CIVIC_PATHS__STATE`")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Category for grouping in documentation
    pub category: EnvVarCategory,
    /// Default value if not set
    pub default: Option<&'static str>,
    /// Example value for documentation
    pub example: Option<&'static str>,
}

/// Categories for organizing environment variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvVarCategory {
    /// Mock sign-in behavior
    Authentication,
    /// Onboarding wizard behavior
    Onboarding,
    /// File path configuration
    Paths,
    /// Terminal UI settings
    Ui,
    /// Logging configuration
    Logging,
}

impl EnvVarCategory {
    /// Display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            EnvVarCategory::Authentication => "Authentication",
            EnvVarCategory::Onboarding => "Onboarding",
            EnvVarCategory::Paths => "Paths",
            EnvVarCategory::Ui => "UI",
            EnvVarCategory::Logging => "Logging",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [EnvVarCategory] {
        &[
            EnvVarCategory::Authentication,
            EnvVarCategory::Onboarding,
            EnvVarCategory::Paths,
            EnvVarCategory::Ui,
            EnvVarCategory::Logging,
        ]
    }
}

/// Static registry of all documented environment variables
pub static ENV_VARS: &[EnvVar] = &[
    // === Authentication ===
    EnvVar {
        name: "CIVIC_AUTH__STORAGE_KEY",
        description: "Storage key holding the authentication marker",
        category: EnvVarCategory::Authentication,
        default: Some("civic.auth"),
        example: Some("dpi.session"),
    },
    EnvVar {
        name: "CIVIC_AUTH__MIN_PASSWORD_LENGTH",
        description: "Minimum password length accepted at sign-in",
        category: EnvVarCategory::Authentication,
        default: Some("8"),
        example: Some("12"),
    },
    EnvVar {
        name: "CIVIC_AUTH__LOGIN_LATENCY_MS",
        description: "Simulated sign-in latency in milliseconds",
        category: EnvVarCategory::Authentication,
        default: Some("800"),
        example: Some("0"),
    },
    // === Onboarding ===
    EnvVar {
        name: "CIVIC_WIZARD__PERSIST_DRAFTS",
        description: "Save onboarding answers as drafts between steps",
        category: EnvVarCategory::Onboarding,
        default: Some("true"),
        example: Some("false"),
    },
    // === Paths ===
    EnvVar {
        name: "CIVIC_PATHS__STATE",
        description: "Directory for storage, drafts, submissions and logs",
        category: EnvVarCategory::Paths,
        default: Some(".civic"),
        example: Some("/var/lib/civic"),
    },
    // === UI ===
    EnvVar {
        name: "CIVIC_UI__REFRESH_RATE_MS",
        description: "Terminal UI event poll interval in milliseconds",
        category: EnvVarCategory::Ui,
        default: Some("250"),
        example: Some("100"),
    },
    EnvVar {
        name: "CIVIC_UI__PAGE_SIZE",
        description: "Rows per page in dashboard lists",
        category: EnvVarCategory::Ui,
        default: Some("10"),
        example: Some("20"),
    },
    // === Logging ===
    EnvVar {
        name: "CIVIC_LOGGING__LEVEL",
        description: "Log level filter (trace, debug, info, warn, error)",
        category: EnvVarCategory::Logging,
        default: Some("info"),
        example: Some("debug"),
    },
    EnvVar {
        name: "CIVIC_LOGGING__TO_FILE",
        description: "Write logs to a file while the terminal UI is running",
        category: EnvVarCategory::Logging,
        default: Some("true"),
        example: Some("false"),
    },
];

/// Get all environment variables for a given category
pub fn env_vars_for_category(category: EnvVarCategory) -> impl Iterator<Item = &'static EnvVar> {
    ENV_VARS.iter().filter(move |v| v.category == category)
}

/// Get environment variables grouped by category
pub fn env_vars_by_category() -> Vec<(EnvVarCategory, Vec<&'static EnvVar>)> {
    EnvVarCategory::all()
        .iter()
        .map(|cat| {
            let vars: Vec<&EnvVar> = env_vars_for_category(*cat).collect();
            (*cat, vars)
        })
        .filter(|(_, vars)| !vars.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_env_vars_have_descriptions() {
        for var in ENV_VARS {
            assert!(
                !var.description.is_empty(),
                "EnvVar {} has empty description",
                var.name
            );
        }
    }

    #[test]
    fn test_all_env_vars_have_civic_prefix() {
        for var in ENV_VARS {
            assert!(
                var.name.starts_with("CIVIC_"),
                "EnvVar {} does not have CIVIC_ prefix",
                var.name
            );
        }
    }

    #[test]
    fn test_every_category_is_populated() {
        let grouped = env_vars_by_category();
        assert_eq!(grouped.len(), EnvVarCategory::all().len());
    }

    #[test]
    fn test_env_var_defaults_match_config_defaults() {
        let config = crate::config::Config::default();
        let latency = ENV_VARS
            .iter()
            .find(|v| v.name == "CIVIC_AUTH__LOGIN_LATENCY_MS")
            .and_then(|v| v.default)
            .unwrap();
        assert_eq!(latency, config.auth.login_latency_ms.to_string());

        let state = ENV_VARS
            .iter()
            .find(|v| v.name == "CIVIC_PATHS__STATE")
            .and_then(|v| v.default)
            .unwrap();
        assert_eq!(state, config.paths.state);
    }
}
