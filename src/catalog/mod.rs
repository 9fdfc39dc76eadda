//! Configuration-driven list-plus-detail dashboards.
//!
//! Every dashboard tab is one [`Catalog`]: a [`ViewConfig`] naming the
//! table columns, filters and detail fields, plus the entries to show.
//! The datasets are embedded TOML documents.

pub mod view;

pub use view::ListDetailView;

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::routes::DashboardKind;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to parse catalog '{name}': {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: toml::de::Error,
    },

    #[error("catalog '{name}' is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    /// Percentage of the table width
    #[serde(default = "default_column_width")]
    pub width: u16,
}

fn default_column_width() -> u16 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterSpec {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetailField {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewConfig {
    pub title: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    pub detail: Vec<DetailField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Entry {
    /// Field value, empty when the entry does not carry it
    pub fn field(&self, key: &str) -> &str {
        if key == "id" {
            return &self.id;
        }
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub view: ViewConfig,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Catalog {
    pub fn from_toml(name: &'static str, source: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            toml::from_str(source).map_err(|source| CatalogError::Parse { name, source })?;
        catalog.validate(name)?;
        Ok(catalog)
    }

    fn validate(&self, name: &'static str) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::Invalid { name, reason };

        if self.view.columns.is_empty() {
            return Err(invalid("no columns".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(invalid(format!("duplicate entry id '{}'", entry.id)));
            }
        }

        let known_keys: HashSet<&str> = self
            .entries
            .iter()
            .flat_map(|e| e.fields.keys().map(String::as_str))
            .chain(std::iter::once("id"))
            .collect();
        let referenced = self
            .view
            .columns
            .iter()
            .map(|c| c.key.as_str())
            .chain(self.view.filters.iter().map(|f| f.key.as_str()))
            .chain(self.view.detail.iter().map(|d| d.key.as_str()));
        for key in referenced {
            if !self.entries.is_empty() && !known_keys.contains(key) {
                return Err(invalid(format!("no entry has field '{key}'")));
            }
        }

        Ok(())
    }
}

const NGO_PROGRAMS: &str = include_str!("data/ngo_programs.toml");
const NGO_VOLUNTEERS: &str = include_str!("data/ngo_volunteers.toml");
const DONOR_ORGANIZATIONS: &str = include_str!("data/donor_organizations.toml");
const DONOR_DONATIONS: &str = include_str!("data/donor_donations.toml");
const TALENT_OPPORTUNITIES: &str = include_str!("data/talent_opportunities.toml");
const TALENT_APPLICATIONS: &str = include_str!("data/talent_applications.toml");

/// Tabs shown on a dashboard, in display order
pub fn dashboard_tabs(kind: DashboardKind) -> Result<Vec<Catalog>, CatalogError> {
    let sources: [(&'static str, &str); 2] = match kind {
        DashboardKind::Ngo => [
            ("ngo_programs", NGO_PROGRAMS),
            ("ngo_volunteers", NGO_VOLUNTEERS),
        ],
        DashboardKind::Donor => [
            ("donor_organizations", DONOR_ORGANIZATIONS),
            ("donor_donations", DONOR_DONATIONS),
        ],
        DashboardKind::Talent => [
            ("talent_opportunities", TALENT_OPPORTUNITIES),
            ("talent_applications", TALENT_APPLICATIONS),
        ],
    };

    sources
        .into_iter()
        .map(|(name, source)| Catalog::from_toml(name, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [view]
        title = "Things"
        detail = [{ key = "name", label = "Name" }]

        [[view.columns]]
        key = "name"
        label = "Name"
        width = 60

        [[view.filters]]
        key = "kind"
        label = "Kind"

        [[entries]]
        id = "t-1"
        name = "First"
        kind = "a"

        [[entries]]
        id = "t-2"
        name = "Second"
        kind = "b"
    "#;

    #[test]
    fn test_parse_sample() {
        let catalog = Catalog::from_toml("sample", SAMPLE).unwrap();
        assert_eq!(catalog.view.title, "Things");
        assert_eq!(catalog.view.columns[0].width, 60);
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.entries[1].field("kind"), "b");
        assert_eq!(catalog.entries[1].field("id"), "t-2");
        assert_eq!(catalog.entries[1].field("missing"), "");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let source = SAMPLE.replace("t-2", "t-1");
        let err = Catalog::from_toml("sample", &source).unwrap_err();
        assert!(err.to_string().contains("duplicate entry id"));
    }

    #[test]
    fn test_unknown_column_key_rejected() {
        let source = SAMPLE.replace("key = \"kind\"", "key = \"category\"");
        let err = Catalog::from_toml("sample", &source).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }));
    }

    #[test]
    fn test_syntax_error_names_catalog() {
        let err = Catalog::from_toml("broken", "[view").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_every_dashboard_has_two_valid_tabs() {
        for kind in DashboardKind::all() {
            let tabs = dashboard_tabs(*kind).unwrap();
            assert_eq!(tabs.len(), 2, "{kind:?}");
            for tab in &tabs {
                assert!(!tab.entries.is_empty(), "{} has no entries", tab.view.title);
                assert!(!tab.view.detail.is_empty());
                let width: u16 = tab.view.columns.iter().map(|c| c.width).sum();
                assert!(width <= 100, "{} columns exceed 100%", tab.view.title);
            }
        }
    }
}
