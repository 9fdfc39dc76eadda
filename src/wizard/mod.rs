//! Onboarding wizards.
//!
//! Each flow is a fixed, linear list of routed steps. The navigator moves
//! between them; steps never read each other's answers. Answers can be kept
//! as drafts between steps and handed to a submission sink at the end.

pub mod draft;
pub mod flows;
pub mod navigator;

pub use draft::{Draft, DraftError, DraftStore, FileSubmissionSink, Submission, SubmissionSink};
pub use flows::FlowKind;
pub use navigator::{Transition, WizardNavigator};

/// Rule deciding whether "Next" is enabled on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGate {
    /// Next is always enabled
    Open,
    /// Next stays disabled until at least one choice is selected
    RequiresSelection,
}

/// How the step's choice list behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Informational step with no choices
    None,
    /// Radio-style: picking a choice replaces the previous one
    Single,
    /// Checkbox-style
    Multiple,
}

/// Static description of one wizard step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    /// Stable key used in routes and draft answers (e.g., "identity")
    pub key: &'static str,
    pub label: &'static str,
    pub route: &'static str,
    /// One-line prompt shown above the choices
    pub prompt: &'static str,
    pub gate: StepGate,
    /// Whether "Skip" is offered
    pub skippable: bool,
    pub selection: SelectionMode,
    pub choices: &'static [&'static str],
}

/// Filled proportion of the progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the current step
    pub index: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.index as f64 / self.total as f64
    }

    /// Whole percent, rounded down
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        ((self.index * 100) / self.total) as u16
    }

    pub fn label(&self) -> String {
        format!("Step {} of {}", self.index, self.total)
    }
}

/// Render-ready state of one step in the step list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub index: usize,
    pub label: &'static str,
    /// True for every step strictly before the current one
    pub completed: bool,
    /// True only for the current step
    pub active: bool,
}
