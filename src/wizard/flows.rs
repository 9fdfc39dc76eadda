//! The three onboarding flows

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{SelectionMode, StepDescriptor, StepGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Ngo,
    Donor,
    Talent,
}

impl FlowKind {
    pub fn all() -> &'static [FlowKind] {
        &[FlowKind::Ngo, FlowKind::Donor, FlowKind::Talent]
    }

    pub fn key(&self) -> &'static str {
        match self {
            FlowKind::Ngo => "ngo",
            FlowKind::Donor => "donor",
            FlowKind::Talent => "talent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowKind::Ngo => "NGO Registration",
            FlowKind::Donor => "Donor Onboarding",
            FlowKind::Talent => "Volunteer & Talent Profile",
        }
    }

    pub fn steps(&self) -> &'static [StepDescriptor] {
        match self {
            FlowKind::Ngo => NGO_STEPS,
            FlowKind::Donor => DONOR_STEPS,
            FlowKind::Talent => TALENT_STEPS,
        }
    }

    /// Route of the first step
    pub fn entry_route(&self) -> &'static str {
        self.steps()[0].route
    }

    /// Find the flow and 1-based step index for an onboarding route
    pub fn locate(route: &str) -> Option<(FlowKind, usize)> {
        FlowKind::all().iter().find_map(|flow| {
            flow.steps()
                .iter()
                .position(|s| s.route == route)
                .map(|pos| (*flow, pos + 1))
        })
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ngo" => Ok(FlowKind::Ngo),
            "donor" => Ok(FlowKind::Donor),
            "talent" | "volunteer" => Ok(FlowKind::Talent),
            other => Err(format!(
                "unknown flow '{other}' (expected ngo, donor or talent)"
            )),
        }
    }
}

pub static NGO_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        key: "identity",
        label: "Identity",
        route: "/onboarding/ngo/identity",
        prompt: "What kind of organization are you registering?",
        gate: StepGate::RequiresSelection,
        skippable: false,
        selection: SelectionMode::Single,
        choices: &[
            "Registered NGO",
            "Community-based organization",
            "Social enterprise",
            "Foundation or trust",
            "Faith-based organization",
        ],
    },
    StepDescriptor {
        key: "legal",
        label: "Legal",
        route: "/onboarding/ngo/legal",
        prompt: "Which registration documents can you provide?",
        gate: StepGate::Open,
        skippable: true,
        selection: SelectionMode::Multiple,
        choices: &[
            "Certificate of registration",
            "Tax exemption letter",
            "Audited financial statements",
            "Board resolution",
        ],
    },
    StepDescriptor {
        key: "visibility",
        label: "Visibility",
        route: "/onboarding/ngo/visibility",
        prompt: "Where should your organization appear?",
        gate: StepGate::Open,
        skippable: true,
        selection: SelectionMode::Multiple,
        choices: &[
            "Public directory listing",
            "Donor matching",
            "Volunteer opportunities board",
        ],
    },
    StepDescriptor {
        key: "verify",
        label: "Verify",
        route: "/onboarding/ngo/verify",
        prompt: "Review your answers and submit for verification.",
        gate: StepGate::Open,
        skippable: false,
        selection: SelectionMode::None,
        choices: &[],
    },
];

pub static DONOR_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        key: "identity",
        label: "Identity",
        route: "/onboarding/donor/identity",
        prompt: "How will you be giving?",
        gate: StepGate::RequiresSelection,
        skippable: false,
        selection: SelectionMode::Single,
        choices: &[
            "Individual",
            "Family foundation",
            "Corporate giving programme",
            "Institutional funder",
        ],
    },
    StepDescriptor {
        key: "interests",
        label: "Interests",
        route: "/onboarding/donor/interests",
        prompt: "Which causes do you want to support?",
        gate: StepGate::Open,
        skippable: true,
        selection: SelectionMode::Multiple,
        choices: &[
            "Education",
            "Health",
            "Climate and environment",
            "Livelihoods",
            "Digital rights",
            "Gender equality",
        ],
    },
    StepDescriptor {
        key: "geography",
        label: "Geography",
        route: "/onboarding/donor/geography",
        prompt: "Which regions should we prioritise?",
        gate: StepGate::Open,
        skippable: true,
        selection: SelectionMode::Multiple,
        choices: &[
            "East Africa",
            "West Africa",
            "Southern Africa",
            "South Asia",
            "Latin America",
            "Global",
        ],
    },
    StepDescriptor {
        key: "notifications",
        label: "Notifications",
        route: "/onboarding/donor/notifications",
        prompt: "How would you like to hear about impact?",
        gate: StepGate::Open,
        skippable: true,
        selection: SelectionMode::Multiple,
        choices: &["Monthly email digest", "Impact reports", "Campaign alerts"],
    },
];

pub static TALENT_STEPS: &[StepDescriptor] = &[StepDescriptor {
    key: "profile",
    label: "Profile",
    route: "/onboarding/talent/profile",
    prompt: "Which skills can you offer?",
    gate: StepGate::Open,
    skippable: false,
    selection: SelectionMode::Multiple,
    choices: &[
        "Software development",
        "Design",
        "Data analysis",
        "Legal advice",
        "Fundraising",
        "Translation",
    ],
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_step_orders() {
        let keys = |flow: FlowKind| flow.steps().iter().map(|s| s.key).collect::<Vec<_>>();
        assert_eq!(
            keys(FlowKind::Ngo),
            vec!["identity", "legal", "visibility", "verify"]
        );
        assert_eq!(
            keys(FlowKind::Donor),
            vec!["identity", "interests", "geography", "notifications"]
        );
        assert_eq!(keys(FlowKind::Talent), vec!["profile"]);
    }

    #[test]
    fn test_routes_follow_flow_and_step_key() {
        for flow in FlowKind::all() {
            for step in flow.steps() {
                assert_eq!(
                    step.route,
                    format!("/onboarding/{}/{}", flow.key(), step.key)
                );
            }
        }
    }

    #[test]
    fn test_identity_steps_require_selection() {
        for flow in [FlowKind::Ngo, FlowKind::Donor] {
            let identity = &flow.steps()[0];
            assert_eq!(identity.gate, StepGate::RequiresSelection);
            assert!(!identity.skippable);
            assert_eq!(identity.selection, SelectionMode::Single);
        }
    }

    #[test]
    fn test_gated_steps_have_choices() {
        for flow in FlowKind::all() {
            for step in flow.steps() {
                if step.gate == StepGate::RequiresSelection {
                    assert!(!step.choices.is_empty(), "{} has no choices", step.route);
                }
                if step.selection == SelectionMode::None {
                    assert!(step.choices.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_locate_route() {
        assert_eq!(
            FlowKind::locate("/onboarding/donor/geography"),
            Some((FlowKind::Donor, 3))
        );
        assert_eq!(
            FlowKind::locate("/onboarding/talent/profile"),
            Some((FlowKind::Talent, 1))
        );
        assert_eq!(FlowKind::locate("/onboarding/ngo/unknown"), None);
    }

    #[test]
    fn test_parse_flow() {
        assert_eq!("NGO".parse::<FlowKind>().unwrap(), FlowKind::Ngo);
        assert_eq!("volunteer".parse::<FlowKind>().unwrap(), FlowKind::Talent);
        assert!("charity".parse::<FlowKind>().is_err());
    }
}
