//! Linear step state machine for one wizard instance

use super::{FlowKind, Progress, StepDescriptor, StepGate, StepView};

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The navigator now sits on this step
    Moved(&'static StepDescriptor),
    /// Back on the first step: there is nowhere to go
    Stay,
    /// The step's local rule refused the move
    Blocked,
    /// Next on the terminal step
    Finished,
}

#[derive(Debug, Clone)]
pub struct WizardNavigator {
    flow: FlowKind,
    /// 0-based position into `flow.steps()`
    position: usize,
}

impl WizardNavigator {
    /// Start on the first step
    pub fn new(flow: FlowKind) -> Self {
        Self { flow, position: 0 }
    }

    /// Start on a 1-based step index
    pub fn at(flow: FlowKind, index: usize) -> Option<Self> {
        if index == 0 || index > flow.steps().len() {
            return None;
        }
        Some(Self {
            flow,
            position: index - 1,
        })
    }

    /// Start on the step owning `route`
    pub fn from_route(route: &str) -> Option<Self> {
        FlowKind::locate(route).and_then(|(flow, index)| Self::at(flow, index))
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    pub fn current(&self) -> &'static StepDescriptor {
        &self.flow.steps()[self.position]
    }

    /// 1-based index of the current step
    pub fn index(&self) -> usize {
        self.position + 1
    }

    pub fn total(&self) -> usize {
        self.flow.steps().len()
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_terminal(&self) -> bool {
        self.index() == self.total()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            index: self.index(),
            total: self.total(),
        }
    }

    pub fn steps(&self) -> Vec<StepView> {
        self.flow
            .steps()
            .iter()
            .enumerate()
            .map(|(pos, step)| StepView {
                index: pos + 1,
                label: step.label,
                completed: pos < self.position,
                active: pos == self.position,
            })
            .collect()
    }

    /// Step reached by "Back", if any
    pub fn back_target(&self) -> Option<&'static StepDescriptor> {
        self.position
            .checked_sub(1)
            .map(|pos| &self.flow.steps()[pos])
    }

    /// Step reached by "Next"/"Skip", if any
    pub fn next_target(&self) -> Option<&'static StepDescriptor> {
        self.flow.steps().get(self.position + 1)
    }

    /// Whether the current step lets "Next" through
    pub fn can_advance(&self, has_selection: bool) -> bool {
        match self.current().gate {
            StepGate::Open => true,
            StepGate::RequiresSelection => has_selection,
        }
    }

    pub fn can_skip(&self) -> bool {
        self.current().skippable
    }

    pub fn next(&mut self, has_selection: bool) -> Transition {
        if !self.can_advance(has_selection) {
            return Transition::Blocked;
        }
        self.advance()
    }

    /// Same as `next` without consulting the step's gate
    pub fn skip(&mut self) -> Transition {
        if !self.can_skip() {
            return Transition::Blocked;
        }
        self.advance()
    }

    pub fn back(&mut self) -> Transition {
        match self.back_target() {
            Some(step) => {
                self.position -= 1;
                tracing::debug!(flow = %self.flow, step = step.key, "Wizard back");
                Transition::Moved(step)
            }
            None => Transition::Stay,
        }
    }

    /// Reposition onto the step owning `route` within this flow
    pub fn jump_to_route(&mut self, route: &str) -> bool {
        match self.flow.steps().iter().position(|s| s.route == route) {
            Some(pos) => {
                self.position = pos;
                true
            }
            None => false,
        }
    }

    fn advance(&mut self) -> Transition {
        match self.next_target() {
            Some(step) => {
                self.position += 1;
                tracing::debug!(flow = %self.flow, step = step.key, "Wizard next");
                Transition::Moved(step)
            }
            None => {
                tracing::info!(flow = %self.flow, "Wizard finished");
                Transition::Finished
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_first_step() {
        let nav = WizardNavigator::new(FlowKind::Ngo);
        assert_eq!(nav.index(), 1);
        assert_eq!(nav.total(), 4);
        assert_eq!(nav.current().key, "identity");
        assert!(nav.is_first());
        assert!(nav.back_target().is_none());
    }

    #[test]
    fn test_progress_and_back_target_for_every_step() {
        for flow in FlowKind::all() {
            let total = flow.steps().len();
            for index in 1..=total {
                let nav = WizardNavigator::at(*flow, index).unwrap();
                assert_eq!(nav.progress().index, index);
                assert_eq!(nav.progress().total, total);
                assert!(
                    (nav.progress().fraction() - index as f64 / total as f64).abs() < f64::EPSILON
                );
                match nav.back_target() {
                    None => assert_eq!(index, 1),
                    Some(step) => assert_eq!(step, &flow.steps()[index - 2]),
                }
            }
        }
    }

    #[test]
    fn test_gate_blocks_next_without_selection() {
        let mut nav = WizardNavigator::new(FlowKind::Donor);
        assert!(!nav.can_advance(false));
        assert_eq!(nav.next(false), Transition::Blocked);
        assert_eq!(nav.index(), 1);

        assert_eq!(nav.next(true), Transition::Moved(&FlowKind::Donor.steps()[1]));
        assert_eq!(nav.index(), 2);
    }

    #[test]
    fn test_skip_respects_skippable_flag() {
        let mut nav = WizardNavigator::new(FlowKind::Ngo);
        assert_eq!(nav.skip(), Transition::Blocked);

        nav.next(true);
        assert_eq!(nav.current().key, "legal");
        assert_eq!(nav.skip(), Transition::Moved(&FlowKind::Ngo.steps()[2]));
    }

    #[test]
    fn test_open_steps_advance_without_selection() {
        let mut nav = WizardNavigator::at(FlowKind::Donor, 2).unwrap();
        assert!(nav.can_advance(false));
        assert!(matches!(nav.next(false), Transition::Moved(_)));
    }

    #[test]
    fn test_next_on_terminal_finishes() {
        let mut nav = WizardNavigator::at(FlowKind::Ngo, 4).unwrap();
        assert!(nav.is_terminal());
        assert!(nav.next_target().is_none());
        assert_eq!(nav.next(false), Transition::Finished);
        assert_eq!(nav.index(), 4);
    }

    #[test]
    fn test_single_step_flow_is_both_first_and_terminal() {
        let mut nav = WizardNavigator::new(FlowKind::Talent);
        assert!(nav.is_first());
        assert!(nav.is_terminal());
        assert_eq!(nav.back(), Transition::Stay);
        assert_eq!(nav.next(false), Transition::Finished);
    }

    #[test]
    fn test_back_walks_to_start() {
        let mut nav = WizardNavigator::at(FlowKind::Ngo, 3).unwrap();
        assert_eq!(nav.back(), Transition::Moved(&FlowKind::Ngo.steps()[1]));
        assert_eq!(nav.back(), Transition::Moved(&FlowKind::Ngo.steps()[0]));
        assert_eq!(nav.back(), Transition::Stay);
    }

    #[test]
    fn test_step_views_mark_completed_and_active() {
        let nav = WizardNavigator::at(FlowKind::Ngo, 3).unwrap();
        let views = nav.steps();
        let completed: Vec<bool> = views.iter().map(|v| v.completed).collect();
        let active: Vec<bool> = views.iter().map(|v| v.active).collect();
        assert_eq!(completed, vec![true, true, false, false]);
        assert_eq!(active, vec![false, false, true, false]);
        assert_eq!(views[2].index, 3);
    }

    #[test]
    fn test_at_rejects_out_of_range() {
        assert!(WizardNavigator::at(FlowKind::Ngo, 0).is_none());
        assert!(WizardNavigator::at(FlowKind::Ngo, 5).is_none());
    }

    #[test]
    fn test_route_positioning() {
        let nav = WizardNavigator::from_route("/onboarding/donor/notifications").unwrap();
        assert_eq!(nav.flow(), FlowKind::Donor);
        assert!(nav.is_terminal());

        let mut nav = WizardNavigator::new(FlowKind::Ngo);
        assert!(nav.jump_to_route("/onboarding/ngo/visibility"));
        assert_eq!(nav.index(), 3);
        assert!(!nav.jump_to_route("/onboarding/donor/identity"));
        assert_eq!(nav.index(), 3);
    }
}
