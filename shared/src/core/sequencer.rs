//! Wizard step sequencer
//!
//! All branching lives in [`next_step`], a single table keyed by the step
//! that just completed and the item variant. The sequencer applies the
//! result to a [`WizardState`] and returns a [`Transition`] describing what
//! the slide view has to do; it never touches the view itself.

use tracing::{debug, info, warn};

use crate::core::state::WizardState;
use crate::core::types::{ItemVariant, StepId, WizardMode};

/// Step to activate after `completed`, for the given variant
///
/// `Flat` takes the flat branch; `Share` and `Other` share the other one.
/// Walking the table from `Photos` gives each variant's path:
///
/// - flat: photos, price, appointment, limitation, attributes, attendance, done
/// - otherwise: photos, price, lifestyle, attributes, appointment, done
///
/// `Done` is terminal.
pub fn next_step(completed: StepId, variant: ItemVariant) -> Option<StepId> {
    use StepId::*;

    let flat = variant.is_flat();
    let next = match completed {
        Photos => Price,
        Price if flat => Appointment,
        Price => Lifestyle,
        Lifestyle => Attributes,
        Attributes if flat => Attendance,
        Attributes => Appointment,
        Attendance => Done,
        Appointment if flat => Limitation,
        Appointment => Done,
        Limitation => Attributes,
        Done => return None,
    };
    Some(next)
}

/// Effect of one sequencer transition on the slide view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Step that was activated, if the transition had a successor
    pub activated: Option<StepId>,

    /// Whether the activation added a step that was not active before
    pub newly_activated: bool,

    /// The view must recount its slides
    pub refresh: bool,

    /// The view must move forward by one slide
    pub advance: bool,
}

impl Transition {
    fn none() -> Self {
        Self {
            activated: None,
            newly_activated: false,
            refresh: false,
            advance: false,
        }
    }
}

/// Stateless driver applying the transition table to a session
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequencer;

impl Sequencer {
    /// Handle a "step complete" event
    ///
    /// The branch is evaluated against the variant supplied now. Steps
    /// activated by earlier branches stay active whatever the variant has
    /// become since.
    pub fn complete_step(
        state: &mut WizardState,
        completed: StepId,
        variant: ItemVariant,
    ) -> Transition {
        if state.is_done() {
            debug!(step = %completed, "Ignoring step completion after done");
            return Transition::none();
        }

        match next_step(completed, variant) {
            Some(next) => {
                let newly_activated = state.activate(next);
                debug!(
                    completed = %completed,
                    next = %next,
                    variant = %variant,
                    newly_activated,
                    "Step completed"
                );
                Transition {
                    activated: Some(next),
                    newly_activated,
                    refresh: true,
                    advance: false,
                }
            }
            None => Transition::none(),
        }
    }

    /// Enter the terminal step after a successful publish
    ///
    /// Activates `Done`, marks the session done and moves the visible slide
    /// forward by exactly one. Publishing happens from the slide before
    /// `Done`, so the move lands on it.
    pub fn advance_to_done(state: &mut WizardState) -> Transition {
        let newly_activated = state.activate(StepId::Done);
        state.mark_done();
        let advance = state.advance_index();
        if !advance {
            warn!(index = state.current_step_index(), "No slide after the current one");
        }
        info!(index = state.current_step_index(), "Advanced to done step");
        Transition {
            activated: Some(StepId::Done),
            newly_activated,
            refresh: true,
            advance,
        }
    }

    /// Slide a session resumes on after a forced restart
    ///
    /// Edit sessions have one fewer leading slide than new-item sessions.
    pub fn recovery_index(mode: WizardMode, new_item_index: usize, edit_item_index: usize) -> usize {
        match mode {
            WizardMode::Edit => edit_item_index,
            WizardMode::Create => new_item_index,
        }
    }

    /// Jump straight to the photo slide and flag the pending recovery
    ///
    /// The session was killed on that slide, so every step of the variant's
    /// path up to it is mounted again before the index moves there.
    pub fn resume_recovery(state: &mut WizardState, index: usize, variant: ItemVariant) {
        while state.steps().active_count() <= index {
            let Some(next) = next_step(state.steps().last(), variant) else {
                break;
            };
            if !state.activate(next) {
                break;
            }
        }
        if !state.set_step_index(index) {
            warn!(index, "Recovery slide is past the end of the path");
        }
        state.set_pending_recovered_photo();
        info!(index = state.current_step_index(), "Resuming at photo step after restart");
    }
}

/// State of a session that followed `variant`'s path until `slides` slides
/// were mounted, sitting on the last of them
#[cfg(test)]
pub(crate) fn walked_state(mode: WizardMode, variant: ItemVariant, slides: usize) -> WizardState {
    let mut state = WizardState::new(mode);
    while state.steps().active_count() < slides {
        let current = state.steps().last();
        Sequencer::complete_step(&mut state, current, variant);
        assert!(state.advance_index(), "path ended before {slides} slides");
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_branch() {
        assert_eq!(
            next_step(StepId::Price, ItemVariant::Flat),
            Some(StepId::Appointment)
        );
        assert_eq!(
            next_step(StepId::Price, ItemVariant::Share),
            Some(StepId::Lifestyle)
        );
        assert_eq!(
            next_step(StepId::Price, ItemVariant::Other),
            Some(StepId::Lifestyle)
        );
    }

    #[test]
    fn test_attributes_and_appointment_branches() {
        assert_eq!(
            next_step(StepId::Attributes, ItemVariant::Flat),
            Some(StepId::Attendance)
        );
        assert_eq!(
            next_step(StepId::Attributes, ItemVariant::Share),
            Some(StepId::Appointment)
        );
        assert_eq!(
            next_step(StepId::Appointment, ItemVariant::Flat),
            Some(StepId::Limitation)
        );
        assert_eq!(
            next_step(StepId::Appointment, ItemVariant::Other),
            Some(StepId::Done)
        );
    }

    #[test]
    fn test_done_is_terminal() {
        for variant in [ItemVariant::Flat, ItemVariant::Share, ItemVariant::Other] {
            assert_eq!(next_step(StepId::Done, variant), None);
        }
    }

    #[test]
    fn test_complete_step_refreshes_without_advancing() {
        let mut state = WizardState::new(WizardMode::Create);
        let transition = Sequencer::complete_step(&mut state, StepId::Photos, ItemVariant::Share);

        assert_eq!(transition.activated, Some(StepId::Price));
        assert!(transition.newly_activated);
        assert!(transition.refresh);
        assert!(!transition.advance);
        assert_eq!(state.current_step_index(), 0);
        assert!(state.steps().is_active(StepId::Price));
    }

    #[test]
    fn test_repeated_completion_keeps_single_activation() {
        let mut state = WizardState::new(WizardMode::Create);
        Sequencer::complete_step(&mut state, StepId::Photos, ItemVariant::Flat);
        let again = Sequencer::complete_step(&mut state, StepId::Photos, ItemVariant::Flat);

        assert!(!again.newly_activated);
        assert!(again.refresh);
        assert_eq!(state.steps().active_count(), 2);
    }

    #[test]
    fn test_variant_change_does_not_prune() {
        let mut state = WizardState::new(WizardMode::Create);
        Sequencer::complete_step(&mut state, StepId::Price, ItemVariant::Share);
        Sequencer::complete_step(&mut state, StepId::Price, ItemVariant::Flat);

        assert!(state.steps().is_active(StepId::Lifestyle));
        assert!(state.steps().is_active(StepId::Appointment));
    }

    fn path(variant: ItemVariant) -> Vec<StepId> {
        let mut steps = vec![StepId::Photos];
        while let Some(next) = next_step(steps[steps.len() - 1], variant) {
            assert!(!steps.contains(&next), "{next} visited twice");
            steps.push(next);
        }
        steps
    }

    #[test]
    fn test_variant_paths() {
        use StepId::*;

        assert_eq!(
            path(ItemVariant::Flat),
            vec![Photos, Price, Appointment, Limitation, Attributes, Attendance, Done]
        );
        assert_eq!(
            path(ItemVariant::Share),
            vec![Photos, Price, Lifestyle, Attributes, Appointment, Done]
        );
        assert_eq!(path(ItemVariant::Other), path(ItemVariant::Share));
    }

    #[test]
    fn test_every_step_is_on_some_path() {
        let flat = path(ItemVariant::Flat);
        let share = path(ItemVariant::Share);
        for step in StepId::CATALOGUE {
            assert!(flat.contains(&step) || share.contains(&step), "{step} unreachable");
        }
    }

    #[test]
    fn test_walk_mounts_path_in_order() {
        let state = walked_state(WizardMode::Create, ItemVariant::Share, 4);
        assert_eq!(state.steps().visible_steps(), path(ItemVariant::Share)[..4].to_vec());
        assert_eq!(state.current_step_index(), 3);
        assert_eq!(state.steps().step_at(3), Some(StepId::Attributes));
    }

    #[test]
    fn test_advance_to_done() {
        let mut state = walked_state(WizardMode::Create, ItemVariant::Share, 5);
        assert_eq!(state.steps().step_at(4), Some(StepId::Appointment));
        let transition = Sequencer::advance_to_done(&mut state);

        assert!(transition.advance);
        assert!(transition.newly_activated);
        assert!(state.is_done());
        assert_eq!(state.current_step_index(), 5);
        assert_eq!(state.steps().step_at(5), Some(StepId::Done));

        let ignored = Sequencer::complete_step(&mut state, StepId::Price, ItemVariant::Flat);
        assert_eq!(ignored.activated, None);
        assert_eq!(state.steps().active_count(), 6);
    }

    #[test]
    fn test_recovery_index() {
        assert_eq!(Sequencer::recovery_index(WizardMode::Edit, 2, 1), 1);
        assert_eq!(Sequencer::recovery_index(WizardMode::Create, 2, 1), 2);

        let mut state = WizardState::new(WizardMode::Edit);
        Sequencer::resume_recovery(&mut state, 1, ItemVariant::Flat);
        assert_eq!(state.current_step_index(), 1);
        assert_eq!(state.steps().visible_steps(), vec![StepId::Photos, StepId::Price]);
        assert!(state.has_pending_recovered_photo());

        let mut state = WizardState::new(WizardMode::Create);
        Sequencer::resume_recovery(&mut state, 2, ItemVariant::Share);
        assert_eq!(state.current_step_index(), 2);
        assert_eq!(state.steps().step_at(2), Some(StepId::Lifestyle));
    }
}
