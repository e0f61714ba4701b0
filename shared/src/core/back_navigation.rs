//! Back-navigation reconciliation
//!
//! Decides what a hardware back press means for the wizard: dismiss an
//! overlay, step back one slide, or leave the wizard. Leaving needs two
//! fallbacks because a session entered straight from the first-choice
//! category picker has no previous screen in the platform history.

use tracing::debug;

use crate::core::state::WizardState;

/// What the navigation context looked like when the back signal arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackContext<'a> {
    /// A modal overlay is presented on top of the wizard
    pub modal_presented: bool,

    /// Current platform location, if known
    pub current_path: Option<&'a str>,

    /// Route prefix identifying the wizard
    pub wizard_route: &'a str,
}

impl BackContext<'_> {
    fn within_wizard(&self) -> bool {
        self.current_path
            .map(|path| path.contains(self.wizard_route))
            .unwrap_or(false)
    }
}

/// Action chosen for one back signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The overlay consumed the signal
    Consumed,

    /// Slide back to the given index
    PreviousStep { index: usize },

    /// Replace the navigation root with the fallback route
    ExitToFallback,

    /// Pop one platform history entry
    PlatformBack,
}

/// Pick the action for a back signal without mutating anything
pub fn reconcile(state: &WizardState, context: &BackContext<'_>) -> BackAction {
    if context.modal_presented {
        return BackAction::Consumed;
    }

    if !context.within_wizard() {
        return BackAction::PlatformBack;
    }

    let index = state.current_step_index();
    if index > 0 && !state.is_done() {
        return BackAction::PreviousStep { index: index - 1 };
    }

    if state.is_first_choice_entry() {
        BackAction::ExitToFallback
    } else {
        BackAction::PlatformBack
    }
}

/// Apply the state half of a back action
///
/// Slide moves decrement the index and leave activations alone; exiting to
/// the fallback clears the first-choice flag so the next exit is an
/// ordinary back.
pub fn apply(state: &mut WizardState, action: BackAction) {
    match action {
        BackAction::PreviousStep { .. } => {
            state.retreat_index();
        }
        BackAction::ExitToFallback => state.set_first_choice_entry(false),
        BackAction::Consumed | BackAction::PlatformBack => {}
    }
    debug!(?action, index = state.current_step_index(), "Back signal reconciled");
}
