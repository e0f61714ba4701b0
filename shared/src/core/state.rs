//! Wizard session state
//!
//! One [`WizardState`] exists per editing or creation session. It is owned
//! by the session controller and handed by reference to the sequencer, the
//! back-navigation reconciler and the publish pipeline; nothing else holds
//! it.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::registry::StepRegistry;
use crate::core::types::{StepId, WizardMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    mode: WizardMode,
    current_step_index: usize,
    steps: StepRegistry,
    is_done: bool,
    first_choice_entry: bool,
    pending_recovered_photo: bool,
    publishing: bool,
}

impl WizardState {
    /// Fresh state at the first slide
    pub fn new(mode: WizardMode) -> Self {
        Self {
            mode,
            current_step_index: 0,
            steps: StepRegistry::new(),
            is_done: false,
            first_choice_entry: false,
            pending_recovered_photo: false,
            publishing: false,
        }
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn is_edit(&self) -> bool {
        self.mode.is_edit()
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn is_first_choice_entry(&self) -> bool {
        self.first_choice_entry
    }

    pub fn has_pending_recovered_photo(&self) -> bool {
        self.pending_recovered_photo
    }

    /// True while a publish is in flight; the trigger should be disabled
    pub fn is_publishing(&self) -> bool {
        self.publishing
    }

    /// Consume the recovered-photo marker
    ///
    /// Called by the photo step once it has reopened the picker. Returns
    /// whether a recovery was pending.
    pub fn take_recovered_photo(&mut self) -> bool {
        let pending = self.pending_recovered_photo;
        self.pending_recovered_photo = false;
        if pending {
            debug!("Recovered photo marker consumed");
        }
        pending
    }

    pub(crate) fn activate(&mut self, step: StepId) -> bool {
        self.steps.activate(step)
    }

    /// Move to a mounted slide; returns false, leaving the index alone,
    /// when no slide exists at `index`
    pub(crate) fn set_step_index(&mut self, index: usize) -> bool {
        if index >= self.steps.active_count() {
            return false;
        }
        self.current_step_index = index;
        true
    }

    /// Move forward one slide; returns false at the last mounted slide
    pub(crate) fn advance_index(&mut self) -> bool {
        self.set_step_index(self.current_step_index + 1)
    }

    /// Move back one slide; returns false at the first slide
    pub(crate) fn retreat_index(&mut self) -> bool {
        match self.current_step_index.checked_sub(1) {
            Some(index) => {
                self.current_step_index = index;
                true
            }
            None => false,
        }
    }

    /// Enter the terminal state; later calls are no-ops
    pub(crate) fn mark_done(&mut self) {
        if !self.is_done {
            info!("Wizard session reached done");
            self.is_done = true;
        }
    }

    pub(crate) fn set_first_choice_entry(&mut self, first_choice: bool) {
        self.first_choice_entry = first_choice;
    }

    pub(crate) fn set_pending_recovered_photo(&mut self) {
        self.pending_recovered_photo = true;
    }

    pub(crate) fn set_publishing(&mut self, publishing: bool) {
        self.publishing = publishing;
    }
}
