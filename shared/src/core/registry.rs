//! Step activation registry
//!
//! Steps are mounted lazily as the user reaches them so that memory
//! constrained devices never load every step's UI at session start. The set
//! of active steps only grows: deactivating a mounted step would throw away
//! input the user has not saved yet.
//!
//! Slides are laid out in activation order. A newly activated step always
//! lands after every mounted slide, so the slide the user is on never moves.

use serde::Serialize;
use tracing::debug;

use crate::core::types::StepId;

/// Per-session record of activated steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRegistry {
    active: Vec<StepId>,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StepRegistry {
    /// Create a registry with only the photo step mounted
    pub fn new() -> Self {
        Self {
            active: vec![StepId::Photos],
        }
    }

    /// Activate a step
    ///
    /// Returns `true` when the step was newly activated; activating an
    /// already active step is a no-op returning `false`.
    pub fn activate(&mut self, step: StepId) -> bool {
        if self.is_active(step) {
            return false;
        }
        self.active.push(step);
        debug!(step = %step, slide = self.active.len() - 1, "Step activated");
        true
    }

    pub fn is_active(&self, step: StepId) -> bool {
        self.active.contains(&step)
    }

    /// Not yet active
    pub fn is_pending(&self, step: StepId) -> bool {
        !self.is_active(step)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Step rendered at a slide index
    pub fn step_at(&self, index: usize) -> Option<StepId> {
        self.active.get(index).copied()
    }

    /// Most recently mounted step
    pub fn last(&self) -> StepId {
        self.active.last().copied().unwrap_or(StepId::Photos)
    }

    /// Active steps in activation order, i.e. the slides the view renders
    pub fn visible_steps(&self) -> Vec<StepId> {
        self.active.clone()
    }
}
