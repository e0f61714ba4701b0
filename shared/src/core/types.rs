//! Core types for the listing wizard.
//!
//! This module defines the step catalogue, the variant tag used for
//! branching, and the small enums that describe what happened when the
//! wizard was entered or a publish phase failed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One screen of the wizard
///
/// The declaration order is the catalogue order. Slides are laid out in the
/// order a session activates them, which follows its variant's path through
/// the catalogue. Not every variant visits every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Photos,
    Price,
    Attributes,
    Lifestyle,
    Appointment,
    Attendance,
    Limitation,
    Done,
}

impl StepId {
    /// Every step in catalogue order
    pub const CATALOGUE: [StepId; 8] = [
        StepId::Photos,
        StepId::Price,
        StepId::Attributes,
        StepId::Lifestyle,
        StepId::Appointment,
        StepId::Attendance,
        StepId::Limitation,
        StepId::Done,
    ];

    /// Stable lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Photos => "photos",
            StepId::Price => "price",
            StepId::Attributes => "attributes",
            StepId::Lifestyle => "lifestyle",
            StepId::Appointment => "appointment",
            StepId::Attendance => "attendance",
            StepId::Limitation => "limitation",
            StepId::Done => "done",
        }
    }

    /// Parse a step from its lowercase name
    pub fn from_name(name: &str) -> Option<StepId> {
        let name = name.trim();
        StepId::CATALOGUE
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-derived branch tag
///
/// Never stored; recomputed from the draft item whenever a branch is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemVariant {
    Flat,
    Share,
    Other,
}

impl ItemVariant {
    pub fn is_flat(self) -> bool {
        matches!(self, ItemVariant::Flat)
    }
}

impl fmt::Display for ItemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemVariant::Flat => f.write_str("flat"),
            ItemVariant::Share => f.write_str("share"),
            ItemVariant::Other => f.write_str("other"),
        }
    }
}

/// The two persistence phases of a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishPhase {
    Profile,
    Item,
}

impl fmt::Display for PublishPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishPhase::Profile => f.write_str("profile"),
            PublishPhase::Item => f.write_str("item"),
        }
    }
}

/// How the wizard view was (re-)entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The session already published; the confirmation stays untouched
    AlreadyDone,

    /// Resumed after a forced restart during photo picking
    Recovered { index: usize },

    /// Normal entry, view tracked
    Fresh,
}

/// Whether the session authors a new item or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    Create,
    Edit,
}

impl WizardMode {
    pub fn from_edit_flag(edit: bool) -> Self {
        if edit {
            WizardMode::Edit
        } else {
            WizardMode::Create
        }
    }

    pub fn is_edit(self) -> bool {
        matches!(self, WizardMode::Edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lists_each_step_once() {
        for (index, step) in StepId::CATALOGUE.iter().enumerate() {
            assert!(!StepId::CATALOGUE[index + 1..].contains(step));
        }
        assert_eq!(StepId::CATALOGUE[0], StepId::Photos);
        assert_eq!(StepId::CATALOGUE[7], StepId::Done);
    }

    #[test]
    fn test_step_names() {
        assert_eq!(StepId::from_name("Lifestyle"), Some(StepId::Lifestyle));
        assert_eq!(StepId::from_name(" done "), Some(StepId::Done));
        assert_eq!(StepId::from_name("checkout"), None);
        assert_eq!(StepId::Appointment.to_string(), "appointment");
    }

    #[test]
    fn test_mode_from_flag() {
        assert!(WizardMode::from_edit_flag(true).is_edit());
        assert_eq!(WizardMode::from_edit_flag(false), WizardMode::Create);
    }
}
