//! Core modules for the listing wizard
//!
//! This module contains the wizard state machine and its publish pipeline:
//! - Step catalogue, variant classification and lazy step activation
//! - The table-driven sequencer and the back-navigation reconciler
//! - The two-phase publish pipeline
//! - Collaborator traits and their in-memory implementations
//! - The session controller tying them together

pub mod back_navigation;
pub mod classifier;
pub mod controller;
pub mod errors;
pub mod memory_providers;
pub mod providers;
pub mod publish;
pub mod registry;
pub mod sequencer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use back_navigation::{BackAction, BackContext};
pub use classifier::classify;
pub use controller::WizardController;
pub use errors::{
    ConfigError, ConfigResult, PublishError, PublishOutcome, ServiceError, ServiceResult,
};
pub use memory_providers::{CallLog, InMemoryOptions, InMemoryServices};
pub use providers::{
    Analytics, BackSignal, BackSignalSource, BackSubscription, DraftItemService, ModalStack,
    NavigationContext, Navigator, Notifier, Platform, ProfileService, ProgressIndicator,
    SessionRegistry, SlideView, WizardServices,
};
pub use publish::PublishPipeline;
pub use registry::StepRegistry;
pub use sequencer::{next_step, Sequencer, Transition};
pub use state::WizardState;
pub use types::{EntryKind, ItemVariant, PublishPhase, StepId, WizardMode};
