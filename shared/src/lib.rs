//! Listing Wizard Shared Library
//!
//! This crate contains the controller behind the multi-step wizard that
//! walks a user through creating or editing a classified-ad listing. It
//! decides which steps apply to the item's category, mounts them lazily as
//! the user advances, reconciles hardware back presses with the step stack
//! and runs the publish transaction.
//!
//! # Features
//!
//! - **Sequencer**: one transition table keyed by completed step and item variant
//! - **Activation registry**: steps are mounted on demand and never unmounted
//! - **Back navigation**: previous step, fallback root or platform back
//! - **Publish pipeline**: profile save then item save, with a single error path
//! - **In-memory collaborators**: for tests and the simulator
//!
//! # Usage
//!
//! ```rust
//! use listing_wizard_shared::core::{InMemoryOptions, InMemoryServices, StepId, WizardController};
//! use listing_wizard_shared::models::Item;
//! use listing_wizard_shared::WizardConfig;
//!
//! # tokio_test_block(async {
//! let services = InMemoryServices::new(InMemoryOptions {
//!     item: Item::with_category("flat"),
//!     ..InMemoryOptions::default()
//! });
//! let mut wizard = WizardController::new(services.services(), WizardConfig::default());
//!
//! wizard.did_enter().await;
//! wizard.complete_step(StepId::Photos).await;
//! wizard.complete_step(StepId::Price).await;
//! assert!(wizard.state().steps().is_active(StepId::Appointment));
//!
//! assert!(wizard.publish().await.is_ok());
//! assert!(wizard.is_done());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod models;

// Re-export commonly used types for convenience
pub use config::WizardConfig;
pub use crate::core::{
    EntryKind, ItemVariant, PublishError, ServiceError, StepId, WizardController, WizardMode,
    WizardServices, WizardState,
};
pub use models::{Item, ItemCategory, User};

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
