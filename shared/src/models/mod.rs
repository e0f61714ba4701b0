//! Data models consumed by the wizard core
//!
//! The wizard never owns durable data: items and users live in external
//! services. These structures are the minimal shapes the core reads when it
//! branches on category or hands values back to collaborators.

pub mod item;
pub mod user;

pub use item::{Item, ItemCategory};
pub use user::User;
