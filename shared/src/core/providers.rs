//! Collaborator interfaces consumed by the wizard core
//!
//! The wizard sequences steps and reacts to their results; persistence,
//! navigation, presentation and tracking all belong to the host
//! application. Each concern is a trait so hosts can plug in their own
//! implementation and tests can use the in-memory ones.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::core::errors::ServiceResult;
use crate::models::{Item, User};

/// Draft item service owning the item being authored
#[async_trait]
pub trait DraftItemService: Send + Sync {
    /// Whether the session edits an existing item
    fn is_edit_mode(&self) -> bool;

    /// Whether this session has already published its item
    fn is_session_done(&self) -> bool;

    /// Whether the process was restarted during a photo-picker interaction
    fn has_pending_photo_recovery(&self) -> bool;

    /// Snapshot of the current draft
    fn draft_item(&self) -> Item;

    /// Persist the draft
    ///
    /// # Returns
    /// * `Ok(Item)` - The saved item, as the service now knows it
    /// * `Err(ServiceError)` - If the item could not be saved
    async fn save_draft_item(&self) -> ServiceResult<Item>;
}

/// Profile service for the signed-in user
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Save the user's profile if the service considers it modified
    ///
    /// The service alone decides whether a save is needed; an unmodified
    /// profile resolves successfully without a write.
    async fn save_if_modified(&self, user: &User) -> ServiceResult<User>;
}

/// Surrounding application session
pub trait SessionRegistry: Send + Sync {
    /// The signed-in user
    fn current_user(&self) -> User;

    /// Remember an item as the session's selected item (fire and forget)
    fn set_selected_item(&self, item: Item);
}

/// Parameters handed over by the screen that opened the wizard
#[async_trait]
pub trait NavigationContext: Send + Sync {
    /// Whether the wizard was opened straight from the first-choice picker
    async fn is_first_choice(&self) -> bool;

    /// Forget the first-choice origin
    async fn clear_first_choice(&self);
}

/// Platform navigation history
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Current location path
    fn current_path(&self) -> Option<String>;

    /// Replace the whole history with `route`
    async fn navigate_root(&self, route: &str);

    /// Pop one history entry
    async fn back(&self);
}

/// Modal overlay stack
#[async_trait]
pub trait ModalStack: Send + Sync {
    /// Whether a modal is presented on top of everything else
    async fn topmost_modal_presented(&self) -> bool;
}

/// Platform lifecycle hooks the wizard depends on
#[async_trait]
pub trait Platform: Send + Sync {
    /// Resolve once the platform can deliver hardware events
    async fn ready(&self);

    /// Start listening for back signals
    fn subscribe_back(&self) -> BackSubscription;
}

/// The slide view rendering the active steps
///
/// Its slide list has a fixed size until `update` is called, so every
/// activation has to be followed by an update before the view can move
/// past its last known slide.
#[async_trait]
pub trait SlideView: Send + Sync {
    /// Recount slides after steps were activated
    async fn update(&self);

    /// Jump to a slide without animation
    async fn slide_to(&self, index: usize);

    async fn slide_next(&self);

    async fn slide_prev(&self);
}

/// Blocking progress indicator shown during publish
#[async_trait]
pub trait ProgressIndicator: Send + Sync {
    async fn present(&self);

    async fn dismiss(&self);
}

/// User-facing messages
pub trait Notifier: Send + Sync {
    /// Show an error message identified by its translation key
    fn error_message(&self, key: &str);
}

/// Usage tracking
pub trait Analytics: Send + Sync {
    fn track_view(&self, view: &str);

    fn track_event(&self, category: &str, action: &str);
}

/// Payload-less back signal emitted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackSignal;

/// Broadcast source of back signals
///
/// Every wizard entry subscribes; dropping a [`BackSubscription`] releases
/// it, so [`BackSignalSource::listener_count`] shows leaked listeners.
#[derive(Debug, Clone)]
pub struct BackSignalSource {
    sender: broadcast::Sender<BackSignal>,
}

impl Default for BackSignalSource {
    fn default() -> Self {
        Self::new(16)
    }
}

impl BackSignalSource {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> BackSubscription {
        BackSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Emit a back signal, returning how many listeners received it
    pub fn emit(&self) -> usize {
        self.sender.send(BackSignal).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Live subscription to back signals, released on drop
#[derive(Debug)]
pub struct BackSubscription {
    receiver: broadcast::Receiver<BackSignal>,
}

impl BackSubscription {
    /// Take a queued signal without waiting
    pub fn try_next(&mut self) -> Option<BackSignal> {
        loop {
            match self.receiver.try_recv() {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Back signals dropped while wizard was busy");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next signal; `None` once the source is gone
    pub async fn next(&mut self) -> Option<BackSignal> {
        loop {
            match self.receiver.recv().await {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Back signals dropped while wizard was busy");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Back signal source closed");
                    return None;
                }
            }
        }
    }
}

/// Every collaborator a wizard session talks to
#[derive(Clone)]
pub struct WizardServices {
    pub draft: Arc<dyn DraftItemService>,
    pub profile: Arc<dyn ProfileService>,
    pub session: Arc<dyn SessionRegistry>,
    pub navigation_context: Arc<dyn NavigationContext>,
    pub navigator: Arc<dyn Navigator>,
    pub modals: Arc<dyn ModalStack>,
    pub platform: Arc<dyn Platform>,
    pub slides: Arc<dyn SlideView>,
    pub progress: Arc<dyn ProgressIndicator>,
    pub notifier: Arc<dyn Notifier>,
    pub analytics: Arc<dyn Analytics>,
}
