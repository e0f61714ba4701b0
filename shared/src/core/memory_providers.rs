//! In-memory collaborators
//!
//! Implementations of every collaborator trait that keep their data in
//! memory and append each call to a shared [`CallLog`], so the order of
//! side effects across collaborators can be inspected. Used by the test
//! suites and by the simulator binary.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::core::errors::{ServiceError, ServiceResult};
use crate::core::providers::{
    Analytics, BackSignalSource, BackSubscription, DraftItemService, ModalStack, NavigationContext,
    Navigator, Notifier, Platform, ProfileService, ProgressIndicator, SessionRegistry, SlideView,
    WizardServices,
};
use crate::models::{Item, ItemCategory, User};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered record of collaborator calls, shared by all in-memory services
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        lock(&self.entries).push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }

    /// Number of entries equal to `entry`
    pub fn count(&self, entry: &str) -> usize {
        lock(&self.entries).iter().filter(|e| *e == entry).count()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.count(entry) > 0
    }

    /// Index of the first entry equal to `entry`
    pub fn position(&self, entry: &str) -> Option<usize> {
        lock(&self.entries).iter().position(|e| e == entry)
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

/// Draft service holding the draft in memory
#[derive(Debug)]
pub struct InMemoryDraftService {
    log: CallLog,
    item: Mutex<Item>,
    edit_mode: bool,
    done: Mutex<bool>,
    photo_recovery: Mutex<bool>,
    save_failure: Mutex<Option<ServiceError>>,
}

impl InMemoryDraftService {
    pub fn new(log: CallLog, item: Item) -> Self {
        Self {
            log,
            item: Mutex::new(item),
            edit_mode: false,
            done: Mutex::new(false),
            photo_recovery: Mutex::new(false),
            save_failure: Mutex::new(None),
        }
    }

    pub fn with_edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = edit_mode;
        self
    }

    pub fn with_photo_recovery(self) -> Self {
        *lock(&self.photo_recovery) = true;
        self
    }

    /// Make every following save fail with `error`
    pub fn fail_saves_with(&self, error: ServiceError) {
        *lock(&self.save_failure) = Some(error);
    }

    pub fn clear_failure(&self) {
        *lock(&self.save_failure) = None;
    }

    /// Change the draft's category, as a category step would
    pub fn set_category(&self, type_name: &str) {
        lock(&self.item).category = Some(ItemCategory::new(type_name));
    }

    /// Clear the recovery marker, as the photo step does after reopening the picker
    pub fn clear_photo_recovery(&self) {
        *lock(&self.photo_recovery) = false;
    }
}

#[async_trait]
impl DraftItemService for InMemoryDraftService {
    fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    fn is_session_done(&self) -> bool {
        *lock(&self.done)
    }

    fn has_pending_photo_recovery(&self) -> bool {
        *lock(&self.photo_recovery)
    }

    fn draft_item(&self) -> Item {
        lock(&self.item).clone()
    }

    async fn save_draft_item(&self) -> ServiceResult<Item> {
        self.log.record("draft.save");

        if let Some(error) = lock(&self.save_failure).clone() {
            return Err(error);
        }

        let saved = {
            let mut item = lock(&self.item);
            if item.id.is_none() {
                item.id = Some(uuid::Uuid::new_v4().to_string());
            }
            item.clone()
        };
        *lock(&self.done) = true;
        Ok(saved)
    }
}

/// Profile service that "saves" by clearing the modified flag
#[derive(Debug)]
pub struct InMemoryProfileService {
    log: CallLog,
    failure: Mutex<Option<ServiceError>>,
}

impl InMemoryProfileService {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            failure: Mutex::new(None),
        }
    }

    pub fn fail_saves_with(&self, error: ServiceError) {
        *lock(&self.failure) = Some(error);
    }

    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }
}

#[async_trait]
impl ProfileService for InMemoryProfileService {
    async fn save_if_modified(&self, user: &User) -> ServiceResult<User> {
        if !user.modified {
            self.log.record("profile.unchanged");
            return Ok(user.clone());
        }

        self.log.record("profile.save");
        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }

        let mut saved = user.clone();
        saved.modified = false;
        if saved.id.is_none() {
            saved.id = Some(uuid::Uuid::new_v4().to_string());
        }
        Ok(saved)
    }
}

/// Application session with a fixed signed-in user
#[derive(Debug)]
pub struct InMemorySession {
    log: CallLog,
    user: Mutex<User>,
    selected_item: Mutex<Option<Item>>,
}

impl InMemorySession {
    pub fn new(log: CallLog, user: User) -> Self {
        Self {
            log,
            user: Mutex::new(user),
            selected_item: Mutex::new(None),
        }
    }

    pub fn selected_item(&self) -> Option<Item> {
        lock(&self.selected_item).clone()
    }
}

impl SessionRegistry for InMemorySession {
    fn current_user(&self) -> User {
        lock(&self.user).clone()
    }

    fn set_selected_item(&self, item: Item) {
        self.log.record("session.selected_item");
        *lock(&self.selected_item) = Some(item);
    }
}

/// Navigation history, navigation parameters and modal stack in one place
#[derive(Debug)]
pub struct InMemoryNavigator {
    log: CallLog,
    path: Mutex<Option<String>>,
    first_choice: Mutex<bool>,
    modal_presented: Mutex<bool>,
}

impl InMemoryNavigator {
    pub fn new(log: CallLog, path: impl Into<String>) -> Self {
        Self {
            log,
            path: Mutex::new(Some(path.into())),
            first_choice: Mutex::new(false),
            modal_presented: Mutex::new(false),
        }
    }

    pub fn with_first_choice(self, first_choice: bool) -> Self {
        *lock(&self.first_choice) = first_choice;
        self
    }

    pub fn set_path(&self, path: impl Into<String>) {
        *lock(&self.path) = Some(path.into());
    }

    pub fn set_modal_presented(&self, presented: bool) {
        *lock(&self.modal_presented) = presented;
    }

    pub fn first_choice(&self) -> bool {
        *lock(&self.first_choice)
    }
}

#[async_trait]
impl NavigationContext for InMemoryNavigator {
    async fn is_first_choice(&self) -> bool {
        *lock(&self.first_choice)
    }

    async fn clear_first_choice(&self) {
        self.log.record("navigation.clear_first_choice");
        *lock(&self.first_choice) = false;
    }
}

#[async_trait]
impl Navigator for InMemoryNavigator {
    fn current_path(&self) -> Option<String> {
        lock(&self.path).clone()
    }

    async fn navigate_root(&self, route: &str) {
        self.log.record(format!("navigation.root:{route}"));
        *lock(&self.path) = Some(route.to_string());
    }

    async fn back(&self) {
        self.log.record("navigation.back");
    }
}

#[async_trait]
impl ModalStack for InMemoryNavigator {
    async fn topmost_modal_presented(&self) -> bool {
        *lock(&self.modal_presented)
    }
}

/// Platform that is always ready and exposes its back-signal source
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    log: CallLog,
    signals: BackSignalSource,
}

impl InMemoryPlatform {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            signals: BackSignalSource::default(),
        }
    }

    pub fn signals(&self) -> &BackSignalSource {
        &self.signals
    }
}

#[async_trait]
impl Platform for InMemoryPlatform {
    async fn ready(&self) {
        self.log.record("platform.ready");
    }

    fn subscribe_back(&self) -> BackSubscription {
        self.log.record("platform.subscribe_back");
        self.signals.subscribe()
    }
}

/// Slide view tracking only its visible index
#[derive(Debug, Default)]
pub struct InMemorySlideView {
    log: CallLog,
    index: Mutex<usize>,
}

impl InMemorySlideView {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            index: Mutex::new(0),
        }
    }

    pub fn index(&self) -> usize {
        *lock(&self.index)
    }
}

#[async_trait]
impl SlideView for InMemorySlideView {
    async fn update(&self) {
        self.log.record("slides.update");
    }

    async fn slide_to(&self, index: usize) {
        self.log.record(format!("slides.slide_to:{index}"));
        *lock(&self.index) = index;
    }

    async fn slide_next(&self) {
        self.log.record("slides.next");
        *lock(&self.index) += 1;
    }

    async fn slide_prev(&self) {
        self.log.record("slides.prev");
        let mut index = lock(&self.index);
        *index = index.saturating_sub(1);
    }
}

/// Progress indicator counting presents and dismisses
#[derive(Debug, Default)]
pub struct InMemoryProgress {
    log: CallLog,
}

impl InMemoryProgress {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }

    pub fn presented_count(&self) -> usize {
        self.log.count("progress.present")
    }

    pub fn dismissed_count(&self) -> usize {
        self.log.count("progress.dismiss")
    }

    pub fn is_presented(&self) -> bool {
        self.presented_count() > self.dismissed_count()
    }
}

#[async_trait]
impl ProgressIndicator for InMemoryProgress {
    async fn present(&self) {
        self.log.record("progress.present");
    }

    async fn dismiss(&self) {
        self.log.record("progress.dismiss");
    }
}

/// Records messages and tracking calls
#[derive(Debug, Default)]
pub struct InMemoryFeedback {
    log: CallLog,
}

impl InMemoryFeedback {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl Notifier for InMemoryFeedback {
    fn error_message(&self, key: &str) {
        self.log.record(format!("notifier.error:{key}"));
    }
}

impl Analytics for InMemoryFeedback {
    fn track_view(&self, view: &str) {
        self.log.record(format!("analytics.view:{view}"));
    }

    fn track_event(&self, category: &str, action: &str) {
        self.log.record(format!("analytics.event:{category}/{action}"));
    }
}

/// A full set of in-memory collaborators sharing one call log
#[derive(Debug, Clone)]
pub struct InMemoryServices {
    pub log: CallLog,
    pub draft: Arc<InMemoryDraftService>,
    pub profile: Arc<InMemoryProfileService>,
    pub session: Arc<InMemorySession>,
    pub navigator: Arc<InMemoryNavigator>,
    pub platform: Arc<InMemoryPlatform>,
    pub slides: Arc<InMemorySlideView>,
    pub progress: Arc<InMemoryProgress>,
    pub feedback: Arc<InMemoryFeedback>,
}

/// Options for building [`InMemoryServices`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryOptions {
    pub item: Item,
    pub user: User,
    pub edit_mode: bool,
    pub first_choice: bool,
    pub photo_recovery: bool,
    pub wizard_path: String,
}

impl InMemoryServices {
    pub fn new(options: InMemoryOptions) -> Self {
        let log = CallLog::new();

        let mut draft =
            InMemoryDraftService::new(log.clone(), options.item).with_edit_mode(options.edit_mode);
        if options.photo_recovery {
            draft = draft.with_photo_recovery();
        }

        let path = if options.wizard_path.is_empty() {
            "/new-ad".to_string()
        } else {
            options.wizard_path
        };

        Self {
            draft: Arc::new(draft),
            profile: Arc::new(InMemoryProfileService::new(log.clone())),
            session: Arc::new(InMemorySession::new(log.clone(), options.user)),
            navigator: Arc::new(
                InMemoryNavigator::new(log.clone(), path).with_first_choice(options.first_choice),
            ),
            platform: Arc::new(InMemoryPlatform::new(log.clone())),
            slides: Arc::new(InMemorySlideView::new(log.clone())),
            progress: Arc::new(InMemoryProgress::new(log.clone())),
            feedback: Arc::new(InMemoryFeedback::new(log.clone())),
            log,
        }
    }

    /// Collaborator bundle for a wizard controller
    pub fn services(&self) -> WizardServices {
        WizardServices {
            draft: self.draft.clone(),
            profile: self.profile.clone(),
            session: self.session.clone(),
            navigation_context: self.navigator.clone(),
            navigator: self.navigator.clone(),
            modals: self.navigator.clone(),
            platform: self.platform.clone(),
            slides: self.slides.clone(),
            progress: self.progress.clone(),
            notifier: self.feedback.clone(),
            analytics: self.feedback.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_ordering() {
        let log = CallLog::new();
        log.record("a");
        log.record("b");
        log.record("a");

        assert_eq!(log.count("a"), 2);
        assert_eq!(log.position("b"), Some(1));
        assert!(!log.contains("c"));

        log.clear();
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_draft_save_assigns_id_and_marks_done() {
        let log = CallLog::new();
        let draft = InMemoryDraftService::new(log.clone(), Item::with_category("share"));
        assert!(!draft.is_session_done());

        let saved = draft.save_draft_item().await.unwrap();
        assert!(saved.is_saved());
        assert!(draft.is_session_done());
        assert_eq!(log.entries(), vec!["draft.save"]);
    }

    #[tokio::test]
    async fn test_draft_save_failure() {
        let draft = InMemoryDraftService::new(CallLog::new(), Item::new());
        draft.fail_saves_with(ServiceError::new("offline"));

        assert_eq!(
            draft.save_draft_item().await,
            Err(ServiceError::new("offline"))
        );
        assert!(!draft.is_session_done());
    }

    #[tokio::test]
    async fn test_profile_only_saves_modified_users() {
        let log = CallLog::new();
        let profile = InMemoryProfileService::new(log.clone());

        let unchanged = User::new("Ada");
        assert_eq!(profile.save_if_modified(&unchanged).await.unwrap(), unchanged);

        let mut modified = User::new("Ada");
        modified.modified = true;
        let saved = profile.save_if_modified(&modified).await.unwrap();
        assert!(!saved.modified);
        assert!(saved.id.is_some());

        assert_eq!(log.entries(), vec!["profile.unchanged", "profile.save"]);
    }

    #[tokio::test]
    async fn test_services_share_one_log() {
        let services = InMemoryServices::new(InMemoryOptions::default());
        let bundle = services.services();

        bundle.progress.present().await;
        bundle.slides.update().await;
        bundle.analytics.track_view("new_ad");

        assert_eq!(
            services.log.entries(),
            vec!["progress.present", "slides.update", "analytics.view:new_ad"]
        );
        assert!(services.progress.is_presented());
        assert_eq!(bundle.navigator.current_path().as_deref(), Some("/new-ad"));
    }
}
