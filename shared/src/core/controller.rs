//! Wizard session controller
//!
//! Owns the [`WizardState`] of one editing or creation session and wires
//! the sequencer, the back-navigation reconciler and the publish pipeline
//! to the host's collaborators. The host forwards its view lifecycle hooks,
//! step-completion events and back signals here.

use tracing::{debug, info, warn};

use crate::config::WizardConfig;
use crate::core::back_navigation::{self, BackAction, BackContext};
use crate::core::classifier::classify;
use crate::core::errors::PublishOutcome;
use crate::core::providers::{BackSubscription, WizardServices};
use crate::core::publish::PublishPipeline;
use crate::core::sequencer::{Sequencer, Transition};
use crate::core::state::WizardState;
use crate::core::types::{EntryKind, ItemVariant, StepId, WizardMode};
use crate::models::Item;

pub struct WizardController {
    services: WizardServices,
    config: WizardConfig,
    state: WizardState,
    back_subscription: Option<BackSubscription>,
}

impl WizardController {
    /// Start a session; the mode comes from the draft service
    pub fn new(services: WizardServices, config: WizardConfig) -> Self {
        let mode = WizardMode::from_edit_flag(services.draft.is_edit_mode());
        debug!(?mode, "Wizard session created");
        Self {
            services,
            config,
            state: WizardState::new(mode),
            back_subscription: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn is_edit_mode(&self) -> bool {
        self.state.is_edit()
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Variant of the current draft
    pub fn variant(&self) -> ItemVariant {
        classify(&self.services.draft.draft_item())
    }

    /// Slides the view should render
    pub fn visible_steps(&self) -> Vec<StepId> {
        self.state.steps().visible_steps()
    }

    /// Step on the slide the user is looking at
    pub fn current_step(&self) -> Option<StepId> {
        self.state.steps().step_at(self.state.current_step_index())
    }

    /// Whether a back-signal subscription is held
    pub fn is_listening(&self) -> bool {
        self.back_subscription.is_some()
    }

    /// Consume the recovered-photo marker on behalf of the photo step
    pub fn take_recovered_photo(&mut self) -> bool {
        self.state.take_recovered_photo()
    }

    /// View is about to appear: read where the user came from
    pub async fn will_enter(&mut self) {
        let first_choice = self.services.navigation_context.is_first_choice().await;
        self.state.set_first_choice_entry(first_choice);
        debug!(first_choice, "Wizard will enter");
    }

    /// View appeared
    ///
    /// Acquires the back-signal subscription for this visible lifetime,
    /// then decides whether this is a normal entry, a resume after a forced
    /// restart, or a return to an already published session.
    pub async fn did_enter(&mut self) -> EntryKind {
        if self.back_subscription.is_none() {
            self.services.platform.ready().await;
            self.back_subscription = Some(self.services.platform.subscribe_back());
            debug!("Back signal listener attached");
        }

        if self.services.draft.is_session_done() {
            self.state.mark_done();
            debug!("Entered a session that is already done");
            return EntryKind::AlreadyDone;
        }

        if self.services.draft.has_pending_photo_recovery() {
            let index = self.config.recovery.index_for(self.state.mode());
            let variant = self.variant();
            Sequencer::resume_recovery(&mut self.state, index, variant);
            self.services.slides.slide_to(index).await;
            return EntryKind::Recovered { index };
        }

        let view = self.config.analytics.entry_view(self.state.mode());
        self.services.analytics.track_view(view);
        info!(view, "Wizard entered");
        EntryKind::Fresh
    }

    /// View left: release the back-signal subscription
    pub fn did_leave(&mut self) {
        if self.back_subscription.take().is_some() {
            debug!("Back signal listener released");
        }
    }

    /// A step reported completion
    pub async fn complete_step(&mut self, step: StepId) -> Transition {
        let variant = self.variant();
        let transition = Sequencer::complete_step(&mut self.state, step, variant);
        if transition.refresh {
            self.services.slides.update().await;
        }
        transition
    }

    /// The slide view settled on a new slide after a user swipe
    ///
    /// Returns `false`, keeping the current index, when `index` is not a
    /// mounted slide.
    pub fn slide_changed(&mut self, index: usize) -> bool {
        let from = self.state.current_step_index();
        if !self.state.set_step_index(index) {
            warn!(
                index,
                slides = self.state.steps().active_count(),
                "Ignoring slide change past the last mounted slide"
            );
            return false;
        }
        if index != from {
            debug!(from, to = index, "Active slide changed");
        }
        true
    }

    /// Handle one back signal
    pub async fn handle_back_signal(&mut self) -> BackAction {
        let modal_presented = self.services.modals.topmost_modal_presented().await;
        let current_path = self.services.navigator.current_path();
        let context = BackContext {
            modal_presented,
            current_path: current_path.as_deref(),
            wizard_route: &self.config.routes.wizard,
        };

        let action = back_navigation::reconcile(&self.state, &context);
        back_navigation::apply(&mut self.state, action);

        match action {
            BackAction::Consumed => {}
            BackAction::PreviousStep { .. } => self.services.slides.slide_prev().await,
            BackAction::ExitToFallback => {
                self.services.navigation_context.clear_first_choice().await;
                self.services
                    .navigator
                    .navigate_root(&self.config.routes.fallback)
                    .await;
            }
            BackAction::PlatformBack => self.services.navigator.back().await,
        }
        action
    }

    /// Reconcile every back signal queued since the last call
    pub async fn process_pending_back_signals(&mut self) -> Vec<BackAction> {
        let mut actions = Vec::new();
        while self
            .back_subscription
            .as_mut()
            .and_then(BackSubscription::try_next)
            .is_some()
        {
            actions.push(self.handle_back_signal().await);
        }
        actions
    }

    /// Wait for the next back signal and reconcile it
    ///
    /// Returns `None` when no subscription is held or the source closed.
    pub async fn next_back_signal(&mut self) -> Option<BackAction> {
        let signal = match self.back_subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => None,
        };
        signal?;
        Some(self.handle_back_signal().await)
    }

    /// Publish the draft
    ///
    /// Taking `&mut self` keeps publishes single-flight per session.
    pub async fn publish(&mut self) -> PublishOutcome<Item> {
        PublishPipeline::new(&self.services, &self.config)
            .run(&mut self.state)
            .await
    }

    /// Open the published item's detail page as the new navigation root
    ///
    /// Returns `false`, without navigating, until the session is done.
    pub async fn view_published_item(&mut self) -> bool {
        if !self.state.is_done() {
            warn!("Item detail requested before publish completed");
            return false;
        }
        self.services
            .navigator
            .navigate_root(&self.config.routes.item_detail)
            .await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory_providers::{InMemoryOptions, InMemoryServices};

    fn controller(options: InMemoryOptions) -> (InMemoryServices, WizardController) {
        let services = InMemoryServices::new(options);
        let controller = WizardController::new(services.services(), WizardConfig::default());
        (services, controller)
    }

    #[tokio::test]
    async fn test_fresh_entry_tracks_view() {
        let (services, mut wizard) = controller(InMemoryOptions::default());

        wizard.will_enter().await;
        assert_eq!(wizard.did_enter().await, EntryKind::Fresh);

        assert!(wizard.is_listening());
        assert!(services.log.contains("analytics.view:new_ad"));
        assert!(services.log.position("platform.ready") < services.log.position("platform.subscribe_back"));
    }

    #[tokio::test]
    async fn test_reentry_does_not_duplicate_listener() {
        let (services, mut wizard) = controller(InMemoryOptions::default());

        wizard.did_enter().await;
        wizard.did_enter().await;
        assert_eq!(services.platform.signals().listener_count(), 1);

        wizard.did_leave();
        assert_eq!(services.platform.signals().listener_count(), 0);

        wizard.did_enter().await;
        assert_eq!(services.platform.signals().listener_count(), 1);

        drop(wizard);
        assert_eq!(services.platform.signals().listener_count(), 0);
    }

    #[tokio::test]
    async fn test_recovery_entry_skips_tracking() {
        let (services, mut wizard) = controller(InMemoryOptions {
            edit_mode: true,
            photo_recovery: true,
            ..InMemoryOptions::default()
        });

        assert_eq!(wizard.did_enter().await, EntryKind::Recovered { index: 1 });
        assert_eq!(wizard.state().current_step_index(), 1);
        assert_eq!(wizard.visible_steps(), vec![StepId::Photos, StepId::Price]);
        assert!(wizard.state().has_pending_recovered_photo());
        assert_eq!(services.slides.index(), 1);
        assert!(!services.log.entries().iter().any(|e| e.starts_with("analytics.view")));

        assert!(wizard.take_recovered_photo());
        assert!(!wizard.state().has_pending_recovered_photo());
    }

    #[tokio::test]
    async fn test_complete_step_refreshes_view() {
        let (services, mut wizard) = controller(InMemoryOptions {
            item: Item::with_category("flat"),
            ..InMemoryOptions::default()
        });

        wizard.complete_step(StepId::Photos).await;
        let transition = wizard.complete_step(StepId::Price).await;

        assert_eq!(transition.activated, Some(StepId::Appointment));
        assert_eq!(services.log.count("slides.update"), 2);
        assert_eq!(
            wizard.visible_steps(),
            vec![StepId::Photos, StepId::Price, StepId::Appointment]
        );
    }

    #[tokio::test]
    async fn test_back_signals_are_pumped() {
        let (services, mut wizard) = controller(InMemoryOptions {
            first_choice: true,
            ..InMemoryOptions::default()
        });
        wizard.will_enter().await;
        wizard.did_enter().await;

        services.platform.signals().emit();
        let actions = wizard.process_pending_back_signals().await;

        assert_eq!(actions, vec![BackAction::ExitToFallback]);
        assert!(!wizard.state().is_first_choice_entry());
        assert!(!services.navigator.first_choice());
        assert!(services.log.contains("navigation.root:/ads-next-appointments"));
    }

    #[tokio::test]
    async fn test_slide_changes_feed_back_navigation() {
        let (services, mut wizard) = controller(InMemoryOptions::default());
        wizard.did_enter().await;
        for step in [StepId::Photos, StepId::Price, StepId::Lifestyle] {
            wizard.complete_step(step).await;
        }

        assert!(!wizard.slide_changed(4));
        assert_eq!(wizard.state().current_step_index(), 0);

        assert!(wizard.slide_changed(3));
        assert_eq!(wizard.current_step(), Some(StepId::Attributes));
        assert_eq!(
            wizard.handle_back_signal().await,
            BackAction::PreviousStep { index: 2 }
        );
        assert_eq!(wizard.current_step(), Some(StepId::Lifestyle));
        assert!(services.log.contains("slides.prev"));

        services.navigator.set_modal_presented(true);
        assert_eq!(wizard.handle_back_signal().await, BackAction::Consumed);
        assert_eq!(wizard.state().current_step_index(), 2);
    }

    #[tokio::test]
    async fn test_no_listener_no_signals() {
        let (services, mut wizard) = controller(InMemoryOptions::default());
        services.platform.signals().emit();

        assert!(wizard.process_pending_back_signals().await.is_empty());
        assert_eq!(wizard.next_back_signal().await, None);
    }

    #[tokio::test]
    async fn test_view_published_item_requires_done() {
        let (services, mut wizard) = controller(InMemoryOptions::default());
        assert!(!wizard.view_published_item().await);

        wizard.publish().await.unwrap();
        assert!(wizard.view_published_item().await);
        assert!(services.log.contains("navigation.root:/ads-details"));
    }
}
