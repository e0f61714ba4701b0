//! Publish pipeline
//!
//! Saves the user's profile (when the profile service says it changed),
//! then the draft item, strictly one after the other: the item save relies
//! on the possibly updated user. The progress indicator is presented before
//! the first save and dismissed exactly once on every path out.
//!
//! A failure in either phase leaves the session where it was so the user
//! can retry; a retry runs both phases again. A profile that was saved
//! before the item save failed is not rolled back.

use tracing::{debug, error, info, warn};

use crate::config::WizardConfig;
use crate::core::errors::{PublishError, PublishOutcome};
use crate::core::providers::WizardServices;
use crate::core::sequencer::Sequencer;
use crate::core::state::WizardState;
use crate::core::types::PublishPhase;
use crate::models::Item;

/// One publish attempt over a session's collaborators
pub struct PublishPipeline<'a> {
    services: &'a WizardServices,
    config: &'a WizardConfig,
}

impl<'a> PublishPipeline<'a> {
    pub fn new(services: &'a WizardServices, config: &'a WizardConfig) -> Self {
        Self { services, config }
    }

    /// Run the pipeline against `state`
    ///
    /// On success the session is advanced to `Done`. On failure `state` is
    /// left exactly as it was and a generic error message is shown.
    pub async fn run(&self, state: &mut WizardState) -> PublishOutcome<Item> {
        if state.is_done() {
            warn!("Publish requested after the session was done");
            return Err(PublishError::SessionDone);
        }

        let mode = state.mode();
        let analytics = &self.config.analytics;
        self.services
            .analytics
            .track_event(&analytics.category, analytics.called_action(mode));

        state.set_publishing(true);
        self.services.progress.present().await;

        let result = self.persist().await;

        match result {
            Ok(saved) => {
                self.services.session.set_selected_item(saved.clone());

                let transition = Sequencer::advance_to_done(state);
                if transition.refresh {
                    self.services.slides.update().await;
                }

                self.services.progress.dismiss().await;
                state.set_publishing(false);

                if transition.advance {
                    self.services.slides.slide_next().await;
                }

                self.services
                    .analytics
                    .track_event(&analytics.category, analytics.done_action(mode));
                info!(item_id = ?saved.id, edit = mode.is_edit(), "Item published");
                Ok(saved)
            }
            Err(err) => {
                self.services.progress.dismiss().await;
                state.set_publishing(false);

                self.services
                    .notifier
                    .error_message(&self.config.messages.publish_failed);

                match err.phase() {
                    Some(PublishPhase::Profile) => {
                        error!(phase = %PublishPhase::Profile, "Profile save failed, item not saved: {}", err)
                    }
                    Some(PublishPhase::Item) => {
                        error!(phase = %PublishPhase::Item, "Item save failed: {}", err)
                    }
                    None => error!("Publish failed: {}", err),
                }

                self.services
                    .analytics
                    .track_event(&analytics.category, analytics.error_action(mode));
                Err(err)
            }
        }
    }

    async fn persist(&self) -> PublishOutcome<Item> {
        let user = self.services.session.current_user();

        let user = self
            .services
            .profile
            .save_if_modified(&user)
            .await
            .map_err(|source| PublishError::ProfileSave { source })?;
        debug!(user_id = ?user.id, "Profile up to date");

        self.services
            .draft
            .save_draft_item()
            .await
            .map_err(|source| PublishError::ItemSave { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ServiceError;
    use crate::core::memory_providers::{InMemoryOptions, InMemoryServices};
    use crate::core::sequencer::walked_state;
    use crate::core::types::{ItemVariant, StepId, WizardMode};
    use crate::models::User;
    use assert_matches::assert_matches;

    fn setup(edit_mode: bool) -> (InMemoryServices, WizardState) {
        let mut user = User::new("Ada");
        user.modified = true;
        let services = InMemoryServices::new(InMemoryOptions {
            item: Item::with_category("share"),
            user,
            edit_mode,
            ..InMemoryOptions::default()
        });
        // Sitting on the appointment slide, the last one before done
        let state = walked_state(WizardMode::from_edit_flag(edit_mode), ItemVariant::Share, 5);
        (services, state)
    }

    #[tokio::test]
    async fn test_success_advances_to_done() {
        let (services, mut state) = setup(false);
        let config = WizardConfig::default();
        let bundle = services.services();

        let outcome = PublishPipeline::new(&bundle, &config).run(&mut state).await;

        let saved = outcome.unwrap();
        assert!(saved.is_saved());
        assert!(state.is_done());
        assert!(!state.is_publishing());
        assert_eq!(state.current_step_index(), 5);
        assert_eq!(state.steps().step_at(5), Some(StepId::Done));
        assert_eq!(services.progress.presented_count(), 1);
        assert_eq!(services.progress.dismissed_count(), 1);
        assert_eq!(services.session.selected_item(), Some(saved));
        assert_eq!(
            services.log.entries(),
            vec![
                "analytics.event:ads_wizard/publish_called",
                "progress.present",
                "profile.save",
                "draft.save",
                "session.selected_item",
                "slides.update",
                "progress.dismiss",
                "slides.next",
                "analytics.event:ads_wizard/publish_done",
            ]
        );
    }

    #[tokio::test]
    async fn test_profile_failure_skips_item_save() {
        let (services, mut state) = setup(false);
        services
            .profile
            .fail_saves_with(ServiceError::new("profile rejected").with_status(409));
        let config = WizardConfig::default();
        let bundle = services.services();
        let before = state.clone();

        let outcome = PublishPipeline::new(&bundle, &config).run(&mut state).await;

        assert_matches!(outcome, Err(PublishError::ProfileSave { .. }));
        assert_eq!(state, before);
        assert!(!services.log.contains("draft.save"));
        assert_eq!(services.progress.dismissed_count(), 1);
        assert!(!services.progress.is_presented());
        assert!(services.log.contains("notifier.error:ERRORS.WIZARD.NOT_ADDED"));
        assert!(services.log.contains("analytics.event:ads_wizard/publish_error"));
    }

    #[tokio::test]
    async fn test_item_failure_in_edit_mode() {
        let (services, mut state) = setup(true);
        services.draft.fail_saves_with(ServiceError::new("timeout"));
        let config = WizardConfig::default();
        let bundle = services.services();
        let before = state.clone();

        let outcome = PublishPipeline::new(&bundle, &config).run(&mut state).await;

        assert_matches!(outcome, Err(PublishError::ItemSave { .. }));
        assert_eq!(state, before);
        assert!(services.log.position("profile.save") < services.log.position("draft.save"));
        assert_eq!(services.progress.dismissed_count(), 1);
        assert!(services.log.contains("analytics.event:ads_wizard/update_error"));
        assert!(!services.log.contains("session.selected_item"));
    }

    #[tokio::test]
    async fn test_done_session_is_rejected_without_indicator() {
        let (services, mut state) = setup(false);
        state.mark_done();
        let config = WizardConfig::default();
        let bundle = services.services();

        let outcome = PublishPipeline::new(&bundle, &config).run(&mut state).await;

        assert_eq!(outcome, Err(PublishError::SessionDone));
        assert!(services.log.entries().is_empty());
    }
}
