use super::Modal;
use crate::interaction::Interaction;
use serenity::all::InteractionId;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};

/// Interaction tokens, and with them unanswered modals, expire after 15 minutes.
pub const MODAL_LIFETIME: Duration = Duration::from_secs(15 * 60);

struct StoredModal {
    modal: Arc<Modal>,
    registered: Instant,
}

/// Modals that have been shown and are waiting for a submission.
///
/// Discord sends nothing when a modal is dismissed, so entries older than
/// [`MODAL_LIFETIME`] are dropped whenever the store is touched.
#[derive(Default)]
pub struct ModalStore {
    modals: Mutex<HashMap<String, StoredModal>>,
    defer_deadline: Option<Duration>,
}

impl ModalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deferral deadline applied to registered modals that do not set their own.
    pub fn with_defer_deadline(mut self, deadline: Duration) -> Self {
        self.defer_deadline = Some(deadline);
        self
    }

    pub fn from_env(env: &crate::env::Env) -> Self {
        Self::new().with_defer_deadline(env.defer_deadline)
    }

    #[inline]
    fn modals(&self) -> MutexGuard<'_, HashMap<String, StoredModal>> {
        self.modals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prune_locked(modals: &mut HashMap<String, StoredModal>) {
        modals.retain(|custom_id, stored| {
            let alive = stored.registered.elapsed() < MODAL_LIFETIME;
            if !alive {
                tracing::debug!(modal = %custom_id, "dropping expired modal");
            }

            alive
        });
    }

    /// Drops modals whose submission window has closed.
    pub fn prune(&self) {
        Self::prune_locked(&mut self.modals());
    }

    /// Registers a modal, replacing any modal with the same custom id.
    pub fn register(&self, mut modal: Modal) -> Arc<Modal> {
        if modal.defer_deadline.is_none() {
            modal.defer_deadline = self.defer_deadline;
        }

        let modal = Arc::new(modal);
        let mut modals = self.modals();
        Self::prune_locked(&mut modals);
        modals.insert(
            modal.custom_id.clone(),
            StoredModal {
                modal: modal.clone(),
                registered: Instant::now(),
            },
        );

        modal
    }

    pub fn remove(&self, custom_id: &str) -> Option<Arc<Modal>> {
        self.modals()
            .remove(custom_id)
            .map(|stored| stored.modal)
    }

    pub fn len(&self) -> usize {
        self.modals().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modals().is_empty()
    }

    /// Routes a submission to the modal it belongs to, which is forgotten afterwards.
    pub fn dispatch(
        &self,
        interaction: Arc<dyn Interaction>,
    ) -> Option<JoinHandle<Result<(), anyhow::Error>>> {
        let modal = {
            let mut modals = self.modals();
            Self::prune_locked(&mut modals);
            modals
                .remove(&interaction.data().custom_id)
                .map(|stored| stored.modal)
        };

        let Some(modal) = modal else {
            tracing::warn!(
                custom_id = %interaction.data().custom_id,
                "no modal found for submission"
            );
            return None;
        };

        Some(modal.dispatch(interaction))
    }

    /// Registers a modal and shows it in response to an interaction.
    ///
    /// The modal is registered before the response is sent so that a fast
    /// submission always finds it, and removed again if sending fails.
    pub async fn prompt(
        &self,
        http: &serenity::http::Http,
        interaction_id: InteractionId,
        interaction_token: &str,
        modal: Modal,
    ) -> Result<Arc<Modal>, anyhow::Error> {
        let modal = self.register(modal);

        if let Err(err) = http
            .create_interaction_response(
                interaction_id,
                interaction_token,
                &serde_json::json!({
                    "type": 9,
                    "data": modal.to_value(),
                }),
                Vec::new(),
            )
            .await
        {
            self.remove(&modal.custom_id);
            return Err(err.into());
        }

        tracing::debug!(modal = %modal.custom_id, "prompted modal");

        Ok(modal)
    }
}

impl std::fmt::Debug for ModalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalStore")
            .field("len", &self.len())
            .field("defer_deadline", &self.defer_deadline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{components::TextInputBuilder, interaction::ModalSubmitData};
    use serde_json::json;

    struct Submission(ModalSubmitData);

    #[async_trait::async_trait]
    impl Interaction for Submission {
        fn data(&self) -> &ModalSubmitData {
            &self.0
        }

        fn is_done(&self) -> bool {
            true
        }

        async fn defer(&self) -> Result<(), anyhow::Error> {
            Ok(())
        }

        async fn send_message(&self, _content: &str, _ephemeral: bool) -> Result<(), anyhow::Error> {
            Ok(())
        }
    }

    fn submission(custom_id: &str) -> Arc<dyn Interaction> {
        Arc::new(Submission(
            serde_json::from_value(json!({
                "custom_id": custom_id,
                "components": [
                    {"type": 1, "components": [{"custom_id": "summary", "value": "Bug"}]},
                ],
            }))
            .unwrap(),
        ))
    }

    #[tokio::test]
    async fn dispatch_routes_once_by_custom_id() {
        let store = ModalStore::new();
        let mut modal = Modal::new("Support Form", Vec::new(), Some("support".into())).unwrap();
        let summary = modal
            .add_field(TextInputBuilder::new("Summary").custom_id("summary"))
            .unwrap();
        store.register(modal);

        let handle = store.dispatch(submission("support")).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(summary.value().as_deref(), Some("Bug"));
        assert!(store.is_empty());
        assert!(store.dispatch(submission("support")).is_none());
    }

    #[tokio::test]
    async fn env_deadline_reaches_registered_modals() {
        let env = crate::env::Env::from_lookup(|key| {
            (key == "MODAL_DEFER_DEADLINE_MS").then(|| "100".to_string())
        })
        .unwrap();
        let store = ModalStore::from_env(&env);

        let inherited = store.register(Modal::new("Form", Vec::new(), None).unwrap());
        let own = store.register(
            Modal::new("Form", Vec::new(), None)
                .unwrap()
                .with_defer_deadline(Duration::from_secs(1)),
        );

        assert_eq!(inherited.defer_deadline(), Duration::from_millis(100));
        assert_eq!(own.defer_deadline(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn default_store_keeps_default_deadline() {
        let store = ModalStore::new();
        let modal = store.register(Modal::new("Form", Vec::new(), None).unwrap());

        assert_eq!(modal.defer_deadline(), crate::modals::DEFAULT_DEFER_DEADLINE);
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_modals_expire() {
        let store = ModalStore::new();
        for _ in 0..1000 {
            store.register(Modal::new("Form", Vec::new(), None).unwrap());
        }
        assert_eq!(store.len(), 1000);

        tokio::time::advance(MODAL_LIFETIME - Duration::from_secs(1)).await;
        store.prune();
        assert_eq!(store.len(), 1000);

        tokio::time::advance(Duration::from_secs(1)).await;
        store.register(Modal::new("Form", Vec::new(), Some("fresh".into())).unwrap());

        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_modal_does_not_receive_submission() {
        let store = ModalStore::new();
        store.register(Modal::new("Support Form", Vec::new(), Some("support".into())).unwrap());

        tokio::time::advance(MODAL_LIFETIME).await;

        assert!(store.dispatch(submission("support")).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn dispatch_ignores_unknown_modal() {
        let store = ModalStore::new();
        store.register(Modal::new("Form", Vec::new(), Some("known".into())).unwrap());

        assert!(store.dispatch(submission("unknown")).is_none());
        assert_eq!(store.len(), 1);
    }
}
