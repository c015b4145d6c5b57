use crate::{
    components::{TextInput, TextInputBuilder},
    error::ModalError,
    interaction::Interaction,
};
use indexmap::IndexMap;
use std::{fmt, sync::Arc, time::Duration};
use tokio::task::JoinHandle;

pub mod store;

/// Discord rejects modals with more than five rows.
pub const MAX_FIELDS: usize = 5;

/// Interactions have to be answered within three seconds.
pub const DEFAULT_DEFER_DEADLINE: Duration = Duration::from_secs(3);

pub type DeferErrorHook = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;

#[async_trait::async_trait]
pub trait ModalHandler: Send + Sync {
    /// Called once the submitted values have been written into the modal's fields.
    async fn callback(
        &self,
        _modal: &Modal,
        _interaction: &dyn Interaction,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

pub struct NoopHandler;

impl ModalHandler for NoopHandler {}

pub struct Modal {
    pub title: String,
    pub custom_id: String,

    fields: IndexMap<String, Arc<TextInput>>,

    handler: Arc<dyn ModalHandler>,
    defer_deadline: Option<Duration>,
    defer_error_hook: Option<DeferErrorHook>,
}

impl Modal {
    pub fn new(
        title: impl Into<String>,
        fields: Vec<TextInput>,
        custom_id: Option<String>,
    ) -> Result<Self, ModalError> {
        let fields = fields
            .into_iter()
            .map(|field| (field.custom_id().to_string(), Arc::new(field)))
            .collect::<IndexMap<_, _>>();

        if fields.len() > MAX_FIELDS {
            return Err(ModalError::TooManyFields {
                max: MAX_FIELDS,
                got: fields.len(),
            });
        }

        Ok(Self {
            title: title.into(),
            custom_id: custom_id.unwrap_or_else(crate::utils::random_custom_id),
            fields,
            handler: Arc::new(NoopHandler),
            defer_deadline: None,
            defer_error_hook: None,
        })
    }

    pub fn with_handler(mut self, handler: impl ModalHandler + 'static) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    pub fn with_defer_deadline(mut self, deadline: Duration) -> Self {
        self.defer_deadline = Some(deadline);
        self
    }

    /// The deadline after which an unanswered submission is no longer deferred.
    #[inline]
    pub fn defer_deadline(&self) -> Duration {
        self.defer_deadline.unwrap_or(DEFAULT_DEFER_DEADLINE)
    }

    /// Receives the errors of the fallback acknowledgment, which are otherwise dropped.
    pub fn with_defer_error_hook(
        mut self,
        hook: impl Fn(&anyhow::Error) + Send + Sync + 'static,
    ) -> Self {
        self.defer_error_hook = Some(Arc::new(hook));
        self
    }

    #[inline]
    pub fn fields(&self) -> Vec<Arc<TextInput>> {
        self.fields.values().cloned().collect()
    }

    #[inline]
    pub fn field(&self, custom_id: &str) -> Option<&Arc<TextInput>> {
        self.fields.get(custom_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn add_field(&mut self, builder: TextInputBuilder) -> Result<Arc<TextInput>, ModalError> {
        if self.fields.len() >= MAX_FIELDS {
            return Err(ModalError::FieldLimitReached { max: MAX_FIELDS });
        }

        let field = Arc::new(builder.build());
        self.fields
            .insert(field.custom_id().to_string(), field.clone());

        Ok(field)
    }

    pub fn remove_field_at(&mut self, index: usize) -> Result<(), ModalError> {
        let len = self.fields.len();

        match self.fields.shift_remove_index(index) {
            Some(_) => Ok(()),
            None => Err(ModalError::FieldIndexOutOfRange { index, len }),
        }
    }

    /// Writes the submitted values into the fields and spawns the handler.
    ///
    /// Returns immediately; the callback's outcome is reported through the
    /// returned handle. Must be called from within a tokio runtime.
    pub fn dispatch(
        self: &Arc<Self>,
        interaction: Arc<dyn Interaction>,
    ) -> JoinHandle<Result<(), anyhow::Error>> {
        for component in interaction.data().submitted() {
            match self.fields.get(&component.custom_id) {
                Some(field) => field.set_value(component.value.as_str()),
                None => tracing::debug!(
                    modal = %self.custom_id,
                    field = %component.custom_id,
                    "ignoring submitted value for unknown field"
                ),
            }
        }

        let modal = Arc::clone(self);
        tokio::spawn(async move { modal.handle(interaction.as_ref()).await })
    }

    async fn handle(&self, interaction: &dyn Interaction) -> Result<(), anyhow::Error> {
        let start = tokio::time::Instant::now();

        self.handler.callback(self, interaction).await?;

        if !interaction.is_done() && start.elapsed() < self.defer_deadline() {
            tracing::debug!(modal = %self.custom_id, "callback did not respond, deferring");

            if let Err(err) = interaction.defer().await
                && let Some(hook) = &self.defer_error_hook
            {
                hook(&err);
            }
        }

        Ok(())
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "custom_id": self.custom_id,
            "components": self
                .fields
                .values()
                .map(|field| crate::components::action_row(field.to_value()))
                .collect::<Vec<_>>(),
        })
    }
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("title", &self.title)
            .field("custom_id", &self.custom_id)
            .field("fields", &self.fields)
            .field("defer_deadline", &self.defer_deadline())
            .finish_non_exhaustive()
    }
}
