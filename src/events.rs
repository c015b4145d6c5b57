use crate::{
    error::ModalError,
    interaction::{Interaction, ModalSubmitData},
    modals::store::ModalStore,
};
use serenity::all::{
    CreateInteractionResponse, CreateInteractionResponseMessage, ModalInteraction,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A serenity modal submission, tracking whether it has been answered.
pub struct SerenityModalInteraction {
    http: Arc<serenity::http::Http>,
    interaction: ModalInteraction,
    data: ModalSubmitData,
    done: AtomicBool,
}

impl SerenityModalInteraction {
    pub fn new(
        http: Arc<serenity::http::Http>,
        interaction: ModalInteraction,
    ) -> Result<Self, ModalError> {
        let data = serde_json::from_value(serde_json::to_value(&interaction.data)?)?;

        Ok(Self {
            http,
            interaction,
            data,
            done: AtomicBool::new(false),
        })
    }

    #[inline]
    pub fn inner(&self) -> &ModalInteraction {
        &self.interaction
    }

    pub async fn respond(&self, response: CreateInteractionResponse) -> Result<(), anyhow::Error> {
        self.interaction
            .create_response(&self.http, response)
            .await?;
        self.done.store(true, Ordering::SeqCst);

        Ok(())
    }
}

#[async_trait::async_trait]
impl Interaction for SerenityModalInteraction {
    fn data(&self) -> &ModalSubmitData {
        &self.data
    }

    fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    async fn defer(&self) -> Result<(), anyhow::Error> {
        self.respond(CreateInteractionResponse::Acknowledge).await
    }

    async fn send_message(&self, content: &str, ephemeral: bool) -> Result<(), anyhow::Error> {
        self.respond(CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(ephemeral),
        ))
        .await
    }
}

/// Routes modal submissions from the gateway to the modals of a [`ModalStore`].
pub struct ModalEventHandler {
    pub store: Arc<ModalStore>,
}

#[async_trait::async_trait]
impl serenity::all::EventHandler for ModalEventHandler {
    async fn interaction_create(
        &self,
        ctx: serenity::all::Context,
        interaction: serenity::all::Interaction,
    ) {
        let serenity::all::Interaction::Modal(modal) = interaction else {
            return;
        };

        let interaction = match SerenityModalInteraction::new(ctx.http.clone(), modal) {
            Ok(interaction) => Arc::new(interaction),
            Err(err) => {
                tracing::error!("failed to read modal submission: {:#?}", err);
                return;
            }
        };

        let Some(handle) = self.store.dispatch(interaction) else {
            return;
        };

        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::error!("modal callback failed: {:#?}", err),
                Err(err) => tracing::error!("modal task panicked: {:#?}", err),
            }
        });
    }
}
