use serde::{Deserialize, Deserializer};

/// The submission payload of a modal, as delivered by the gateway.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalSubmitData {
    pub custom_id: String,
    #[serde(default)]
    pub components: Vec<SubmittedRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmittedRow {
    #[serde(default)]
    pub components: Vec<SubmittedComponent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmittedComponent {
    pub custom_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ModalSubmitData {
    /// The first component of every row, in submission order.
    pub fn submitted(&self) -> impl Iterator<Item = &SubmittedComponent> {
        self.components.iter().filter_map(|row| row.components.first())
    }
}

/// The live request/response channel of a modal submission.
#[async_trait::async_trait]
pub trait Interaction: Send + Sync {
    fn data(&self) -> &ModalSubmitData;

    /// Whether a response has already been sent for this interaction.
    fn is_done(&self) -> bool;

    async fn defer(&self) -> Result<(), anyhow::Error>;

    async fn send_message(&self, content: &str, ephemeral: bool) -> Result<(), anyhow::Error>;
}
