use serde_json::{Map, Value, json};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextInputStyle {
    /// Single line input.
    #[default]
    Short,
    /// Multi line input.
    Paragraph,
}

impl TextInputStyle {
    #[inline]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Short => 1,
            Self::Paragraph => 2,
        }
    }
}

/// A single text input field of a modal.
///
/// The value is shared: handles returned by [`crate::Modal::add_field`] observe
/// the text written when the modal is submitted.
#[derive(Debug)]
pub struct TextInput {
    custom_id: String,
    label: String,
    style: TextInputStyle,
    placeholder: Option<String>,
    min_length: Option<u16>,
    max_length: Option<u16>,
    required: bool,

    value: RwLock<Option<String>>,
}

impl TextInput {
    #[inline]
    pub fn builder(label: impl Into<String>) -> TextInputBuilder {
        TextInputBuilder::new(label)
    }

    #[inline]
    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn style(&self) -> TextInputStyle {
        self.style
    }

    #[inline]
    pub fn required(&self) -> bool {
        self.required
    }

    /// The prefilled value before submission, the submitted text afterwards.
    pub fn value(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value.into());
    }

    pub fn to_value(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("type".into(), json!(super::TEXT_INPUT_TYPE));
        payload.insert("custom_id".into(), json!(self.custom_id));
        payload.insert("label".into(), json!(self.label));
        payload.insert("style".into(), json!(self.style.as_u8()));
        payload.insert("required".into(), json!(self.required));

        if let Some(placeholder) = &self.placeholder {
            payload.insert("placeholder".into(), json!(placeholder));
        }
        if let Some(min_length) = self.min_length {
            payload.insert("min_length".into(), json!(min_length));
        }
        if let Some(max_length) = self.max_length {
            payload.insert("max_length".into(), json!(max_length));
        }
        if let Some(value) = self.value() {
            payload.insert("value".into(), json!(value));
        }

        Value::Object(payload)
    }
}

#[derive(Debug, Clone)]
pub struct TextInputBuilder {
    custom_id: Option<String>,
    label: String,
    style: TextInputStyle,
    placeholder: Option<String>,
    min_length: Option<u16>,
    max_length: Option<u16>,
    required: bool,
    value: Option<String>,
}

impl TextInputBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            custom_id: None,
            label: label.into(),
            style: TextInputStyle::default(),
            placeholder: None,
            min_length: None,
            max_length: None,
            required: true,
            value: None,
        }
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn style(mut self, style: TextInputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Prefilled text shown when the modal opens.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn build(self) -> TextInput {
        TextInput {
            custom_id: self
                .custom_id
                .unwrap_or_else(crate::utils::random_custom_id),
            label: self.label,
            style: self.style,
            placeholder: self.placeholder,
            min_length: self.min_length,
            max_length: self.max_length,
            required: self.required,
            value: RwLock::new(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_payload_omits_unset_options() {
        let input = TextInputBuilder::new("One-line Summary")
            .custom_id("summary")
            .build();

        assert_eq!(
            input.to_value(),
            json!({
                "type": 4,
                "custom_id": "summary",
                "label": "One-line Summary",
                "style": 1,
                "required": true,
            })
        );
    }

    #[test]
    fn paragraph_payload_carries_every_option() {
        let input = TextInputBuilder::new("Description")
            .custom_id("description")
            .style(TextInputStyle::Paragraph)
            .placeholder("Enter a detailed description...")
            .min_length(10)
            .max_length(1024)
            .required(false)
            .value("prefilled")
            .build();

        assert_eq!(
            input.to_value(),
            json!({
                "type": 4,
                "custom_id": "description",
                "label": "Description",
                "style": 2,
                "required": false,
                "placeholder": "Enter a detailed description...",
                "min_length": 10,
                "max_length": 1024,
                "value": "prefilled",
            })
        );
    }

    #[test]
    fn custom_id_is_generated_when_missing() {
        let input = TextInput::builder("Summary").build();

        assert_eq!(input.custom_id().len(), 32);
        assert_eq!(input.value(), None);
    }

    #[test]
    fn set_value_replaces_prefilled_value() {
        let input = TextInput::builder("Summary").value("draft").build();
        input.set_value("Bug");

        assert_eq!(input.value().as_deref(), Some("Bug"));
    }
}
