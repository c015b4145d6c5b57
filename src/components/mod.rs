mod text_input;

pub use text_input::{TextInput, TextInputBuilder, TextInputStyle};

pub const ACTION_ROW_TYPE: u8 = 1;
pub const TEXT_INPUT_TYPE: u8 = 4;

/// Wraps a single component payload in an action row.
pub fn action_row(component: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": ACTION_ROW_TYPE,
        "components": [component],
    })
}
