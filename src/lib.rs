//! Modal forms for serenity based Discord bots.
//!
//! A [`Modal`] holds up to five [`TextInput`] fields, serializes into the
//! payload Discord expects, and runs a [`ModalHandler`] once the user submits
//! it. Submissions that the handler leaves unanswered are acknowledged
//! automatically.

pub mod components;
pub mod env;
pub mod error;
pub mod events;
pub mod interaction;
pub mod modals;
mod utils;

pub use components::{TextInput, TextInputBuilder, TextInputStyle};
pub use error::ModalError;
pub use interaction::{Interaction, ModalSubmitData};
pub use modals::{Modal, ModalHandler, NoopHandler, store::ModalStore};
