//! Outbound delivery seam.
//!
//! The chat transport is an external collaborator; the core only needs to
//! send plain text and yes/no choice prompts. Implementations decide what a
//! participant id means on their side of the wire.

use async_trait::async_trait;

use crate::error::Result;

/// One tappable choice in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceButton {
    pub label: String,
    /// Opaque id echoed back by the transport when the button is pressed.
    pub callback_id: String,
}

impl ChoiceButton {
    pub fn new(label: impl Into<String>, callback_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_id: callback_id.into(),
        }
    }
}

/// Outbound delivery interface, implemented by the transport layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, participant_id: &str, text: &str) -> Result<()>;

    async fn send_choice_prompt(
        &self,
        participant_id: &str,
        text: &str,
        choices: &[ChoiceButton],
    ) -> Result<()>;
}
