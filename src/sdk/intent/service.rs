use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Intent name the NLU agent assigns to "take me to ..." requests.
pub const NAVIGATE_INTENT: &str = "Navigate";

/// Slot carrying the destination of a navigation request.
pub const DESTINATION_SLOT: &str = "geo-city";

/// What the NLU service made of one utterance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpretedUtterance {
    pub intent_name: String,
    pub reply_text: String,
    pub slots: BTreeMap<String, String>,
}

impl InterpretedUtterance {
    pub fn is_navigation(&self) -> bool {
        self.intent_name == NAVIGATE_INTENT
    }

    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("Unable to load NLU credentials: {0}")]
    Credentials(String),

    #[error("Underlying request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API Error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("NLU request timed out after {0} seconds")]
    Timeout(u64),
}

#[async_trait]
pub trait IntentInterpreter: Send + Sync {
    /// Sends one utterance to the NLU service. Every call is an independent
    /// conversation; nothing is carried over from earlier utterances.
    async fn interpret(&self, utterance: &str) -> Result<InterpretedUtterance, InterpreterError>;
}
