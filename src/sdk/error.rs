use crate::sdk::intent::InterpreterError;
use crate::sdk::routing::GeocodeError;
use crate::sdk::speech::CaptureError;
use std::fmt;
use thiserror::Error;

pub const MICROPHONE_DENIED_MESSAGE: &str = "Microphone permission denied.";
pub const MICROPHONE_REQUIRED_MESSAGE: &str = "Microphone permission is required.";
pub const LOCATION_REQUIRED_MESSAGE: &str = "Location permission is required.";
pub const NO_RECOGNIZER_MESSAGE: &str = "No speech recognition app available.";
pub const NO_SPEECH_MESSAGE: &str = "No speech was recognized.";
pub const CREDENTIALS_ERROR_MESSAGE: &str = "Error: Unable to load Dialogflow credentials.";
pub const INTERPRETER_ERROR_MESSAGE: &str = "Error communicating with Dialogflow.";
pub const GEOCODING_ERROR_MESSAGE: &str = "Error retrieving location.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Microphone,
    Location,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Microphone => f.write_str("Microphone"),
            Permission::Location => f.write_str("Location"),
        }
    }
}

/// Every way a voice turn can fail at an I/O boundary. None of these escape
/// the shell: each is logged and replaced by its `user_message`.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("{0} permission denied")]
    PermissionDenied(Permission),

    #[error("Transcription unavailable: {0}")]
    TranscriptionUnavailable(#[from] CaptureError),

    #[error("Interpreter request failed: {0}")]
    InterpreterTransport(#[from] InterpreterError),

    #[error("Intent \"{intent}\" arrived without a \"{slot}\" value")]
    MalformedInterpreterResult { intent: String, slot: String },

    #[error("Geocoding request failed: {0}")]
    GeocodingTransport(#[from] GeocodeError),
}

impl NavError {
    /// Fixed text for the display surface.
    ///
    /// A malformed interpreter result is never shown with this text: the
    /// orchestrator falls back to the interpreter's own reply.
    pub fn user_message(&self) -> &'static str {
        match self {
            NavError::PermissionDenied(Permission::Microphone) => MICROPHONE_DENIED_MESSAGE,
            NavError::PermissionDenied(Permission::Location) => LOCATION_REQUIRED_MESSAGE,
            NavError::TranscriptionUnavailable(CaptureError::Empty)
            | NavError::TranscriptionUnavailable(CaptureError::Timeout(_)) => NO_SPEECH_MESSAGE,
            NavError::TranscriptionUnavailable(_) => NO_RECOGNIZER_MESSAGE,
            NavError::InterpreterTransport(InterpreterError::Credentials(_)) => {
                CREDENTIALS_ERROR_MESSAGE
            }
            NavError::InterpreterTransport(_) => INTERPRETER_ERROR_MESSAGE,
            NavError::MalformedInterpreterResult { .. } => INTERPRETER_ERROR_MESSAGE,
            NavError::GeocodingTransport(_) => GEOCODING_ERROR_MESSAGE,
        }
    }
}
