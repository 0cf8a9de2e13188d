pub mod dialogflow;
pub mod service;
pub mod types;

pub use dialogflow::{decode_detect_intent, DialogflowInterpreter};
pub use service::{
    IntentInterpreter, InterpretedUtterance, InterpreterError, DESTINATION_SLOT, NAVIGATE_INTENT,
};
