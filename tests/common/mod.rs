#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voice_nav::sdk::geo::Coordinate;
use voice_nav::sdk::intent::{
    IntentInterpreter, InterpretedUtterance, InterpreterError, DESTINATION_SLOT, NAVIGATE_INTENT,
};
use voice_nav::sdk::routing::{GeocodeError, PlaceResolver, ResolvedPlace};
use voice_nav::sdk::shell::DisplaySurface;

pub fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

pub fn accra() -> Coordinate {
    coord(5.6, -0.19)
}

pub fn kumasi() -> Coordinate {
    coord(6.69, -1.62)
}

pub fn tamale() -> Coordinate {
    coord(9.4, -0.85)
}

#[derive(Debug, Clone, Copy)]
pub enum InterpreterMode {
    /// "navigate to X" is a Navigate intent with geo-city X; anything else is small talk.
    Agent,
    /// Navigate intent that never carries the destination slot.
    MissingSlot,
    Transport,
    Credentials,
    Hang,
}

/// Stands in for the NLU agent.
pub struct FakeInterpreter {
    mode: InterpreterMode,
    // Utterances containing the key sleep this long before answering
    delays: HashMap<String, Duration>,
    pub calls: AtomicUsize,
}

impl FakeInterpreter {
    pub fn new(mode: InterpreterMode) -> Self {
        Self {
            mode,
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn agent() -> Self {
        Self::new(InterpreterMode::Agent)
    }

    pub fn with_delay(mut self, utterance_part: &str, delay: Duration) -> Self {
        self.delays.insert(utterance_part.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn raw_reply(place: &str) -> String {
    format!("Okay, {} it is.", place)
}

#[async_trait]
impl IntentInterpreter for FakeInterpreter {
    async fn interpret(&self, utterance: &str) -> Result<InterpretedUtterance, InterpreterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (part, delay) in &self.delays {
            if utterance.contains(part.as_str()) {
                tokio::time::sleep(*delay).await;
            }
        }

        match self.mode {
            InterpreterMode::Transport => Err(InterpreterError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            }),
            InterpreterMode::Credentials => {
                Err(InterpreterError::Credentials("no token".to_string()))
            }
            InterpreterMode::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            InterpreterMode::MissingSlot => Ok(InterpretedUtterance {
                intent_name: NAVIGATE_INTENT.to_string(),
                reply_text: "Where would you like to go?".to_string(),
                slots: BTreeMap::new(),
            }),
            InterpreterMode::Agent => match utterance.strip_prefix("navigate to ") {
                Some(place) => Ok(InterpretedUtterance {
                    intent_name: NAVIGATE_INTENT.to_string(),
                    reply_text: raw_reply(place),
                    slots: BTreeMap::from([(DESTINATION_SLOT.to_string(), place.to_string())]),
                }),
                None => Ok(InterpretedUtterance {
                    intent_name: "Default Welcome Intent".to_string(),
                    reply_text: "Hi! Where do you want to go?".to_string(),
                    slots: BTreeMap::new(),
                }),
            },
        }
    }
}

/// Gazetteer-backed resolver. Unknown names are "not found".
pub struct FakeResolver {
    places: HashMap<String, Coordinate>,
    failing: bool,
    hang: bool,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn ghana() -> Self {
        Self {
            places: HashMap::from([
                ("Accra".to_string(), accra()),
                ("Kumasi".to_string(), kumasi()),
                ("Tamale".to_string(), tamale()),
            ]),
            failing: false,
            hang: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::ghana()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::ghana()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceResolver for FakeResolver {
    async fn resolve(&self, name: &str) -> Result<ResolvedPlace, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.failing {
            return Err(GeocodeError::RawApiError {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(match self.places.get(name) {
            Some(c) => ResolvedPlace::found(name, *c),
            None => ResolvedPlace::not_found(name),
        })
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

/// Display that keeps every line shown, newest last.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.lines().pop()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show(&mut self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}
