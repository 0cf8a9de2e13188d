//! Turns one voice command into route updates and a line of display text.
//!
//! The orchestrator holds no navigation state of its own. Everything it
//! mutates lives in a [`NavigationContext`] handed in by the caller, which in
//! practice is the single task draining the turn queue.

use crate::sdk::config::DEFAULT_TURN_TIMEOUT_SECS;
use crate::sdk::error::NavError;
use crate::sdk::geo::Coordinate;
use crate::sdk::intent::{
    IntentInterpreter, InterpretedUtterance, InterpreterError, DESTINATION_SLOT,
};
use crate::sdk::map::{MapCanvas, MapView};
use crate::sdk::routing::{GeocodeError, PlaceResolver, ResolvedPlace, RouteState};
use crate::sdk::speech::CaptureError;
use std::sync::Arc;
use std::time::Duration;

/// Zoom used when the camera follows a new destination.
pub const DESTINATION_ZOOM: f32 = 12.0;

/// Zoom used when the camera shows the user's own position.
pub const CURRENT_LOCATION_ZOOM: f32 = 15.0;

pub const CURRENT_LOCATION_LABEL: &str = "You are here";

/// Route state together with the map it is drawn on.
#[derive(Debug, Default)]
pub struct NavigationContext<M = MapCanvas> {
    pub route: RouteState,
    pub map: M,
}

impl<M: MapView> NavigationContext<M> {
    pub fn new(map: M) -> Self {
        Self {
            route: RouteState::new(),
            map,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank utterance, nothing was sent to the interpreter.
    NoSpeech,
    /// Not a navigation request; the interpreter's reply is shown.
    Replied,
    /// The resolved place became the starting point.
    OriginSet(Coordinate),
    DestinationSet { place: String, coordinate: Coordinate },
    PlaceNotFound(String),
    /// Navigation intent without a destination slot.
    MalformedResult,
    InterpreterFailed,
    GeocodingFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub display: String,
    pub outcome: TurnOutcome,
}

impl TurnReport {
    fn new(display: impl Into<String>, outcome: TurnOutcome) -> Self {
        Self {
            display: display.into(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedOutcome {
    Seeded(Coordinate),
    /// A navigation command got there first.
    AlreadySet,
    NoFix,
}

pub fn guidance_message(place: &str) -> String {
    format!("Guiding you to {} now!", place)
}

pub fn not_found_message(place: &str) -> String {
    format!("Unable to locate {}", place)
}

pub struct RouteOrchestrator {
    interpreter: Arc<dyn IntentInterpreter>,
    resolver: Arc<dyn PlaceResolver>,
    timeout: Duration,
}

impl RouteOrchestrator {
    pub fn new(interpreter: Arc<dyn IntentInterpreter>, resolver: Arc<dyn PlaceResolver>) -> Self {
        Self {
            interpreter,
            resolver,
            timeout: Duration::from_secs(DEFAULT_TURN_TIMEOUT_SECS),
        }
    }

    /// Bounds each interpreter and geocoder call. Expiry counts as a
    /// transport failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Handles one utterance. Always yields exactly one display text; the route
    /// is only touched when a place was actually resolved. Blank text never
    /// reaches the interpreter.
    pub async fn handle_utterance<M: MapView>(
        &self,
        ctx: &mut NavigationContext<M>,
        text: &str,
    ) -> TurnReport {
        if text.trim().is_empty() {
            let err = NavError::from(CaptureError::Empty);
            log::warn!("{}", err);
            return TurnReport::new(err.user_message(), TurnOutcome::NoSpeech);
        }
        log::info!("Handling utterance: \"{}\"", text);

        let interpreted = match self.interpret(text).await {
            Ok(interpreted) => interpreted,
            Err(e) => {
                let err = NavError::from(e);
                log::error!("{}", err);
                return TurnReport::new(err.user_message(), TurnOutcome::InterpreterFailed);
            }
        };

        if !interpreted.is_navigation() {
            log::debug!("Intent \"{}\" is not a navigation request", interpreted.intent_name);
            return TurnReport::new(interpreted.reply_text, TurnOutcome::Replied);
        }

        let place = match interpreted.slot(DESTINATION_SLOT) {
            Some(place) => place.to_string(),
            None => {
                let err = NavError::MalformedInterpreterResult {
                    intent: interpreted.intent_name.clone(),
                    slot: DESTINATION_SLOT.to_string(),
                };
                log::warn!("{}", err);
                return TurnReport::new(interpreted.reply_text, TurnOutcome::MalformedResult);
            }
        };
        log::info!("Navigate to: {}", place);

        let resolved = match self.resolve(&place).await {
            Ok(resolved) => resolved,
            Err(e) => {
                let err = NavError::from(e);
                log::error!("{}", err);
                return TurnReport::new(err.user_message(), TurnOutcome::GeocodingFailed);
            }
        };

        match resolved.coordinate {
            None => {
                log::info!("Location not found: {}", place);
                TurnReport::new(not_found_message(&place), TurnOutcome::PlaceNotFound(place))
            }
            Some(coordinate) => self.apply_resolved_place(ctx, interpreted, place, coordinate),
        }
    }

    /// Applies the startup location fix. Never overwrites an origin that a
    /// navigation command already established.
    pub fn seed_origin<M: MapView>(
        &self,
        ctx: &mut NavigationContext<M>,
        fix: Option<Coordinate>,
    ) -> SeedOutcome {
        let Some(coordinate) = fix else {
            log::debug!("No startup location fix");
            return SeedOutcome::NoFix;
        };
        if !ctx.route.establish_origin(coordinate) {
            log::info!("Ignoring startup fix {}: origin already set", coordinate);
            return SeedOutcome::AlreadySet;
        }
        log::info!("Origin set from current location {}", coordinate);
        ctx.map.add_marker(coordinate, CURRENT_LOCATION_LABEL);
        ctx.map.move_camera(coordinate, CURRENT_LOCATION_ZOOM);
        SeedOutcome::Seeded(coordinate)
    }

    fn apply_resolved_place<M: MapView>(
        &self,
        ctx: &mut NavigationContext<M>,
        interpreted: InterpretedUtterance,
        place: String,
        coordinate: Coordinate,
    ) -> TurnReport {
        if ctx.route.establish_origin(coordinate) {
            // First place heard becomes the starting point, nothing is drawn yet
            log::info!("Origin set to {} at {}", place, coordinate);
            return TurnReport::new(interpreted.reply_text, TurnOutcome::OriginSet(coordinate));
        }

        ctx.route.set_destination(coordinate);
        log::info!("Destination set to {} at {}", place, coordinate);
        ctx.map.add_marker(coordinate, &place);
        ctx.map.move_camera(coordinate, DESTINATION_ZOOM);
        draw_route(ctx);

        TurnReport::new(
            guidance_message(&place),
            TurnOutcome::DestinationSet { place, coordinate },
        )
    }

    async fn interpret(&self, text: &str) -> Result<InterpretedUtterance, InterpreterError> {
        tokio::time::timeout(self.timeout, self.interpreter.interpret(text))
            .await
            .map_err(|_| InterpreterError::Timeout(self.timeout.as_secs()))?
    }

    async fn resolve(&self, place: &str) -> Result<ResolvedPlace, GeocodeError> {
        tokio::time::timeout(self.timeout, self.resolver.resolve(place))
            .await
            .map_err(|_| GeocodeError::Timeout(self.timeout.as_secs()))?
    }
}

/// Replaces whatever path is on the map with a straight line between the
/// current endpoints. Does nothing until both are known.
fn draw_route<M: MapView>(ctx: &mut NavigationContext<M>) {
    let Some((previous, path)) = ctx.route.render() else {
        return;
    };
    if previous.is_some() {
        ctx.map.remove_path();
    }
    if path.is_degenerate() {
        log::debug!("Destination equals origin, drawing a zero-length path");
    }
    ctx.map.draw_path(path);
    log::info!("Polyline drawn between {} and {}", path.from, path.to);
}
