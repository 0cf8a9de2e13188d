mod common;

use common::*;
use std::sync::Arc;
use std::time::Duration;
use voice_nav::sdk::error::{
    CREDENTIALS_ERROR_MESSAGE, GEOCODING_ERROR_MESSAGE, INTERPRETER_ERROR_MESSAGE,
    NO_SPEECH_MESSAGE,
};
use voice_nav::sdk::geo::Polyline;
use voice_nav::sdk::map::MapCanvas;
use voice_nav::sdk::orchestrator::{
    guidance_message, not_found_message, NavigationContext, RouteOrchestrator, SeedOutcome,
    TurnOutcome, CURRENT_LOCATION_LABEL, CURRENT_LOCATION_ZOOM, DESTINATION_ZOOM,
};

fn orchestrator(interpreter: FakeInterpreter, resolver: FakeResolver) -> RouteOrchestrator {
    RouteOrchestrator::new(Arc::new(interpreter), Arc::new(resolver))
}

fn context_with_origin(origin: voice_nav::Coordinate) -> NavigationContext {
    let mut ctx = NavigationContext::new(MapCanvas::new());
    assert!(ctx.route.establish_origin(origin));
    ctx
}

#[tokio::test]
async fn first_place_becomes_origin_without_drawing() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = NavigationContext::new(MapCanvas::new());

    let report = orch.handle_utterance(&mut ctx, "navigate to Accra").await;

    assert_eq!(report.outcome, TurnOutcome::OriginSet(accra()));
    assert_eq!(report.display, raw_reply("Accra"));
    assert_eq!(ctx.route.origin(), Some(accra()));
    assert_eq!(ctx.route.destination(), None);
    assert_eq!(ctx.route.rendered_path(), None);
    assert!(ctx.map.markers().is_empty());
    assert_eq!(ctx.map.path(), None);
    assert_eq!(ctx.map.camera(), None);
}

#[tokio::test]
async fn known_origin_gets_destination_marker_and_path() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = context_with_origin(accra());

    let report = orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;

    assert_eq!(report.display, "Guiding you to Kumasi now!");
    assert_eq!(
        report.outcome,
        TurnOutcome::DestinationSet {
            place: "Kumasi".to_string(),
            coordinate: kumasi()
        }
    );
    assert_eq!(ctx.route.origin(), Some(accra()));
    assert_eq!(ctx.route.destination(), Some(kumasi()));
    assert_eq!(ctx.route.rendered_path(), Some(Polyline::new(accra(), kumasi())));

    let markers = ctx.map.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].position, kumasi());
    assert_eq!(markers[0].title, "Kumasi");
    assert_eq!(ctx.map.path(), Some(Polyline::new(accra(), kumasi())));
    let camera = ctx.map.camera().unwrap();
    assert_eq!(camera.target, kumasi());
    assert_eq!(camera.zoom, DESTINATION_ZOOM);
}

#[tokio::test]
async fn unknown_place_leaves_state_untouched() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = context_with_origin(accra());
    let before = ctx.route.clone();

    let report = orch.handle_utterance(&mut ctx, "navigate to Atlantis").await;

    assert_eq!(report.display, not_found_message("Atlantis"));
    assert_eq!(report.outcome, TurnOutcome::PlaceNotFound("Atlantis".to_string()));
    assert_eq!(ctx.route, before);
    assert!(ctx.map.markers().is_empty());
    assert_eq!(ctx.map.path(), None);
}

#[tokio::test]
async fn interpreter_failure_shows_fixed_message() {
    let resolver = shared(FakeResolver::ghana());
    let orch = RouteOrchestrator::new(
        Arc::new(FakeInterpreter::new(InterpreterMode::Transport)),
        resolver.clone(),
    );
    let mut ctx = context_with_origin(accra());
    let before = ctx.route.clone();

    let report = orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;

    assert_eq!(report.display, INTERPRETER_ERROR_MESSAGE);
    assert_eq!(report.outcome, TurnOutcome::InterpreterFailed);
    assert_eq!(ctx.route, before);
    assert!(ctx.map.markers().is_empty());
    assert_eq!(ctx.map.path(), None);
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn credential_failure_has_its_own_message() {
    let orch = orchestrator(
        FakeInterpreter::new(InterpreterMode::Credentials),
        FakeResolver::ghana(),
    );
    let mut ctx = NavigationContext::new(MapCanvas::new());

    let report = orch.handle_utterance(&mut ctx, "navigate to Accra").await;

    assert_eq!(report.display, CREDENTIALS_ERROR_MESSAGE);
    assert_eq!(report.outcome, TurnOutcome::InterpreterFailed);
    assert_eq!(ctx.route.origin(), None);
}

#[tokio::test]
async fn navigate_without_slot_falls_back_to_reply() {
    let resolver = shared(FakeResolver::ghana());
    let orch = RouteOrchestrator::new(
        Arc::new(FakeInterpreter::new(InterpreterMode::MissingSlot)),
        resolver.clone(),
    );
    let mut ctx = context_with_origin(accra());
    let before = ctx.route.clone();

    let report = orch.handle_utterance(&mut ctx, "navigate somewhere").await;

    assert_eq!(report.display, "Where would you like to go?");
    assert_eq!(report.outcome, TurnOutcome::MalformedResult);
    assert_eq!(ctx.route, before);
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn other_intents_just_reply() {
    let resolver = shared(FakeResolver::ghana());
    let orch = RouteOrchestrator::new(Arc::new(FakeInterpreter::agent()), resolver.clone());
    let mut ctx = NavigationContext::new(MapCanvas::new());

    let report = orch.handle_utterance(&mut ctx, "hello there").await;

    assert_eq!(report.display, "Hi! Where do you want to go?");
    assert_eq!(report.outcome, TurnOutcome::Replied);
    assert_eq!(ctx.route.origin(), None);
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn geocoder_failure_is_distinct_from_not_found() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::failing());
    let mut ctx = context_with_origin(accra());
    let before = ctx.route.clone();

    let report = orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;

    assert_eq!(report.display, GEOCODING_ERROR_MESSAGE);
    assert_ne!(report.display, not_found_message("Kumasi"));
    assert_eq!(report.outcome, TurnOutcome::GeocodingFailed);
    assert_eq!(ctx.route, before);
}

#[tokio::test]
async fn origin_stays_while_destinations_change() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = NavigationContext::new(MapCanvas::new());

    orch.handle_utterance(&mut ctx, "navigate to Accra").await;
    for (place, expected) in [("Kumasi", kumasi()), ("Tamale", tamale()), ("Kumasi", kumasi())] {
        let report = orch
            .handle_utterance(&mut ctx, &format!("navigate to {}", place))
            .await;
        assert_eq!(report.display, guidance_message(place));
        assert_eq!(ctx.route.origin(), Some(accra()));
        assert_eq!(ctx.route.destination(), Some(expected));
        assert_eq!(ctx.route.rendered_path(), Some(Polyline::new(accra(), expected)));
        assert_eq!(ctx.map.path(), Some(Polyline::new(accra(), expected)));
    }
}

#[tokio::test]
async fn repeating_a_command_gives_the_same_state() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());

    let mut once = context_with_origin(accra());
    orch.handle_utterance(&mut once, "navigate to Kumasi").await;

    let mut twice = context_with_origin(accra());
    orch.handle_utterance(&mut twice, "navigate to Kumasi").await;
    orch.handle_utterance(&mut twice, "navigate to Kumasi").await;

    assert_eq!(once.route, twice.route);
    assert_eq!(once.map.path(), twice.map.path());
}

#[tokio::test]
async fn destination_at_origin_draws_zero_length_path() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = context_with_origin(accra());

    let report = orch.handle_utterance(&mut ctx, "navigate to Accra").await;

    assert_eq!(report.display, guidance_message("Accra"));
    let path = ctx.route.rendered_path().unwrap();
    assert!(path.is_degenerate());
    assert_eq!(ctx.map.path(), Some(path));
}

#[tokio::test]
async fn startup_fix_seeds_origin_with_marker() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = NavigationContext::new(MapCanvas::new());

    assert_eq!(orch.seed_origin(&mut ctx, None), SeedOutcome::NoFix);
    assert_eq!(orch.seed_origin(&mut ctx, Some(accra())), SeedOutcome::Seeded(accra()));

    assert_eq!(ctx.route.origin(), Some(accra()));
    assert_eq!(ctx.map.markers()[0].title, CURRENT_LOCATION_LABEL);
    assert_eq!(ctx.map.camera().unwrap().zoom, CURRENT_LOCATION_ZOOM);

    // Next resolved place is a destination, not a new origin
    orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;
    assert_eq!(ctx.route.destination(), Some(kumasi()));
}

#[tokio::test]
async fn late_startup_fix_does_not_replace_origin() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::ghana());
    let mut ctx = NavigationContext::new(MapCanvas::new());

    orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;
    let before = ctx.route.clone();

    assert_eq!(orch.seed_origin(&mut ctx, Some(accra())), SeedOutcome::AlreadySet);
    assert_eq!(ctx.route, before);
    assert_eq!(ctx.route.origin(), Some(kumasi()));
    assert!(ctx.map.markers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn hung_interpreter_times_out_as_transport_failure() {
    let orch = orchestrator(FakeInterpreter::new(InterpreterMode::Hang), FakeResolver::ghana())
        .with_timeout(Duration::from_secs(3));
    let mut ctx = context_with_origin(accra());
    let before = ctx.route.clone();

    let report = orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;

    assert_eq!(report.display, INTERPRETER_ERROR_MESSAGE);
    assert_eq!(report.outcome, TurnOutcome::InterpreterFailed);
    assert_eq!(ctx.route, before);
}

#[tokio::test(start_paused = true)]
async fn hung_geocoder_times_out_as_transport_failure() {
    let orch = orchestrator(FakeInterpreter::agent(), FakeResolver::hanging())
        .with_timeout(Duration::from_secs(3));
    let mut ctx = context_with_origin(accra());

    let report = orch.handle_utterance(&mut ctx, "navigate to Kumasi").await;

    assert_eq!(report.display, GEOCODING_ERROR_MESSAGE);
    assert_eq!(report.outcome, TurnOutcome::GeocodingFailed);
    assert_eq!(ctx.route.destination(), None);
}

#[tokio::test]
async fn blank_utterance_never_reaches_the_interpreter() {
    let interpreter = shared(FakeInterpreter::agent());
    let orch = RouteOrchestrator::new(interpreter.clone(), Arc::new(FakeResolver::ghana()));
    let mut ctx = context_with_origin(accra());
    let before = ctx.route.clone();

    let report = orch.handle_utterance(&mut ctx, "   ").await;

    assert_eq!(report.display, NO_SPEECH_MESSAGE);
    assert_eq!(report.outcome, TurnOutcome::NoSpeech);
    assert_eq!(ctx.route, before);
    assert_eq!(interpreter.call_count(), 0);
}
