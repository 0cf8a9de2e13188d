use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};
use voice_nav::sdk::{
    config::{GeocoderConfig, NavConfig},
    geo::Coordinate,
    intent::{DialogflowInterpreter, IntentInterpreter},
    location::{FixedLocation, LocationFile, LocationProvider},
    map::MapCanvas,
    orchestrator::{NavigationContext, RouteOrchestrator},
    queue::TurnQueue,
    routing::{LocalPeliasProvider, PlaceResolver, RemoteOrsProvider},
    shell::{Permissions, Shell, StdoutDisplay},
    speech::{ConsoleCapture, RecognizerCommand, SpeechCapture},
    util::{log::init_logging, rate_limit::ors_limiter},
};

/// Speak (or type) where you want to go and get a route drawn on the map
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Current position as "lat,lon" (e.g., "5.6,-0.19")
    #[arg(long, allow_hyphen_values = true)]
    origin: Option<Coordinate>,

    /// File holding the last position fix as "lat,lon"
    #[arg(long, conflicts_with = "origin")]
    location_file: Option<PathBuf>,

    /// Recognizer command that prints one transcription per run (reads typed lines otherwise)
    #[arg(long)]
    recognizer: Option<String>,

    /// Where the map is written as GeoJSON on exit
    #[arg(long, default_value = "voice_nav_map.geojson")]
    map_out: PathBuf,

    /// Run as if microphone access was refused
    #[arg(long)]
    deny_microphone: bool,

    /// Run as if location access was refused
    #[arg(long)]
    deny_location: bool,

    /// [Optional] Per-request bound for the interpreter and geocoder, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    // --- 1. Argument Parsing with Clap ---
    let cli = Cli::parse();

    // --- 2. Dependency Initialization ---
    let config = NavConfig::from_env()?;
    log::debug!("Configuration: {:?}", config);
    let timeout = cli
        .timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(config.turn_timeout);

    let interpreter: Arc<dyn IntentInterpreter> = Arc::new(
        DialogflowInterpreter::new(config.dialogflow.clone())
            .context("Failed to build Dialogflow client")?,
    );
    let resolver: Arc<dyn PlaceResolver> = match config.geocoder {
        GeocoderConfig::Remote { api_key } => Arc::new(
            RemoteOrsProvider::new(api_key, ors_limiter())
                .context("Failed to build geocoding client")?,
        ),
        GeocoderConfig::Local { base_url } => {
            log::info!("Using local geocoder at {}", base_url);
            Arc::new(
                LocalPeliasProvider::new(base_url).context("Failed to build geocoding client")?,
            )
        }
    };
    let location: Arc<dyn LocationProvider> = match &cli.location_file {
        Some(path) => Arc::new(LocationFile::new(path)),
        None => Arc::new(FixedLocation(cli.origin)),
    };

    let orchestrator = RouteOrchestrator::new(interpreter, resolver).with_timeout(timeout);
    let ctx = NavigationContext::new(MapCanvas::new());
    let queue = TurnQueue::spawn(orchestrator, ctx, StdoutDisplay);
    let permissions = Permissions {
        microphone: !cli.deny_microphone,
        location: !cli.deny_location,
    };

    // --- 3. Voice Loop ---
    let ctx = match &cli.recognizer {
        Some(command_line) => {
            let recognizer = RecognizerCommand::parse(command_line)
                .context("--recognizer needs a command to run")?;
            log::info!("Listening through: {}", command_line);
            run_shell(recognizer, queue, location, permissions).await?
        }
        None => {
            println!("Type a command (e.g. \"navigate to Kumasi\"), or \"quit\" to stop.");
            run_shell(ConsoleCapture::stdin(), queue, location, permissions).await?
        }
    };

    // --- 4. Output Results ---
    match ctx.route.destination() {
        Some(destination) => log::info!(
            "Route: {} -> {}",
            ctx.route.origin().map(|o| o.to_string()).unwrap_or_default(),
            destination
        ),
        None => log::info!("No destination was set."),
    }
    ctx.map
        .save_to_file(&cli.map_out)
        .with_context(|| format!("Failed to write {}", cli.map_out.display()))?;
    log::info!("Map written to {}", cli.map_out.display());

    Ok(())
}

async fn run_shell<C: SpeechCapture>(
    capture: C,
    queue: TurnQueue<MapCanvas>,
    location: Arc<dyn LocationProvider>,
    permissions: Permissions,
) -> Result<NavigationContext<MapCanvas>> {
    let shell = Shell::new(capture, StdoutDisplay, queue, location, permissions);
    shell.run().await.context("Turn queue stopped unexpectedly")
}
