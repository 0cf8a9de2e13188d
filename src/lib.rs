pub mod sdk;

pub use sdk::config::{GeocoderConfig, NavConfig};
pub use sdk::error::NavError;
pub use sdk::geo::{Coordinate, Polyline};
pub use sdk::intent::{DialogflowInterpreter, IntentInterpreter, InterpretedUtterance};
pub use sdk::map::{MapCanvas, MapView};
pub use sdk::orchestrator::{NavigationContext, RouteOrchestrator, TurnOutcome, TurnReport};
pub use sdk::queue::{Turn, TurnQueue};
pub use sdk::routing::{PlaceResolver, ResolvedPlace, RouteState};
pub use sdk::shell::{Permissions, Shell};
