pub mod config;
pub mod error;
pub mod geo;
pub mod intent;
pub mod location;
pub mod map;
pub mod orchestrator;
pub mod queue;
pub mod routing;
pub mod shell;
pub mod speech;
pub mod util;
