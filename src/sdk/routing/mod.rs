pub mod error;
pub mod geocode;
pub mod provider;
pub mod route;
pub mod service;

pub use error::GeocodeError;
pub use geocode::decode_search_response;
pub use provider::{LocalPeliasProvider, RemoteOrsProvider};
pub use route::RouteState;
pub use service::{PlaceResolver, ResolvedPlace};
