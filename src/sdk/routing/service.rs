use super::error::GeocodeError;
use crate::sdk::geo::Coordinate;
use async_trait::async_trait;

/// Outcome of a place lookup. `coordinate == None` means the geocoder had no
/// match, which is a valid answer rather than a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub query: String,
    pub coordinate: Option<Coordinate>,
}

impl ResolvedPlace {
    pub fn found(query: &str, coordinate: Coordinate) -> Self {
        Self {
            query: query.to_string(),
            coordinate: Some(coordinate),
        }
    }

    pub fn not_found(query: &str) -> Self {
        Self {
            query: query.to_string(),
            coordinate: None,
        }
    }
}

#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Resolves a place name to at most one coordinate, taking the first
    /// candidate when several match.
    async fn resolve(&self, name: &str) -> Result<ResolvedPlace, GeocodeError>;
}
