use crate::sdk::geo::Coordinate;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The last known position of the user. Failures are logged and reported
    /// as `None`; they are never shown to the user.
    async fn last_known(&self) -> Option<Coordinate>;
}

/// A position given up front, e.g. on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinate>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn last_known(&self) -> Option<Coordinate> {
        if self.0.is_none() {
            log::debug!("[Location] No location found.");
        }
        self.0
    }
}

/// Reads the last fix from a file holding `"lat,lon"`, as written by a
/// positioning daemon.
#[derive(Debug, Clone)]
pub struct LocationFile {
    path: PathBuf,
}

impl LocationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LocationProvider for LocationFile {
    async fn last_known(&self) -> Option<Coordinate> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("[Location] Cannot read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match raw.trim().parse::<Coordinate>() {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                log::warn!("[Location] Ignoring fix in {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
