use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinate component is not a finite number: ({0}, {1})")]
    NotFinite(f64, f64),

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Expected \"lat,lon\", got \"{0}\"")]
    Malformed(String),
}

/// A point on Earth in degrees. Both components are finite and in range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite(latitude, longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate from a GeoJSON position, which is ordered `[lon, lat]`.
    pub fn from_lon_lat(position: [f64; 2]) -> Result<Self, CoordinateError> {
        Self::new(position[1], position[0])
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// GeoJSON position order.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = CoordinateError;

    /// Parses `"lat,lon"`, the form accepted on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(CoordinateError::Malformed(s.to_string()));
        }
        let lat = parts[0]
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        let lon = parts[1]
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        Coordinate::new(lat, lon)
    }
}

/// Straight-line path between two points, as drawn on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polyline {
    pub from: Coordinate,
    pub to: Coordinate,
}

impl Polyline {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Self { from, to }
    }

    /// Origin and destination coincide. Still drawn.
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }
}
