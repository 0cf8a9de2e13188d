use serde::Deserialize;
use thiserror::Error;

// Structured error body returned by openrouteservice on non-2xx responses
#[derive(Deserialize, Debug)]
pub struct OrsErrorDetail {
    pub code: u32,
    pub message: String,
}
#[derive(Deserialize, Debug)]
pub struct OrsErrorPayload {
    pub error: OrsErrorDetail,
}

/// Failure to reach or understand the geocoder. A place that simply does not
/// exist is not an error; see `ResolvedPlace`.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("API Error (Code {code}): {message}")]
    ApiError { code: u32, message: String },

    // Non-2xx status whose body is not the structured payload above
    #[error("Unstructured API Error ({status}): {body}")]
    RawApiError { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Geocoder returned an unusable coordinate: {0}")]
    BadCoordinate(#[from] crate::sdk::geo::CoordinateError),

    #[error("Geocoding timed out after {0} seconds")]
    Timeout(u64),
}
