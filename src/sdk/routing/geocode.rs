use super::error::{GeocodeError, OrsErrorPayload};
use super::provider::types::GeoResponse;
use super::service::ResolvedPlace;
use crate::sdk::geo::Coordinate;
use reqwest::StatusCode;

/// Turns a raw search response into a `ResolvedPlace`.
///
/// Both geocoders answer with a GeoJSON `FeatureCollection`; only the first
/// feature is used. An empty collection is a legitimate "not found".
pub fn decode_search_response(
    query: &str,
    status: StatusCode,
    text: &str,
) -> Result<ResolvedPlace, GeocodeError> {
    if !status.is_success() {
        // Try to parse the structured error first
        if let Ok(payload) = serde_json::from_str::<OrsErrorPayload>(text) {
            return Err(GeocodeError::ApiError {
                code: payload.error.code,
                message: payload.error.message,
            });
        }
        log::error!(
            "Geocoder returned non-success status: {}. Unparseable Body: {}",
            status,
            text
        );
        return Err(GeocodeError::RawApiError {
            status: status.as_u16(),
            body: text.to_string(),
        });
    }

    let resp: GeoResponse = serde_json::from_str(text).map_err(|e| {
        log::error!(
            "Failed to parse GeoResponse for \"{}\".\nError: {}. Body: {}",
            query,
            e,
            text
        );
        e
    })?;

    match resp.features.first() {
        Some(feature) => {
            let coordinate = Coordinate::from_lon_lat(feature.geometry.coordinates)?;
            let label = feature
                .properties
                .as_ref()
                .and_then(|p| p.label.as_deref())
                .unwrap_or(query);
            log::debug!("Location found: {} ({}) at {}", query, label, coordinate);
            Ok(ResolvedPlace::found(query, coordinate))
        }
        None => {
            log::debug!("Location not found: {}", query);
            Ok(ResolvedPlace::not_found(query))
        }
    }
}
