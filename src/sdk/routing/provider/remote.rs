use crate::sdk::routing::error::GeocodeError;
use crate::sdk::routing::geocode::decode_search_response;
use crate::sdk::routing::service::{PlaceResolver, ResolvedPlace};
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const ORS_BASE_URL: &str = "https://api.openrouteservice.org";

/// Geocoding through the hosted openrouteservice API.
pub struct RemoteOrsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    limiter: Limiter,
}

impl RemoteOrsProvider {
    pub fn new(api_key: String, limiter: Limiter) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, limiter, ORS_BASE_URL.to_string())
    }

    pub fn with_base_url(
        api_key: String,
        limiter: Limiter,
        base_url: String,
    ) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
        })
    }
}

#[async_trait]
impl PlaceResolver for RemoteOrsProvider {
    async fn resolve(&self, name: &str) -> Result<ResolvedPlace, GeocodeError> {
        log::debug!("Waiting for geocode limiter before resolving \"{}\"", name);
        self.limiter.until_ready().await;

        let url = format!("{}/geocode/search", self.base_url);
        log::debug!("[PROVIDER] Calling remote geocode for place: \"{}\"", name);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("text", name), ("size", "1")])
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send geocoding request. URL: {}\nError: {}", url, e);
                e
            })?;

        let status = response.status();
        let text = response.text().await?;
        decode_search_response(name, status, &text)
    }
}
