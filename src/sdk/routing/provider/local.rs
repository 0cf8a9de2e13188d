use crate::sdk::routing::error::GeocodeError;
use crate::sdk::routing::geocode::decode_search_response;
use crate::sdk::routing::service::{PlaceResolver, ResolvedPlace};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Geocoding through a self-hosted Pelias instance. No key, no rate limit.
pub struct LocalPeliasProvider {
    client: Client,
    base_url: String,
}

impl LocalPeliasProvider {
    pub fn new(base_url: String) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlaceResolver for LocalPeliasProvider {
    async fn resolve(&self, name: &str) -> Result<ResolvedPlace, GeocodeError> {
        log::debug!("[PROVIDER] Calling local geocode for place: \"{}\"", name);
        let url = format!("{}/v1/search", self.base_url);

        let response = match self
            .client
            .get(&url)
            .query(&[("text", name), ("size", "1")])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::error!(
                    "Failed to reach local Pelias. URL: {}\nError: {}",
                    url,
                    e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;
        decode_search_response(name, status, &text)
    }
}
