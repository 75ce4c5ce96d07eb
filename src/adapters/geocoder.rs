use crate::domain::model::Coordinate;
use crate::domain::ports::Geocoder;
use crate::utils::error::{Result, RouteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Nominatim 回傳的座標是字串
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/search", self.endpoint);
        tracing::debug!("Geocoding via {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RouteError::ApiStatusError {
                status: response.status().as_u16(),
                url,
            });
        }

        let places: Vec<Place> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            tracing::debug!("No geocoding match for '{}'", address);
            return Ok(None);
        };

        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| RouteError::data(format!("Geocoder returned a bad coordinate '{}'", value)))
        };
        let coordinate = Coordinate::new(parse(&place.lat)?, parse(&place.lon)?);
        if !coordinate.is_valid() {
            return Err(RouteError::data(format!(
                "Geocoder returned an out-of-range coordinate {}",
                coordinate
            )));
        }

        if let Some(name) = &place.display_name {
            tracing::debug!("Resolved '{}' to {} ({})", address, coordinate, name);
        }
        Ok(Some(coordinate))
    }
}
