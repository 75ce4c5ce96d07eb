use crate::domain::model::{Coordinate, DirectionStep};
use crate::domain::ports::DirectionsProvider;
use crate::utils::error::{Result, RouteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DIRECTIONS_ENDPOINT: &str = "https://api.openrouteservice.org";
pub const DEFAULT_PROFILE: &str = "driving-car";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RouteBody>,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    instruction: String,
    distance: f64,
}

/// OpenRouteService directions API
pub struct OrsDirections {
    client: Client,
    endpoint: String,
    api_key: String,
    profile: String,
}

impl OrsDirections {
    pub fn new(endpoint: &str, api_key: &str, profile: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            profile: profile.to_string(),
        })
    }
}

#[async_trait]
impl DirectionsProvider for OrsDirections {
    async fn directions(&self, from: Coordinate, to: Coordinate) -> Result<Vec<DirectionStep>> {
        let url = format!("{}/v2/directions/{}/json", self.endpoint, self.profile);
        // ORS 座標順序為 [lon, lat]
        let body = serde_json::json!({
            "coordinates": [
                [from.longitude, from.latitude],
                [to.longitude, to.latitude],
            ]
        });

        tracing::debug!("Requesting directions {} -> {}", from, to);
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RouteError::ApiStatusError {
                status: response.status().as_u16(),
                url,
            });
        }

        let parsed: DirectionsResponse = response.json().await?;
        let segment = parsed
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.segments.into_iter().next())
            .ok_or_else(|| RouteError::data("Directions response contained no route"))?;

        Ok(segment
            .steps
            .into_iter()
            .map(|step| DirectionStep {
                instruction: step.instruction,
                distance_meters: step.distance,
            })
            .collect())
    }
}
