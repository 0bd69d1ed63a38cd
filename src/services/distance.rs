//! Driving distance lookup
//!
//! The session calls a [`DistanceCalculator`] once per new trip whose miles
//! are unset. The production client talks to a Google Distance Matrix
//! compatible endpoint over blocking HTTP.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistanceError {
    #[error("distance lookup is not configured (set TRIPLOG_MAPS_API_KEY or distance.api_key)")]
    NotConfigured,
    #[error("distance request failed: {0}")]
    Transport(String),
    #[error("distance service returned HTTP {0}")]
    HttpStatus(u16),
    #[error("unexpected distance response: {0}")]
    Malformed(String),
    #[error("no route from {origin} to {destination} ({status})")]
    NoRoute {
        origin: String,
        destination: String,
        status: String,
    },
}

pub trait DistanceCalculator {
    /// One-way driving distance in miles
    fn calculate(&self, origin: &str, destination: &str) -> Result<f64, DistanceError>;
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    distance: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    /// Meters
    value: f64,
}

/// Distance Matrix HTTP client
#[derive(Debug, Clone)]
pub struct DistanceMatrixClient {
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

impl DistanceMatrixClient {
    pub fn new(api_key: Option<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl DistanceCalculator for DistanceMatrixClient {
    fn calculate(&self, origin: &str, destination: &str) -> Result<f64, DistanceError> {
        let key = self.api_key.as_deref().ok_or(DistanceError::NotConfigured)?;

        tracing::debug!("Requesting distance {} -> {}", origin, destination);
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .get(&self.endpoint)
            .query("origins", origin)
            .query("destinations", destination)
            .query("units", "imperial")
            .query("key", key)
            .call();

        let body = match response {
            Ok(response) => response
                .into_string()
                .map_err(|e| DistanceError::Transport(e.to_string()))?,
            Err(ureq::Error::Status(code, _)) => {
                tracing::warn!("Distance service returned HTTP {}", code);
                return Err(DistanceError::HttpStatus(code));
            }
            Err(e) => {
                tracing::warn!("Distance request failed: {}", e);
                return Err(DistanceError::Transport(e.to_string()));
            }
        };

        let miles = parse_response(&body, origin, destination)?;
        tracing::info!("Distance {} -> {} is {:.1} mi", origin, destination, miles);
        Ok(miles)
    }
}

/// Extract the first element's distance, converted to miles (one decimal)
fn parse_response(body: &str, origin: &str, destination: &str) -> Result<f64, DistanceError> {
    let response: MatrixResponse =
        serde_json::from_str(body).map_err(|e| DistanceError::Malformed(e.to_string()))?;

    if response.status != "OK" {
        let detail = response
            .error_message
            .map(|m| format!("{}: {}", response.status, m))
            .unwrap_or(response.status);
        return Err(DistanceError::Malformed(detail));
    }

    let element = response
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .ok_or_else(|| DistanceError::Malformed("empty result".to_string()))?;

    match (&element.distance, element.status.as_str()) {
        (Some(distance), "OK") => Ok((distance.value / METERS_PER_MILE * 10.0).round() / 10.0),
        _ => Err(DistanceError::NoRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
            status: element.status.clone(),
        }),
    }
}

/// Fixed route table; unknown routes fail. Useful offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedDistance {
    routes: HashMap<(String, String), f64>,
}

impl FixedDistance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, origin: &str, destination: &str, miles: f64) -> Self {
        self.routes.insert(
            (origin.to_lowercase(), destination.to_lowercase()),
            miles,
        );
        self
    }
}

impl DistanceCalculator for FixedDistance {
    fn calculate(&self, origin: &str, destination: &str) -> Result<f64, DistanceError> {
        self.routes
            .get(&(origin.to_lowercase(), destination.to_lowercase()))
            .copied()
            .ok_or_else(|| DistanceError::NoRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
                status: "NOT_FOUND".to_string(),
            })
    }
}
