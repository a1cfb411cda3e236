//! Geocoding enricher
//!
//! Resolves city names the static gazetteer does not know, via a Nominatim
//! lookup with per-city caching and enforced inter-request spacing (Nominatim
//! allows one request per second). Failed and empty lookups are cached as
//! negative entries so an unknown city is queried at most once per process.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::GeocoderConfig;

const USER_AGENT: &str = concat!("empdir/", env!("CARGO_PKG_VERSION"));

/// Geocoder errors; internal to this module. Callers see `Option<Coordinates>`
/// because every failure degrades to "unresolvable city".
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resolved coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// External lookup seam; injectable so tests can count calls and serve
/// canned answers.
#[async_trait]
pub trait GeocodeBackend: Send + Sync {
    /// Best match for a city name, or `None` when the service has no result.
    async fn lookup(&self, city: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Nominatim search result entry. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Production backend: Nominatim (OpenStreetMap) search API.
pub struct NominatimBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl NominatimBackend {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl GeocodeBackend for NominatimBackend {
    async fn lookup(&self, city: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        debug!(city = %city, "Querying Nominatim");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .header("Accept-Language", "en")
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api(status.as_u16(), error_text));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        match places.first() {
            Some(place) => {
                let lat = place
                    .lat
                    .parse::<f64>()
                    .map_err(|e| GeocodeError::Parse(e.to_string()))?;
                let lng = place
                    .lon
                    .parse::<f64>()
                    .map_err(|e| GeocodeError::Parse(e.to_string()))?;
                Ok(Some(Coordinates { lat, lng }))
            }
            None => Ok(None),
        }
    }
}

/// Rate limiter enforcing a minimum interval between external lookups
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Geocode rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Caching, rate-limited geocoder.
///
/// The cache lives for the process lifetime and is shared by every consumer;
/// a city is looked up externally at most once per session, successful or not.
pub struct Geocoder {
    backend: Arc<dyn GeocodeBackend>,
    cache: Mutex<HashMap<String, Option<Coordinates>>>,
    rate_limiter: RateLimiter,
}

impl Geocoder {
    pub fn new(backend: Arc<dyn GeocodeBackend>, min_interval_ms: u64) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
            rate_limiter: RateLimiter::new(min_interval_ms),
        }
    }

    /// Resolve one city. Cached entries (including negative ones) return
    /// without touching the rate limiter or the backend.
    pub async fn resolve_city(&self, city: &str) -> Option<Coordinates> {
        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(city) {
                debug!(city = %city, hit = cached.is_some(), "Geocode cache hit");
                return *cached;
            }
        }

        self.rate_limiter.wait().await;

        let resolved = match self.backend.lookup(city).await {
            Ok(Some(coords)) => {
                info!(city = %city, lat = coords.lat, lng = coords.lng, "Geocoded city");
                Some(coords)
            }
            Ok(None) => {
                warn!(city = %city, "No geocoding result, caching negative entry");
                None
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Geocode lookup failed, caching negative entry");
                None
            }
        };

        self.cache.lock().await.insert(city.to_string(), resolved);
        resolved
    }

    /// Resolve a sequence of distinct cities in order. Only external lookups
    /// are spaced by the rate limit; cached hits pass straight through.
    pub async fn resolve_many(&self, cities: &[String]) -> HashMap<String, Option<Coordinates>> {
        let mut results = HashMap::with_capacity(cities.len());

        for city in cities {
            let coords = self.resolve_city(city).await;
            results.insert(city.clone(), coords);
        }

        results
    }
}
