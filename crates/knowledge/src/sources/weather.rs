//! Weather — Open-Meteo geocoding plus current conditions.
//!
//! Only answers queries that mention a weather word. The city is whatever
//! remains once weather words and filler are removed.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use voxbot_config::WeatherConfig;
use voxbot_core::error::SourceError;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};

use super::{fetch_body, http_client, mentions_any, parse_json, words};

/// Words that route a query to the weather source.
pub const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "climate",
    "rain",
    "wind",
    "forecast",
    "cold",
    "hot",
];

const FILLER: &[&str] = &[
    "what", "what's", "whats", "how", "how's", "is", "it", "the", "in", "at", "for", "of", "like", "today",
    "today's", "now", "right", "current", "currently", "tell", "me", "about", "will", "be", "going", "to", "a",
    "there", "any", "outside", "does", "do", "please",
];

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,precipitation";

pub struct WeatherSource {
    geocoding_url: String,
    forecast_url: String,
    default_city: String,
    client: reqwest::Client,
}

impl WeatherSource {
    pub fn new(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        default_city: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
            default_city: default_city.into(),
            client: http_client(timeout),
        }
    }

    pub fn from_config(config: &WeatherConfig, timeout: Duration) -> Self {
        Self::new(
            &config.geocoding_url,
            &config.forecast_url,
            &config.default_city,
            timeout,
        )
    }
}

/// Whether the query is about the weather at all.
pub fn is_weather_query(query: &str) -> bool {
    mentions_any(query, WEATHER_KEYWORDS)
}

/// The place named in a weather query, or `default_city` when fewer than two
/// characters are left after stripping.
pub fn extract_city(query: &str, default_city: &str) -> String {
    let city = words(query)
        .filter(|w| !WEATHER_KEYWORDS.contains(&w.as_str()) && !FILLER.contains(&w.as_str()))
        .collect::<Vec<_>>()
        .join(" ");

    if city.chars().count() < 2 {
        default_city.to_string()
    } else {
        city
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

/// A geocoded location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The first geocoding hit, if any.
pub fn parse_place(body: &str) -> Result<Option<Place>, SourceError> {
    let response: GeocodingResponse = parse_json(body)?;
    Ok(response.results.into_iter().next())
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    #[serde(default)]
    precipitation: f64,
}

/// Format current conditions for a place.
pub fn format_conditions(place: &Place, body: &str) -> Result<String, SourceError> {
    let forecast: ForecastResponse = parse_json(body)?;
    let c = forecast.current;
    Ok(format!(
        "Current weather in {}, {}: {}°C, Humidity: {}%, Wind Speed: {} km/h, Precipitation: {}mm",
        place.name, place.country, c.temperature_2m, c.relative_humidity_2m, c.wind_speed_10m, c.precipitation
    ))
}

#[async_trait]
impl KnowledgeSource for WeatherSource {
    fn name(&self) -> &str {
        "weather"
    }

    async fn query(&self, query: &str) -> Result<SourceAnswer, SourceError> {
        if !is_weather_query(query) {
            return Ok(SourceAnswer::NoAnswer);
        }

        let city = extract_city(query, &self.default_city);
        debug!(source = "weather", %city, "Geocoding");

        let request = self.client.get(&self.geocoding_url).query(&[
            ("name", city.as_str()),
            ("count", "1"),
            ("language", "en"),
        ]);
        let Some(place) = parse_place(&fetch_body(request).await?)? else {
            debug!(source = "weather", %city, "Unknown place");
            return Ok(SourceAnswer::NoAnswer);
        };

        let request = self.client.get(&self.forecast_url).query(&[
            ("latitude", place.latitude.to_string()),
            ("longitude", place.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
        ]);
        let body = fetch_body(request).await?;
        Ok(SourceAnswer::Answer(format_conditions(&place, &body)?))
    }
}
