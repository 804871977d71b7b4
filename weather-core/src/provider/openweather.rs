use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    config::Endpoints,
    error::{ProviderError, Upstream},
    model::{Coordinates, WeatherRecord},
};

use super::WeatherProvider;

/// OpenWeather geocoding + One Call client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, endpoints: Endpoints, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            endpoints,
            timeout,
            http,
        })
    }

    /// GET `url` with `query` and decode a JSON body, mapping every failure
    /// onto [`ProviderError`] for `upstream`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        upstream: Upstream,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.request_error(upstream, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.request_error(upstream, e))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                upstream,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { upstream, source })
    }

    /// The request URL carries `appid`, so it is stripped before the error can be
    /// displayed or logged.
    fn request_error(&self, upstream: Upstream, source: reqwest::Error) -> ProviderError {
        let source = source.without_url();
        if source.is_timeout() {
            ProviderError::Timeout {
                upstream,
                after: self.timeout,
            }
        } else {
            ProviderError::Request { upstream, source }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    temp: f64,
    wind_speed: f64,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    current: Option<OwCurrent>,
}

impl OwCurrent {
    fn into_record(self, coordinates: Coordinates) -> WeatherRecord {
        WeatherRecord {
            latitude: coordinates.lat,
            longitude: coordinates.lon,
            temperature: self.temp,
            wind_speed: self.wind_speed,
            precipitation: self.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            location: coordinates.label(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve(&self, location: &str) -> Result<Option<Coordinates>, ProviderError> {
        let matches: Vec<OwGeoMatch> = self
            .get_json(
                Upstream::Geocoding,
                &self.endpoints.geocoding_url,
                &[("q", location), ("appid", self.api_key.as_str())],
            )
            .await?;

        let first = matches.into_iter().next().map(|m| Coordinates::new(m.lat, m.lon));

        match &first {
            Some(coords) => tracing::debug!(location, %coords, "Resolved location"),
            None => tracing::debug!(location, "Geocoding returned no matches"),
        }

        Ok(first)
    }

    async fn current(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<WeatherRecord>, ProviderError> {
        let lat = coordinates.lat.to_string();
        let lon = coordinates.lon.to_string();

        let parsed: OwOneCallResponse = self
            .get_json(
                Upstream::Weather,
                &self.endpoints.weather_url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        Ok(parsed.current.map(|current| current.into_record(coordinates)))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
