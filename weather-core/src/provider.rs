use crate::{
    Config,
    error::ProviderError,
    model::{Coordinates, WeatherRecord},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Access to the two upstream services a lookup needs.
///
/// `Ok(None)` means the upstream answered but had nothing for the input;
/// transport, status and decoding failures are `Err`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text location to the first matching coordinates.
    async fn resolve(&self, location: &str) -> Result<Option<Coordinates>, ProviderError>;

    /// Fetch current conditions at `coordinates`.
    async fn current(&self, coordinates: Coordinates)
    -> Result<Option<WeatherRecord>, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.endpoints.clone(),
        config.timeout(),
    )?;

    Ok(Box::new(provider))
}
