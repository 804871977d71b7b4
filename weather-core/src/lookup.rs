use crate::{
    error::LookupError,
    model::WeatherRecord,
    provider::WeatherProvider,
};

/// Validate `location`, resolve it and fetch current weather for the result.
///
/// Stops at the first stage that fails; see [`LookupError`] for the outcomes.
pub async fn lookup(
    provider: &dyn WeatherProvider,
    location: &str,
) -> Result<WeatherRecord, LookupError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(LookupError::MissingLocation);
    }

    let coordinates = provider
        .resolve(location)
        .await
        .inspect_err(|e| tracing::debug!(location, error = %e, "Coordinate lookup failed"))?
        .ok_or_else(|| LookupError::LocationNotFound(location.to_string()))?;

    let record = provider
        .current(coordinates)
        .await
        .inspect_err(|e| tracing::debug!(%coordinates, error = %e, "Weather lookup failed"))?
        .ok_or(LookupError::WeatherNotFound(coordinates))?;

    tracing::info!(
        location,
        temperature = record.temperature,
        wind_speed = record.wind_speed,
        precipitation = record.precipitation,
        "Weather lookup succeeded"
    );

    Ok(record)
}
