use std::time::Duration;

use thiserror::Error;

use crate::model::Coordinates;

/// Which external API a failed call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Geocoding,
    Weather,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Geocoding => "geocoding",
            Upstream::Weather => "weather",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure talking to one of the upstream APIs.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to send request to the {upstream} API: {source}")]
    Request {
        upstream: Upstream,
        #[source]
        source: reqwest::Error,
    },

    #[error("The {upstream} API did not respond within {}s", .after.as_secs())]
    Timeout { upstream: Upstream, after: Duration },

    #[error("The {upstream} API request failed with status {status}: {body}")]
    Status {
        upstream: Upstream,
        status: u16,
        body: String,
    },

    #[error("Failed to parse the {upstream} API response: {source}")]
    Decode {
        upstream: Upstream,
        #[source]
        source: serde_json::Error,
    },
}

impl ProviderError {
    pub fn upstream(&self) -> Upstream {
        match self {
            ProviderError::Request { upstream, .. }
            | ProviderError::Timeout { upstream, .. }
            | ProviderError::Status { upstream, .. }
            | ProviderError::Decode { upstream, .. } => *upstream,
        }
    }
}

/// Broad class of a lookup failure; the web layer maps each to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Upstream,
}

/// Why a location lookup stopped short of producing a [`crate::WeatherRecord`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Location is required")]
    MissingLocation,

    #[error("Could not find coordinates for '{0}'")]
    LocationNotFound(String),

    #[error("No current weather data for {0}")]
    WeatherNotFound(Coordinates),

    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::MissingLocation => ErrorKind::Validation,
            LookupError::LocationNotFound(_) | LookupError::WeatherNotFound(_) => {
                ErrorKind::NotFound
            }
            LookupError::Upstream(_) => ErrorKind::Upstream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_classify_into_three_kinds() {
        assert_eq!(LookupError::MissingLocation.kind(), ErrorKind::Validation);
        assert_eq!(
            LookupError::LocationNotFound("Atlantis".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LookupError::WeatherNotFound(Coordinates::new(1.0, 2.0)).kind(),
            ErrorKind::NotFound
        );

        let upstream = ProviderError::Timeout {
            upstream: Upstream::Weather,
            after: Duration::from_secs(10),
        };
        assert_eq!(LookupError::from(upstream).kind(), ErrorKind::Upstream);
    }

    #[test]
    fn upstream_error_message_is_surfaced_verbatim() {
        let err = LookupError::from(ProviderError::Status {
            upstream: Upstream::Geocoding,
            status: 401,
            body: "Invalid API key".to_string(),
        });

        assert_eq!(
            err.to_string(),
            "The geocoding API request failed with status 401: Invalid API key"
        );
    }

    #[test]
    fn timeout_message_names_the_upstream() {
        let err = ProviderError::Timeout {
            upstream: Upstream::Geocoding,
            after: Duration::from_secs(7),
        };
        assert_eq!(err.upstream(), Upstream::Geocoding);
        assert_eq!(err.to_string(), "The geocoding API did not respond within 7s");
    }
}
