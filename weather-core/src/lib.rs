//! Core library for the weather lookup service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream provider abstraction and its OpenWeather implementation
//! - Shared domain models (coordinates, weather records)
//! - The location lookup flow and its error taxonomy
//!
//! It is used by `weather-web`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;

pub use config::{Config, Endpoints, ServerConfig};
pub use error::{ErrorKind, LookupError, ProviderError, Upstream};
pub use lookup::lookup;
pub use model::{Coordinates, WeatherRecord};
pub use provider::{WeatherProvider, provider_from_config};
