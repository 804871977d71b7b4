use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as returned by the geocoding API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Display string used in place of a resolved place name.
    pub fn label(&self) -> String {
        format!("Lat: {}, Lon: {}", self.lat, self.lon)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Current conditions for one pair of coordinates, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Metres per second.
    pub wind_speed: f64,
    /// Rain over the last hour in millimetres, 0 when not reported.
    pub precipitation: f64,
    pub location: String,
}

impl WeatherRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
