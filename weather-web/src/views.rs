//! HTML pages rendered with askama. Templates live in `templates/`.

use askama::Template;
use weather_core::WeatherRecord;

/// Landing page with the location form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView;

/// Result page: the weather record plus an optional map centred on it.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapView<'a> {
    pub record: &'a WeatherRecord,
    pub maps_api_key: Option<&'a str>,
}

impl MapView<'_> {
    fn temperature(&self) -> String {
        reading(self.record.temperature)
    }

    fn wind_speed(&self) -> String {
        reading(self.record.wind_speed)
    }

    fn precipitation(&self) -> String {
        reading(self.record.precipitation)
    }
}

/// Upstream value unrounded; whole numbers keep one decimal place (`25.0`).
pub fn reading(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
