use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fallback location used when no coordinate is given and the device
/// location is unavailable.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates { latitude: 35.0, longitude: 139.0 };

/// A geographic point. Displays as the `"lat,lon"` coordinate string that
/// addresses a city's weather view, and parses back from the same form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinates {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or(CoordinateParseError)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| CoordinateParseError)?;
        let longitude: f64 = lon.trim().parse().map_err(|_| CoordinateParseError)?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateParseError);
        }

        Ok(Self { latitude, longitude })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected a \"lat,lon\" coordinate pair")]
pub struct CoordinateParseError;

/// One row of the city directory, as returned by the dataset service.
/// Immutable once fetched; replaced wholesale on the next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub record_id: String,
    pub name: String,
    pub country_name: String,
    pub timezone: String,
    pub coordinates: Coordinates,
}

/// A persisted favorite city. Identity is `record_id`.
pub type Bookmark = CityRecord;

/// One weather snapshot. A single sample is the current weather; a sequence
/// of 3-hour-spaced samples is the forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp_utc: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub weather_main: String,
    pub weather_icon: String,
}

/// One aggregated forecast day: mean temperature plus the weather of the
/// day's first sample. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastSummary {
    pub calendar_date: NaiveDate,
    pub average_temperature: f64,
    pub weather_main: String,
    pub weather_icon: String,
}

impl DailyForecastSummary {
    /// Temperature as shown to the user: mean rounded to the nearest
    /// integer, halves away from zero.
    pub fn display_temperature(&self) -> i64 {
        self.average_temperature.round() as i64
    }
}
