//! Client for the weather provider (OpenWeather). Two read-only endpoints:
//! a current-weather snapshot and a 5-day forecast feed at 3-hour
//! resolution. The combined fetch issues both concurrently and fails as a
//! whole if either leg fails; the caller then renders an empty weather view
//! instead of an error.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Coordinates, WeatherSample};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

const SERVICE: &str = "weather provider";

/// Unit system transmitted to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current conditions at a point, with the place name the provider
/// resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: Option<String>,
    pub sample: WeatherSample,
}

/// Current conditions joined with the 5-day forecast feed.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherBundle {
    pub current: CurrentWeather,
    pub forecast: Vec<WeatherSample>,
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    http: Client,
    api_key: String,
    units: Units,
    base_url: String,
}

impl WeatherService {
    pub fn new(api_key: String, units: Units) -> Self {
        Self::with_base_url(api_key, units, OPENWEATHER_URL.to_string())
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(api_key: String, units: Units, base_url: String) -> Self {
        Self { http: Client::new(), api_key, units, base_url }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Fetch the current-weather snapshot for a coordinate.
    pub async fn current(&self, coordinates: Coordinates) -> Result<CurrentWeather> {
        let url = format!("{}/weather", self.base_url);
        let parsed: OwCurrentResponse = self.fetch(&url, coordinates).await?;

        Ok(CurrentWeather {
            location_name: parsed.name,
            country: parsed.sys.and_then(|sys| sys.country),
            sample: to_sample(parsed.dt, parsed.main, parsed.wind, parsed.weather),
        })
    }

    /// Fetch the forecast feed: 3-hour-spaced samples covering 5 days, in
    /// provider order (chronological).
    pub async fn forecast(&self, coordinates: Coordinates) -> Result<Vec<WeatherSample>> {
        let url = format!("{}/forecast", self.base_url);
        let parsed: OwForecastResponse = self.fetch(&url, coordinates).await?;

        Ok(parsed
            .list
            .into_iter()
            .map(|entry| to_sample(entry.dt, entry.main, entry.wind, entry.weather))
            .collect())
    }

    /// Issue both fetches concurrently and join them. Both must succeed;
    /// either failing makes the whole result [`Error::WeatherUnavailable`].
    pub async fn current_and_forecast(&self, coordinates: Coordinates) -> Result<WeatherBundle> {
        let (current, forecast) =
            tokio::try_join!(self.current(coordinates), self.forecast(coordinates))
                .map_err(|source| Error::WeatherUnavailable(Box::new(source)))?;

        Ok(WeatherBundle { current, forecast })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        coordinates: Coordinates,
    ) -> Result<T> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();

        let res = self
            .http
            .get(url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", self.units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|source| Error::Network { service: SERVICE, source })?;

        res.json().await.map_err(|source| Error::Decode { service: SERVICE, source })
    }
}

fn to_sample(dt: i64, main: OwMain, wind: OwWind, weather: Vec<OwWeather>) -> WeatherSample {
    // The weather array can be empty; every field must stay displayable.
    let (weather_main, weather_icon) = weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.icon))
        .unwrap_or_default();

    WeatherSample {
        timestamp_utc: dt,
        temperature: main.temp,
        feels_like: main.feels_like,
        temp_min: main.temp_min,
        temp_max: main.temp_max,
        humidity: main.humidity,
        wind_speed: wind.speed,
        weather_main,
        weather_icon,
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: Option<OwSys>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}
