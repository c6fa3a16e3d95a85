//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - The city-directory query engine (search, sort, paginate) and the
//!   table state machine driving it
//! - Weather fetching (current + 5-day forecast) and the daily forecast
//!   aggregation
//! - Bookmark persistence and session favorites
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries
//! or services.

pub mod bookmarks;
pub mod cities;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod geo;
pub mod model;
pub mod query;
pub mod table;
pub mod weather;

pub use bookmarks::BookmarkStore;
pub use cities::CityDirectory;
pub use config::Config;
pub use error::{Error, Result};
pub use favorites::Favorites;
pub use forecast::aggregate_daily;
pub use model::{
    Bookmark, CityRecord, Coordinates, DEFAULT_COORDINATES, DailyForecastSummary, WeatherSample,
};
pub use query::{PAGE_SIZE, QuerySpec, SortDirection, SortField};
pub use table::{CityTable, FetchTicket};
pub use weather::{CurrentWeather, Units, WeatherBundle, WeatherService};
