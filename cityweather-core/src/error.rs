use std::path::PathBuf;

/// Errors produced by the core operations.
///
/// All of these degrade gracefully at the call site: a failed city refetch
/// keeps the previous page, a failed weather fetch renders an empty view, a
/// missing device location skips the weather header. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never completed (connect, timeout, non-success status).
    #[error("request to {service} failed")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but was not the expected shape.
    #[error("could not decode {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Either of the two weather sub-fetches (current, forecast) failed.
    #[error("weather data unavailable")]
    WeatherUnavailable(#[source] Box<Error>),

    /// Device location could not be determined.
    #[error("device location unavailable")]
    GeolocationUnavailable,

    /// The bookmark file could not be written back.
    #[error("failed to persist bookmarks to {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
