use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cityweather_core::{
    BookmarkStore, CityDirectory, Config, Coordinates, DEFAULT_COORDINATES, QuerySpec,
    SortDirection, SortField, Units, WeatherService, geo,
};

use crate::{browse, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City directory and weather forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Country,
    Timezone,
}

impl std::fmt::Display for SortArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortArg::Name => "name",
            SortArg::Country => "country",
            SortArg::Timezone => "timezone",
        })
    }
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::Country => SortField::Country,
            SortArg::Timezone => SortField::Timezone,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and unit preference.
    Configure,

    /// Print one page of the city directory.
    Cities {
        /// Free-text filter.
        #[arg(long)]
        search: Option<String>,

        /// Column to sort by.
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,

        /// Sort descending instead of ascending.
        #[arg(long)]
        desc: bool,

        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show current weather and the 5-day forecast.
    Weather {
        /// "lat,lon" coordinate pair. When absent the device location is
        /// used, falling back to the default location.
        coordinates: Option<String>,
    },

    /// List bookmarked cities.
    Bookmarks,

    /// Browse the city directory interactively.
    Browse,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Cities { search, sort, desc, page } => {
                cities(search, sort.into(), desc, page).await
            }
            Command::Weather { coordinates } => weather(coordinates).await,
            Command::Bookmarks => {
                let store = BookmarkStore::open_default()?;
                print!("{}", render::bookmark_list(&store));
                Ok(())
            }
            Command::Browse => browse::run().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let units = inquire::Select::new("Units:", vec![Units::Metric, Units::Imperial])
        .prompt()
        .context("Failed to read unit preference")?;
    config.set_units(units);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn cities(
    search: Option<String>,
    sort_field: SortField,
    desc: bool,
    page: u32,
) -> anyhow::Result<()> {
    let mut spec = QuerySpec::default();
    if let Some(text) = search {
        spec.search_changed(text);
    }
    spec.sort_field = sort_field;
    if desc {
        spec.sort_direction = SortDirection::Descending;
    }
    spec.page_number = page.max(1);

    let bookmarks = BookmarkStore::open_default()?;
    let directory = CityDirectory::new();

    // Failures stay silent apart from the log: the page renders empty.
    let rows = match directory.search(&spec).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(error = %err, "city query failed");
            Vec::new()
        }
    };

    print!("{}", render::city_table(&rows, &spec, &bookmarks));
    Ok(())
}

async fn weather(coordinates: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::new(config.weather_api_key()?, config.units());

    let coordinates = match coordinates {
        Some(raw) => raw
            .parse::<Coordinates>()
            .with_context(|| format!("Invalid coordinates '{raw}'"))?,
        None => match geo::detect_location().await {
            Ok(found) => found,
            Err(err) => {
                tracing::info!(error = %err, "using default location");
                DEFAULT_COORDINATES
            }
        },
    };

    match service.current_and_forecast(coordinates).await {
        Ok(bundle) => print!("{}", render::weather_view(&bundle, service.units())),
        // Weather failures render nothing rather than an error message.
        Err(err) => tracing::warn!(error = %err, "weather unavailable"),
    }

    Ok(())
}
