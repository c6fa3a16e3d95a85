//! Interactive browse session: a prompt loop over the city table, driving
//! the table state machine and executing the fetch tickets it issues.
//!
//! Remote failures never end the session. A failed page fetch keeps the
//! rows already on screen; a failed weather fetch prints nothing. Only
//! prompt/terminal errors propagate.

use std::fmt;

use anyhow::Result;
use cityweather_core::{
    BookmarkStore, CityDirectory, CityRecord, CityTable, Config, Favorites, FetchTicket,
    SortField, WeatherService, geo,
};
use inquire::{Select, Text};

use crate::render;

enum Action {
    Search,
    Sort,
    NextPage,
    PreviousPage,
    OpenCity,
    ToggleBookmark,
    Favorites,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Search => "Search cities",
            Action::Sort => "Sort",
            Action::NextPage => "Next page",
            Action::PreviousPage => "Previous page",
            Action::OpenCity => "Open a city's weather",
            Action::ToggleBookmark => "Toggle bookmark",
            Action::Favorites => "Favorites",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

enum SortChoice {
    Name,
    Country,
    Timezone,
}

impl fmt::Display for SortChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortChoice::Name => "Name",
            SortChoice::Country => "Country",
            SortChoice::Timezone => "Timezone",
        })
    }
}

impl From<SortChoice> for SortField {
    fn from(choice: SortChoice) -> Self {
        match choice {
            SortChoice::Name => SortField::Name,
            SortChoice::Country => SortField::Country,
            SortChoice::Timezone => SortField::Timezone,
        }
    }
}

struct CityChoice {
    index: usize,
    label: String,
}

impl fmt::Display for CityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let weather = match config.weather_api_key() {
        Ok(api_key) => Some(WeatherService::new(api_key, config.units())),
        Err(err) => {
            tracing::warn!(error = %err, "weather view disabled");
            None
        }
    };

    let directory = CityDirectory::new();
    let mut bookmarks = BookmarkStore::open_default()?;
    let mut favorites = Favorites::new();
    let mut table = CityTable::new();

    // Mount: the initial page fetch and the device-location lookup run
    // concurrently, with no ordering dependency between them.
    let ticket = table.initial_fetch();
    let (page, located) = tokio::join!(directory.search(&ticket.spec), geo::detect_location());

    match page {
        Ok(rows) => table.fetch_completed(ticket.generation, rows),
        Err(err) => {
            tracing::warn!(error = %err, "initial city fetch failed");
            table.fetch_failed(ticket.generation);
        }
    }

    match located {
        Ok(coordinates) => {
            table.set_location_available(true);
            if let Some(service) = &weather {
                match service.current(coordinates).await {
                    Ok(current) => {
                        println!("{}", render::current_header(&current, service.units()));
                    }
                    Err(err) => tracing::warn!(error = %err, "local weather unavailable"),
                }
            }
        }
        Err(_) => {
            table.set_location_available(false);
            tracing::debug!("device location unavailable, skipping local weather");
        }
    }

    loop {
        print!("{}", render::city_table(table.rows(), table.query(), &bookmarks));

        let action = Select::new(
            "Action:",
            vec![
                Action::Search,
                Action::Sort,
                Action::NextPage,
                Action::PreviousPage,
                Action::OpenCity,
                Action::ToggleBookmark,
                Action::Favorites,
                Action::Quit,
            ],
        )
        .prompt()?;

        match action {
            Action::Search => {
                let text = Text::new("Search cities:").prompt()?;
                let ticket = table.search_text_changed(text);
                execute(&directory, &mut table, ticket).await;
            }
            Action::Sort => {
                let choice = Select::new(
                    "Sort by:",
                    vec![SortChoice::Name, SortChoice::Country, SortChoice::Timezone],
                )
                .prompt()?;
                let ticket = table.sort_requested(choice.into());
                execute(&directory, &mut table, ticket).await;
            }
            Action::NextPage => {
                let ticket = table.page_next();
                execute(&directory, &mut table, ticket).await;
            }
            Action::PreviousPage => {
                let ticket = table.page_previous();
                execute(&directory, &mut table, ticket).await;
            }
            Action::OpenCity => {
                let Some(city) = pick_city(table.rows())? else { continue };
                match &weather {
                    Some(service) => match service.current_and_forecast(city.coordinates).await {
                        Ok(bundle) => print!("{}", render::weather_view(&bundle, service.units())),
                        Err(err) => tracing::warn!(error = %err, city = %city.name, "weather unavailable"),
                    },
                    None => println!("Weather view disabled. Run `cityweather configure` first."),
                }
            }
            Action::ToggleBookmark => {
                let Some(city) = pick_city(table.rows())? else { continue };
                if bookmarks.toggle(&city)? {
                    println!("Bookmarked {}.", city.name);
                } else {
                    println!("Removed bookmark for {}.", city.name);
                }
            }
            Action::Favorites => favorites_menu(&mut favorites)?,
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn execute(directory: &CityDirectory, table: &mut CityTable, ticket: FetchTicket) {
    match directory.search(&ticket.spec).await {
        Ok(rows) => table.fetch_completed(ticket.generation, rows),
        Err(err) => {
            tracing::warn!(error = %err, "city fetch failed");
            table.fetch_failed(ticket.generation);
        }
    }
}

fn pick_city(rows: &[CityRecord]) -> Result<Option<CityRecord>> {
    if rows.is_empty() {
        println!("No cities on this page.");
        return Ok(None);
    }

    let choices = rows
        .iter()
        .enumerate()
        .map(|(index, city)| CityChoice {
            index,
            label: format!("{} ({})", city.name, city.country_name),
        })
        .collect();

    let choice = Select::new("City:", choices).prompt()?;
    Ok(Some(rows[choice.index].clone()))
}

fn favorites_menu(favorites: &mut Favorites) -> Result<()> {
    if favorites.list().is_empty() {
        println!("No favorites yet.");
    } else {
        for name in favorites.list() {
            println!("  {name}");
        }
    }

    match Select::new("Favorites:", vec!["Add", "Remove", "Back"]).prompt()? {
        "Add" => {
            let name = Text::new("City name:").prompt()?;
            favorites.add(name);
        }
        "Remove" => {
            if favorites.list().is_empty() {
                return Ok(());
            }
            let name = Select::new("Remove which?", favorites.list().to_vec()).prompt()?;
            favorites.remove(&name);
        }
        _ => {}
    }

    Ok(())
}
