//! Plain-text rendering of city pages and weather views.

use chrono::NaiveDate;
use cityweather_core::{
    BookmarkStore, CityRecord, CurrentWeather, DailyForecastSummary, QuerySpec, SortDirection,
    SortField, Units, WeatherBundle, aggregate_daily,
};

/// One page of the city table. Bookmarked rows are starred; the active sort
/// column carries a direction arrow.
pub fn city_table(rows: &[CityRecord], spec: &QuerySpec, bookmarks: &BookmarkStore) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "   {:<28} {:<24} {:<28} {}\n",
        column_header("City", SortField::Name, spec),
        column_header("Country", SortField::Country, spec),
        column_header("Timezone", SortField::Timezone, spec),
        "Coordinates"
    ));

    if rows.is_empty() {
        out.push_str("   (no rows)\n");
    }
    for city in rows {
        let marker = if bookmarks.is_bookmarked(&city.record_id) { '*' } else { ' ' };
        out.push_str(&format!(
            " {} {:<28} {:<24} {:<28} {}\n",
            marker, city.name, city.country_name, city.timezone, city.coordinates
        ));
    }

    out.push_str(&format!(
        "   page {}{}\n",
        spec.page_number,
        if spec.search_text.is_empty() {
            String::new()
        } else {
            format!(", search \"{}\"", spec.search_text)
        }
    ));

    out
}

fn column_header(label: &str, field: SortField, spec: &QuerySpec) -> String {
    if spec.sort_field != field {
        return label.to_string();
    }
    let arrow = match spec.sort_direction {
        SortDirection::Ascending => '^',
        SortDirection::Descending => 'v',
    };
    format!("{label} {arrow}")
}

/// One-line summary of the current conditions at the device location.
pub fn current_header(current: &CurrentWeather, units: Units) -> String {
    let place = match &current.country {
        Some(country) => format!("{}, {}", current.location_name, country),
        None => current.location_name.clone(),
    };
    format!(
        "Your location: {} — {}{} {} {}",
        place,
        current.sample.temperature.round() as i64,
        units.temperature_symbol(),
        icon_glyph(&current.sample.weather_icon),
        current.sample.weather_main
    )
}

/// Full weather view: current conditions plus the aggregated daily
/// forecast. An empty forecast feed renders no forecast lines at all.
pub fn weather_view(bundle: &WeatherBundle, units: Units) -> String {
    let mut out = String::new();
    let current = &bundle.current;
    let sample = &current.sample;
    let sym = units.temperature_symbol();

    let place = match &current.country {
        Some(country) => format!("{}, {}", current.location_name, country),
        None => current.location_name.clone(),
    };

    out.push_str(&format!("{place}\n"));
    out.push_str(&format!(
        "{}{} {} {}\n",
        sample.temperature.round() as i64,
        sym,
        icon_glyph(&sample.weather_icon),
        sample.weather_main
    ));
    out.push_str(&format!(
        "feels like {}{}  humidity {}%  wind {} {}\n",
        sample.feels_like.round() as i64,
        sym,
        sample.humidity.round() as i64,
        sample.wind_speed.round() as i64,
        units.wind_speed_unit()
    ));
    out.push_str(&format!(
        "min {}{}  max {}{}\n",
        sample.temp_min.round() as i64,
        sym,
        sample.temp_max.round() as i64,
        sym
    ));

    let daily = aggregate_daily(&bundle.forecast);
    if !daily.is_empty() {
        out.push_str("\nFive-day forecast:\n");
        for day in &daily {
            out.push_str(&forecast_line(day, units));
            out.push('\n');
        }
    }

    out
}

fn forecast_line(day: &DailyForecastSummary, units: Units) -> String {
    format!(
        "  {:<12} {:>4}{} {} {}",
        display_date(day.calendar_date),
        day.display_temperature(),
        units.temperature_symbol(),
        icon_glyph(&day.weather_icon),
        day.weather_main
    )
}

fn display_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

pub fn bookmark_list(bookmarks: &BookmarkStore) -> String {
    if bookmarks.list().is_empty() {
        return "No bookmarks added.\n".to_string();
    }

    let mut out = String::new();
    for city in bookmarks.list() {
        out.push_str(&format!(
            "  {:<28} {:<24} {}\n",
            city.name, city.country_name, city.coordinates
        ));
    }
    out
}

/// Glyph for an OpenWeather icon code. Unknown codes render as nothing.
fn icon_glyph(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "☀",
        "01n" => "🌙",
        "02d" | "03d" | "04d" => "⛅",
        "02n" | "03n" | "04n" => "☁",
        "09d" | "10d" => "🌦",
        "09n" | "10n" => "🌧",
        "11d" | "11n" => "⛈",
        "13d" | "13n" => "❄",
        "50d" | "50n" => "🌫",
        _ => "·",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityweather_core::{Coordinates, WeatherSample};
    use tempfile::TempDir;

    fn city(record_id: &str, name: &str) -> CityRecord {
        CityRecord {
            record_id: record_id.to_string(),
            name: name.to_string(),
            country_name: "France".to_string(),
            timezone: "Europe/Paris".to_string(),
            coordinates: Coordinates { latitude: 48.85, longitude: 2.35 },
        }
    }

    fn sample(temperature: f64) -> WeatherSample {
        WeatherSample {
            timestamp_utc: 1_717_200_000,
            temperature,
            feels_like: temperature - 0.6,
            temp_min: temperature - 2.0,
            temp_max: temperature + 2.0,
            humidity: 62.0,
            wind_speed: 4.2,
            weather_main: "Clouds".to_string(),
            weather_icon: "03d".to_string(),
        }
    }

    #[test]
    fn table_marks_bookmarked_rows_and_shows_sort_arrow() {
        let dir = TempDir::new().expect("tempdir");
        let mut bookmarks = BookmarkStore::open(dir.path().join("bookmarks.json"));
        let paris = city("a", "Paris");
        bookmarks.toggle(&paris).expect("toggle");

        let rows = vec![paris, city("b", "Lyon")];
        let rendered = city_table(&rows, &QuerySpec::default(), &bookmarks);

        assert!(rendered.contains("City ^"));
        assert!(rendered.contains(" * Paris"));
        assert!(rendered.contains("   Lyon"));
        assert!(rendered.contains("page 1"));
    }

    #[test]
    fn empty_page_renders_a_placeholder() {
        let dir = TempDir::new().expect("tempdir");
        let bookmarks = BookmarkStore::open(dir.path().join("bookmarks.json"));
        let rendered = city_table(&[], &QuerySpec::default(), &bookmarks);
        assert!(rendered.contains("(no rows)"));
    }

    #[test]
    fn weather_view_rounds_temperatures_and_lists_days() {
        let bundle = WeatherBundle {
            current: CurrentWeather {
                location_name: "Paris".to_string(),
                country: Some("FR".to_string()),
                sample: sample(18.4),
            },
            forecast: vec![sample(10.2), sample(11.8)],
        };

        let rendered = weather_view(&bundle, Units::Metric);
        assert!(rendered.contains("Paris, FR"));
        assert!(rendered.contains("18°C"));
        assert!(rendered.contains("11°C"), "daily mean of 10.2 and 11.8 displays as 11");
        assert!(rendered.contains("Five-day forecast:"));
        assert!(rendered.contains("Sat, Jun 1"));
    }

    #[test]
    fn weather_view_with_empty_feed_has_no_forecast_section() {
        let bundle = WeatherBundle {
            current: CurrentWeather {
                location_name: "Paris".to_string(),
                country: None,
                sample: sample(18.4),
            },
            forecast: Vec::new(),
        };

        let rendered = weather_view(&bundle, Units::Metric);
        assert!(!rendered.contains("Five-day forecast:"));
    }

    #[test]
    fn icon_glyphs_cover_day_and_night_codes() {
        assert_eq!(icon_glyph("01d"), "☀");
        assert_eq!(icon_glyph("01n"), "🌙");
        assert_eq!(icon_glyph("04d"), "⛅");
        assert_eq!(icon_glyph("10n"), "🌧");
        assert_eq!(icon_glyph("unknown"), "·");
    }
}
