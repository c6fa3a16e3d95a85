//! Reduction of the 3-hourly forecast feed into one summary per calendar
//! day.
//!
//! Day boundaries are taken in UTC: a sample belongs to the calendar date
//! of its UTC timestamp. Using a fixed zone keeps the grouping identical
//! for every user regardless of the host machine's local timezone.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{DailyForecastSummary, WeatherSample};

struct DayGroup {
    date: NaiveDate,
    temperature_sum: f64,
    sample_count: u32,
    weather_main: String,
    weather_icon: String,
}

/// Group samples by UTC calendar date, in first-seen order, averaging each
/// day's temperatures. The day's representative weather is the weather of
/// the chronologically first sample in the group, first-wins.
///
/// An empty feed produces an empty result; it is never an error.
pub fn aggregate_daily(samples: &[WeatherSample]) -> Vec<DailyForecastSummary> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for sample in samples {
        let Some(timestamp) = DateTime::<Utc>::from_timestamp(sample.timestamp_utc, 0) else {
            tracing::warn!(timestamp = sample.timestamp_utc, "skipping out-of-range sample");
            continue;
        };
        let date = timestamp.date_naive();

        match groups.iter_mut().find(|group| group.date == date) {
            Some(group) => {
                group.temperature_sum += sample.temperature;
                group.sample_count += 1;
            }
            None => groups.push(DayGroup {
                date,
                temperature_sum: sample.temperature,
                sample_count: 1,
                weather_main: sample.weather_main.clone(),
                weather_icon: sample.weather_icon.clone(),
            }),
        }
    }

    groups
        .into_iter()
        .map(|group| DailyForecastSummary {
            calendar_date: group.date,
            average_temperature: group.temperature_sum / f64::from(group.sample_count),
            weather_main: group.weather_main,
            weather_icon: group.weather_icon,
        })
        .collect()
}
