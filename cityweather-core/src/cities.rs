//! Client for the public city dataset (geonames, cities with population
//! over 1000). Filtering, sorting and paging are fully delegated to the
//! service: every change of the query state is a fresh round-trip, there is
//! no client-side cache of the dataset.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{CityRecord, Coordinates};
use crate::query::{PAGE_SIZE, QuerySpec};

pub const CITY_DATASET_URL: &str = "https://public.opendatasoft.com/api/records/1.0/search/";

const DATASET_ID: &str = "geonames-all-cities-with-a-population-1000";
const SERVICE: &str = "city directory";

#[derive(Debug, Clone)]
pub struct CityDirectory {
    http: Client,
    base_url: String,
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl CityDirectory {
    pub fn new() -> Self {
        Self::with_base_url(CITY_DATASET_URL.to_string())
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(base_url: String) -> Self {
        Self { http: Client::new(), base_url }
    }

    /// Fetch one page of city records for the given query. Returns at most
    /// [`PAGE_SIZE`] rows. No retry; the caller keeps its previous page on
    /// failure.
    pub async fn search(&self, spec: &QuerySpec) -> Result<Vec<CityRecord>> {
        let sort = spec.sort_param();
        let rows = PAGE_SIZE.to_string();
        let start = spec.offset().to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("dataset", DATASET_ID),
                ("q", spec.search_text.as_str()),
                ("sort", sort.as_str()),
                ("rows", rows.as_str()),
                ("start", start.as_str()),
            ])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|source| Error::Network { service: SERVICE, source })?;

        let parsed: SearchResponse = res
            .json()
            .await
            .map_err(|source| Error::Decode { service: SERVICE, source })?;

        tracing::debug!(
            rows = parsed.records.len(),
            page = spec.page_number,
            "city page fetched"
        );

        Ok(parsed.records.into_iter().map(DatasetRecord::into_city).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    records: Vec<DatasetRecord>,
}

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    recordid: String,
    fields: DatasetFields,
}

#[derive(Debug, Deserialize)]
struct DatasetFields {
    name: String,
    cou_name_en: String,
    timezone: String,
    /// Delivered as `[latitude, longitude]`.
    coordinates: [f64; 2],
}

impl DatasetRecord {
    fn into_city(self) -> CityRecord {
        CityRecord {
            record_id: self.recordid,
            name: self.fields.name,
            country_name: self.fields.cou_name_en,
            timezone: self.fields.timezone,
            coordinates: Coordinates {
                latitude: self.fields.coordinates[0],
                longitude: self.fields.coordinates[1],
            },
        }
    }
}
