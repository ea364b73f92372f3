use anyhow::Result;

use crate::{
    Config,
    error::AeroError,
    http::{UpstreamHttp, endpoint},
    model::Airport,
};

const CITY_NOT_FOUND: &str = "Seems like this city is not available.";

/// API-key gated airport lookup by city name.
#[derive(Debug, Clone)]
pub struct AirportDirectory {
    http: UpstreamHttp,
    base_url: String,
    api_key: String,
}

impl AirportDirectory {
    pub fn new(http: UpstreamHttp, base_url: String, api_key: String) -> Self {
        Self { http, base_url, api_key }
    }

    pub fn from_config(config: &Config, http: UpstreamHttp) -> Result<Self> {
        let api_key = config.airports_api_key()?.to_owned();
        Ok(Self::new(http, config.airports_base_url().to_owned(), api_key))
    }

    pub async fn fetch_airport(&self, city: &str) -> Result<Vec<Airport>, AeroError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AeroError::validation("A city name is required, e.g. Houston."));
        }

        let mut url = endpoint(&self.base_url, "v1/airports")?;
        url.query_pairs_mut().append_pair("name", city);

        let res = self
            .http
            .get_with_headers(url, "airport directory", &[("X-Api-Key", self.api_key.as_str())])
            .await?;

        let airports: Vec<Airport> = res.json()?;
        if airports.is_empty() {
            tracing::warn!(city, "airport directory returned no records");
            return Err(AeroError::not_found(CITY_NOT_FOUND));
        }

        Ok(airports)
    }
}
