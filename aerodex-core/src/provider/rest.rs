use async_trait::async_trait;

use crate::{
    error::AeroError,
    http::{UpstreamHttp, endpoint},
    model::{CwaCode, RadiusNm, StationCode, UpstreamResponse},
    provider::join_ids,
};

use super::{ProviderId, WeatherProvider};

/// The current `api/data/*` endpoint set.
#[derive(Debug, Clone)]
pub struct RestProvider {
    http: UpstreamHttp,
    base_url: String,
}

impl RestProvider {
    pub fn new(http: UpstreamHttp, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl WeatherProvider for RestProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Rest
    }

    async fn fetch_metar(
        &self,
        stations: &[StationCode],
        include_taf: bool,
    ) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "api/data/metar")?;

        // The separator must reach the server percent-encoded.
        let mut query = format!("ids={}&format=decoded", join_ids(stations, "%2C"));
        if include_taf {
            query.push_str("&taf=on");
        }
        url.set_query(Some(&query));

        self.http.get(url, "METAR").await
    }

    async fn fetch_pireps(
        &self,
        station: &StationCode,
        radius: RadiusNm,
    ) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "api/data/pirep")?;
        url.query_pairs_mut()
            .append_pair("id", station.as_str())
            .append_pair("format", "decoded")
            .append_pair("distance", &radius.to_string());

        self.http.get(url, "PIREP").await
    }

    async fn fetch_sigmet_airmet(&self) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "api/data/airsigmet")?;
        url.query_pairs_mut()
            .append_pair("format", "decoded")
            .append_pair("level", "5000");

        self.http.get(url, "SIGMET/AIRMET").await
    }

    async fn fetch_winds_aloft(&self) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "api/data/windtemp")?;
        url.query_pairs_mut()
            .append_pair("region", "us")
            .append_pair("level", "low")
            .append_pair("fcst", "12");

        self.http.get(url, "winds aloft").await
    }

    async fn fetch_forecast_discussion(
        &self,
        cwa: &CwaCode,
    ) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "api/data/fcstdisc")?;
        url.query_pairs_mut()
            .append_pair("cwa", cwa.as_str())
            .append_pair("type", "afd");

        self.http.get(url, "forecast discussion").await
    }
}
