use async_trait::async_trait;

use crate::{
    error::AeroError,
    http::{UpstreamHttp, endpoint},
    model::{CwaCode, RadiusNm, StationCode, UpstreamResponse},
    provider::join_ids,
};

use super::{ProviderId, WeatherProvider};

/// The older `cgi-bin/data/*.php` endpoint set. Station lists are sent with
/// a bare comma and discussion codes as `k<code>`.
#[derive(Debug, Clone)]
pub struct LegacyCgiProvider {
    http: UpstreamHttp,
    base_url: String,
}

impl LegacyCgiProvider {
    pub fn new(http: UpstreamHttp, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl WeatherProvider for LegacyCgiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Legacy
    }

    async fn fetch_metar(
        &self,
        stations: &[StationCode],
        include_taf: bool,
    ) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "cgi-bin/data/metar.php")?;

        let mut query = format!("ids={}&format=decoded", join_ids(stations, ","));
        if include_taf {
            query.push_str("&taf=on");
        }
        url.set_query(Some(&query));

        self.http.get(url, "legacy METAR").await
    }

    async fn fetch_pireps(
        &self,
        station: &StationCode,
        radius: RadiusNm,
    ) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "cgi-bin/data/pirep.php")?;
        url.query_pairs_mut()
            .append_pair("id", station.as_str())
            .append_pair("format", "decoded")
            .append_pair("distance", &radius.to_string());

        self.http.get(url, "legacy PIREP").await
    }

    async fn fetch_sigmet_airmet(&self) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "cgi-bin/data/airsigmet.php")?;
        url.query_pairs_mut().append_pair("format", "decoded");

        self.http.get(url, "legacy SIGMET/AIRMET").await
    }

    async fn fetch_winds_aloft(&self) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "cgi-bin/data/windtemp.php")?;
        url.query_pairs_mut()
            .append_pair("region", "us")
            .append_pair("level", "low")
            .append_pair("fcst", "12");

        self.http.get(url, "legacy winds aloft").await
    }

    async fn fetch_forecast_discussion(
        &self,
        cwa: &CwaCode,
    ) -> Result<UpstreamResponse, AeroError> {
        let mut url = endpoint(&self.base_url, "cgi-bin/data/fcstdisc.php")?;
        url.query_pairs_mut()
            .append_pair("cwa", &format!("k{}", cwa.as_str().to_ascii_lowercase()));

        self.http.get(url, "legacy forecast discussion").await
    }
}
