use crate::{
    Config,
    error::AeroError,
    http::UpstreamHttp,
    model::{CwaCode, RadiusNm, StationCode, UpstreamResponse},
    provider::{legacy::LegacyCgiProvider, rest::RestProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod legacy;
pub mod rest;

/// Which generation of the aviationweather.gov API to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// `cgi-bin/data/*.php` endpoints.
    Legacy,
    /// `api/data/*` endpoints.
    Rest,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Legacy => "legacy",
            ProviderId::Rest => "rest",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Legacy, ProviderId::Rest]
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::Legacy => "https://beta.aviationweather.gov",
            ProviderId::Rest => "https://aviationweather.gov",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "legacy" | "cgi" => Ok(ProviderId::Legacy),
            "rest" | "api" => Ok(ProviderId::Rest),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: legacy, rest."
            )),
        }
    }
}

/// One aviation-weather upstream. Each call is a single GET; empty bodies
/// come back as `Ok` and are judged by the normalizer.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Decoded METARs for every station, optionally with TAFs.
    async fn fetch_metar(
        &self,
        stations: &[StationCode],
        include_taf: bool,
    ) -> Result<UpstreamResponse, AeroError>;

    async fn fetch_pireps(
        &self,
        station: &StationCode,
        radius: RadiusNm,
    ) -> Result<UpstreamResponse, AeroError>;

    /// Combined decoded SIGMET and AIRMET text.
    async fn fetch_sigmet_airmet(&self) -> Result<UpstreamResponse, AeroError>;

    async fn fetch_winds_aloft(&self) -> Result<UpstreamResponse, AeroError>;

    async fn fetch_forecast_discussion(
        &self,
        cwa: &CwaCode,
    ) -> Result<UpstreamResponse, AeroError>;
}

/// Join station ids with the separator a provider expects in its query string.
pub(crate) fn join_ids(stations: &[StationCode], separator: &str) -> String {
    stations.iter().map(StationCode::as_str).collect::<Vec<_>>().join(separator)
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    http: UpstreamHttp,
) -> Box<dyn WeatherProvider> {
    let base_url = config.provider_base_url(id).to_owned();

    match id {
        ProviderId::Legacy => Box::new(LegacyCgiProvider::new(http, base_url)),
        ProviderId::Rest => Box::new(RestProvider::new(http, base_url)),
    }
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(
    config: &Config,
    http: UpstreamHttp,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    Ok(provider_from_config(id, config, http))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn http() -> UpstreamHttp {
        UpstreamHttp::new(Duration::from_secs(1)).expect("client builds")
    }

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let parsed = ProviderId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_accepts_aliases() {
        assert_eq!(ProviderId::try_from("CGI").unwrap(), ProviderId::Legacy);
        assert_eq!(ProviderId::try_from("api").unwrap(), ProviderId::Rest);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn join_ids_uses_separator() {
        let stations = StationCode::parse_list(&["jfk", "ttd"]).unwrap();
        assert_eq!(join_ids(&stations, "%2C"), "KJFK%2CKTTD");
        assert_eq!(join_ids(&stations, ","), "KJFK,KTTD");
    }

    #[test]
    fn default_provider_from_config_picks_rest() {
        let provider = default_provider_from_config(&Config::default(), http()).unwrap();
        assert_eq!(provider.id(), ProviderId::Rest);
    }

    #[test]
    fn provider_from_config_honours_id() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::Legacy);

        let provider = default_provider_from_config(&cfg, http()).unwrap();
        assert_eq!(provider.id(), ProviderId::Legacy);
    }
}
