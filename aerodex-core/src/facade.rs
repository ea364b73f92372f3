//! Entry points for the inbound layer, one per request type.
//!
//! The facade validates the request, makes the single upstream call through
//! the configured [`WeatherProvider`], normalizes the reply and maps failures
//! to HTTP status codes. It keeps no state between calls.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    Config,
    airport::AirportDirectory,
    error::AeroError,
    http::UpstreamHttp,
    model::{Airport, CwaCode, Payload, RadiusNm, ResultEnvelope, StationCode, WeatherQuery},
    normalize::{Guidance, Normalizer, split_sigmet_airmet},
    provider::{WeatherProvider, default_provider_from_config},
};

/// Range as sent by clients: either a number or numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RangeField {
    Number(serde_json::Number),
    Text(String),
}

impl RangeField {
    fn to_radius(&self) -> Result<RadiusNm, AeroError> {
        match self {
            RangeField::Number(n) => {
                let nm = n.as_u64().and_then(|v| u32::try_from(v).ok()).ok_or_else(|| {
                    AeroError::validation(format!(
                        "Invalid range '{n}'. Use a whole number of nautical miles, e.g. 50."
                    ))
                })?;
                RadiusNm::new(nm)
            }
            RangeField::Text(raw) => RadiusNm::parse(raw),
        }
    }
}

/// Inbound request object, tagged by `operation`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum Request {
    AirportData {
        city: String,
    },
    MultipleStationsMetar {
        stations: Vec<String>,
    },
    MetarWithTaf {
        stations: Vec<String>,
    },
    GetPirepsStandard {
        station: String,
    },
    GetPirepsWithinRange {
        station: String,
        #[serde(default)]
        range: Option<RangeField>,
    },
    GetSigmetAirmet,
    GetSigmet,
    GetAirmet,
    GetWindsAloft,
    ForecastDiscussion {
        code: String,
    },
}

/// Status code and JSON body for the inbound layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

impl From<&AeroError> for Reply {
    fn from(err: &AeroError) -> Self {
        Self { status: err.status_code(), body: err.to_json() }
    }
}

#[derive(Debug, Clone, Copy)]
enum AdvisoryView {
    Both,
    Sigmets,
    Airmets,
}

#[derive(Debug)]
pub struct AeroFacade {
    provider: Box<dyn WeatherProvider>,
    airports: Option<AirportDirectory>,
    normalizer: Normalizer,
}

impl AeroFacade {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        airports: Option<AirportDirectory>,
        normalizer: Normalizer,
    ) -> Self {
        Self { provider, airports, normalizer }
    }

    /// Build the facade from configuration. Airport lookups are disabled
    /// when no directory API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = UpstreamHttp::new(config.request_timeout())?;
        let provider = default_provider_from_config(config, http.clone())?;

        let airports = match AirportDirectory::from_config(config, http) {
            Ok(dir) => Some(dir),
            Err(e) => {
                tracing::debug!(error = %e, "airport directory disabled");
                None
            }
        };

        Ok(Self::new(provider, airports, Normalizer::new(config.contact_info())))
    }

    pub fn provider(&self) -> &dyn WeatherProvider {
        self.provider.as_ref()
    }

    /// Handle one inbound request and map the outcome to a reply.
    pub async fn respond(&self, request: &Request) -> Reply {
        let result = match request {
            Request::AirportData { city } => self.airport_data(city).await.and_then(|airports| {
                serde_json::to_value(airports).map_err(|e| {
                    AeroError::upstream(None, format!("Failed to encode airport records: {e}"))
                })
            }),
            other => match query_for(other) {
                Ok(query) => self.run(&query).await.map(|env| env.to_json()),
                Err(err) => Err(err),
            },
        };

        match result {
            Ok(body) => Reply::ok(body),
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "request failed");
                Reply::from(&err)
            }
        }
    }

    pub async fn airport_data(&self, city: &str) -> Result<Vec<Airport>, AeroError> {
        tracing::info!(city, "airport lookup");
        let directory = self.airports.as_ref().ok_or_else(|| {
            AeroError::upstream(
                None,
                "Airport lookups are not configured. Set AIRPORTS_API_KEY or run `aerodex configure`.",
            )
        })?;
        directory.fetch_airport(city).await
    }

    pub async fn metar<S: AsRef<str>>(&self, stations: &[S]) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::Metar(StationCode::parse_list(stations)?)).await
    }

    pub async fn metar_with_taf<S: AsRef<str>>(
        &self,
        stations: &[S],
    ) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::MetarWithTaf(StationCode::parse_list(stations)?)).await
    }

    pub async fn pireps_near(&self, station: &str) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::PirepNear(StationCode::parse(station)?)).await
    }

    pub async fn pireps_within(
        &self,
        station: &str,
        radius: RadiusNm,
    ) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::PirepWithinRange(StationCode::parse(station)?, radius)).await
    }

    pub async fn sigmet_airmet(&self) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::SigmetAirmet).await
    }

    pub async fn winds_aloft(&self) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::WindsAloft).await
    }

    pub async fn forecast_discussion(&self, code: &str) -> Result<ResultEnvelope, AeroError> {
        self.run(&WeatherQuery::ForecastDiscussion(CwaCode::parse(code)?)).await
    }

    /// Execute a validated query against the configured provider.
    pub async fn run(&self, query: &WeatherQuery) -> Result<ResultEnvelope, AeroError> {
        tracing::info!(provider = %self.provider.id(), query = query.name(), "weather query");

        match query {
            WeatherQuery::Metar(stations) | WeatherQuery::MetarWithTaf(stations) => {
                let include_taf = matches!(query, WeatherQuery::MetarWithTaf(_));
                let raw = self.provider.fetch_metar(stations, include_taf).await?;
                self.normalizer.normalize(raw, &Guidance::metar(include_taf))
            }
            WeatherQuery::PirepNear(station) => self.pireps(station, RadiusNm::default()).await,
            WeatherQuery::PirepWithinRange(station, radius) => self.pireps(station, *radius).await,
            WeatherQuery::SigmetAirmet => self.advisories(AdvisoryView::Both).await,
            WeatherQuery::Sigmet => self.advisories(AdvisoryView::Sigmets).await,
            WeatherQuery::Airmet => self.advisories(AdvisoryView::Airmets).await,
            WeatherQuery::WindsAloft => {
                let raw = self.provider.fetch_winds_aloft().await?;
                self.normalizer.normalize_keyed(raw, "winds", &Guidance::winds_aloft())
            }
            WeatherQuery::ForecastDiscussion(cwa) => {
                let raw = self.provider.fetch_forecast_discussion(cwa).await?;
                self.normalizer.normalize(raw, &Guidance::forecast_discussion(cwa.as_str()))
            }
        }
    }

    async fn pireps(
        &self,
        station: &StationCode,
        radius: RadiusNm,
    ) -> Result<ResultEnvelope, AeroError> {
        let raw = self.provider.fetch_pireps(station, radius).await?;
        self.normalizer.normalize(raw, &Guidance::pireps(radius.get()))
    }

    async fn advisories(&self, view: AdvisoryView) -> Result<ResultEnvelope, AeroError> {
        let raw = self.provider.fetch_sigmet_airmet().await?;
        let guidance = Guidance::sigmet_airmet();
        self.normalizer.ensure_data(&raw, &guidance)?;

        let split = split_sigmet_airmet(&raw.body);
        let mut fields = Map::new();
        match view {
            // Unrecognized layout: hand the assistant the raw text instead.
            AdvisoryView::Both if split.is_empty() => {
                fields.insert("data".into(), Value::String(raw.body));
            }
            AdvisoryView::Both => {
                fields.insert("sigmets".into(), Value::from(split.sigmets));
                fields.insert("airmets".into(), Value::from(split.airmets));
            }
            AdvisoryView::Sigmets => {
                fields.insert("sigmets".into(), Value::from(split.sigmets));
            }
            AdvisoryView::Airmets => {
                fields.insert("airmets".into(), Value::from(split.airmets));
            }
        }

        Ok(self.normalizer.envelope(Payload::Fields(fields), &guidance))
    }
}

/// Validate a weather request into a query. Airport lookups are not
/// weather queries and are handled by the caller.
fn query_for(request: &Request) -> Result<WeatherQuery, AeroError> {
    let query = match request {
        Request::MultipleStationsMetar { stations } => {
            WeatherQuery::Metar(StationCode::parse_list(stations)?)
        }
        Request::MetarWithTaf { stations } => {
            WeatherQuery::MetarWithTaf(StationCode::parse_list(stations)?)
        }
        Request::GetPirepsStandard { station } => {
            WeatherQuery::PirepNear(StationCode::parse(station)?)
        }
        Request::GetPirepsWithinRange { station, range } => {
            let radius = match range {
                Some(field) => field.to_radius()?,
                None => RadiusNm::default(),
            };
            WeatherQuery::PirepWithinRange(StationCode::parse(station)?, radius)
        }
        Request::GetSigmetAirmet => WeatherQuery::SigmetAirmet,
        Request::GetSigmet => WeatherQuery::Sigmet,
        Request::GetAirmet => WeatherQuery::Airmet,
        Request::GetWindsAloft => WeatherQuery::WindsAloft,
        Request::ForecastDiscussion { code } => {
            WeatherQuery::ForecastDiscussion(CwaCode::parse(code)?)
        }
        Request::AirportData { .. } => {
            return Err(AeroError::validation("Airport lookups are not weather queries."));
        }
    };
    Ok(query)
}
