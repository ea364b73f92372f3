use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::{fmt, num::NonZeroU32, str::FromStr};

use crate::error::AeroError;

/// Canonical form of a station identifier: upper-case, with `K` prepended
/// to 3-character US domestic codes. Idempotent.
pub fn canonicalize(raw: &str) -> String {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 { format!("K{code}") } else { code }
}

/// ICAO airport/weather station identifier, always in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StationCode(String);

impl StationCode {
    pub fn parse(raw: &str) -> Result<Self, AeroError> {
        let trimmed = raw.trim();
        let valid_len = matches!(trimmed.len(), 3 | 4);
        if !valid_len || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AeroError::validation(format!(
                "Invalid station code '{raw}'. Use a 3 or 4 character airport code like KJFK or JFK."
            )));
        }

        Ok(Self(canonicalize(trimmed)))
    }

    /// Parse a non-empty list of codes, failing on the first invalid one.
    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, AeroError> {
        if raw.is_empty() {
            return Err(AeroError::validation(
                "At least one station code is required, e.g. KJFK.",
            ));
        }
        raw.iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StationCode {
    type Err = AeroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Search radius for PIREPs, in nautical miles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RadiusNm(NonZeroU32);

impl RadiusNm {
    pub const DEFAULT_NM: u32 = 30;

    const DEFAULT: NonZeroU32 = match NonZeroU32::new(Self::DEFAULT_NM) {
        Some(nm) => nm,
        None => panic!("default radius must be non-zero"),
    };

    pub fn new(nm: u32) -> Result<Self, AeroError> {
        NonZeroU32::new(nm)
            .map(Self)
            .ok_or_else(|| AeroError::validation("Range must be a positive number of nautical miles."))
    }

    pub fn parse(raw: &str) -> Result<Self, AeroError> {
        let nm = raw.trim().parse::<u32>().map_err(|_| {
            AeroError::validation(format!(
                "Invalid range '{raw}'. Use a whole number of nautical miles, e.g. 50."
            ))
        })?;
        Self::new(nm)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for RadiusNm {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for RadiusNm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// County warning area code used for area forecast discussions, e.g. `HGX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CwaCode(String);

impl CwaCode {
    pub fn parse(raw: &str) -> Result<Self, AeroError> {
        let trimmed = raw.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AeroError::validation(format!(
                "Invalid area code '{raw}'. Use a 3-letter forecast office code, for example HGX for the Houston area."
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CwaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One validated weather lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherQuery {
    Metar(Vec<StationCode>),
    MetarWithTaf(Vec<StationCode>),
    PirepNear(StationCode),
    PirepWithinRange(StationCode, RadiusNm),
    SigmetAirmet,
    Sigmet,
    Airmet,
    WindsAloft,
    ForecastDiscussion(CwaCode),
}

impl WeatherQuery {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherQuery::Metar(_) => "metar",
            WeatherQuery::MetarWithTaf(_) => "metar_with_taf",
            WeatherQuery::PirepNear(_) => "pirep_near",
            WeatherQuery::PirepWithinRange(..) => "pirep_within_range",
            WeatherQuery::SigmetAirmet => "sigmet_airmet",
            WeatherQuery::Sigmet => "sigmet",
            WeatherQuery::Airmet => "airmet",
            WeatherQuery::WindsAloft => "winds_aloft",
            WeatherQuery::ForecastDiscussion(_) => "forecast_discussion",
        }
    }
}

/// Successful raw reply from an upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, AeroError> {
        serde_json::from_str(&self.body).map_err(|e| {
            AeroError::upstream(Some(self.status), format!("Failed to parse upstream JSON: {e}"))
        })
    }
}

/// SIGMET and AIRMET reports split out of one combined text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SigmetAirmet {
    pub sigmets: Vec<String>,
    pub airmets: Vec<String>,
}

impl SigmetAirmet {
    pub fn is_empty(&self) -> bool {
        self.sigmets.is_empty() && self.airmets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Upstream text passed through unmodified.
    Text(String),
    /// Named fields merged next to the assistant hint.
    Fields(Map<String, Value>),
}

/// Success shape returned to the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub payload: Payload,
    pub assistant_hint: String,
    pub contact_info: String,
}

impl ResultEnvelope {
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            Payload::Fields(_) => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match &self.payload {
            Payload::Fields(fields) => fields.get(name),
            Payload::Text(_) => None,
        }
    }

    /// Wire shape expected by the chat plugin.
    pub fn to_json(&self) -> Value {
        let contact = json!({ "contact_info": self.contact_info });
        match &self.payload {
            Payload::Text(text) => {
                json!([{ "assistant_hint": self.assistant_hint }, text, contact])
            }
            Payload::Fields(fields) => {
                let mut head = Map::with_capacity(fields.len() + 1);
                head.insert("assistant_hint".into(), Value::String(self.assistant_hint.clone()));
                head.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                json!([Value::Object(head), contact])
            }
        }
    }
}

/// One airport-directory record. Fields the directory adds beyond the
/// common ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(default)]
    pub icao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iata: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_letter_codes_get_k_prefix() {
        assert_eq!(canonicalize("ttd"), "KTTD");
        assert_eq!(canonicalize("JFK"), "KJFK");
        assert_eq!(canonicalize(" ord "), "KORD");
    }

    #[test]
    fn four_letter_codes_are_only_uppercased() {
        assert_eq!(canonicalize("KJFK"), "KJFK");
        assert_eq!(canonicalize("egll"), "EGLL");
        assert_eq!(canonicalize("PHNL"), "PHNL");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for raw in ["ttd", "KTTD", "egll", "sfo", "Kord", "3S2"] {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn station_parse_rejects_malformed_codes() {
        for bad in ["", "JF", "KJFKX", "K-FK", "ab c"] {
            let err = StationCode::parse(bad).unwrap_err();
            assert_eq!(err.kind(), "validation_error", "accepted {bad:?}");
        }
    }

    #[test]
    fn station_list_is_canonicalized() {
        let list = StationCode::parse_list(&["ttd", "kjfk"]).unwrap();
        let codes: Vec<&str> = list.iter().map(StationCode::as_str).collect();
        assert_eq!(codes, ["KTTD", "KJFK"]);
    }

    #[test]
    fn empty_station_list_is_rejected() {
        let err = StationCode::parse_list::<&str>(&[]).unwrap_err();
        assert!(matches!(err, AeroError::Validation(_)));
    }

    #[test]
    fn radius_defaults_to_thirty() {
        assert_eq!(RadiusNm::default().get(), 30);
    }

    #[test]
    fn radius_parse() {
        assert_eq!(RadiusNm::parse(" 50 ").unwrap().get(), 50);
        assert!(RadiusNm::parse("0").is_err());
        assert!(RadiusNm::parse("-5").is_err());
        assert!(RadiusNm::parse("far").is_err());
    }

    #[test]
    fn cwa_code_is_uppercased_and_checked() {
        assert_eq!(CwaCode::parse("hgx").unwrap().as_str(), "HGX");
        assert!(CwaCode::parse("HG").is_err());
        assert!(CwaCode::parse("H1X").is_err());
    }

    #[test]
    fn text_envelope_renders_hint_text_contact() {
        let env = ResultEnvelope {
            payload: Payload::Text("KJFK 181651Z".into()),
            assistant_hint: "hint".into(),
            contact_info: "contact".into(),
        };
        assert_eq!(
            env.to_json(),
            json!([{ "assistant_hint": "hint" }, "KJFK 181651Z", { "contact_info": "contact" }])
        );
    }

    #[test]
    fn field_envelope_merges_fields_with_hint() {
        let mut fields = Map::new();
        fields.insert("winds".into(), json!("FT 3000 6000"));
        let env = ResultEnvelope {
            payload: Payload::Fields(fields),
            assistant_hint: "hint".into(),
            contact_info: "contact".into(),
        };
        assert_eq!(
            env.to_json(),
            json!([{ "assistant_hint": "hint", "winds": "FT 3000 6000" }, { "contact_info": "contact" }])
        );
    }

    #[test]
    fn airport_keeps_unknown_fields() {
        let raw = json!({
            "icao": "KHOU",
            "iata": "HOU",
            "name": "William P Hobby Airport",
            "city": "Houston",
            "region": "Texas",
            "country": "US",
            "elevation_ft": "46"
        });
        let airport: Airport = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(airport.icao, "KHOU");
        assert_eq!(airport.extra["elevation_ft"], "46");
        assert_eq!(serde_json::to_value(&airport).unwrap(), raw);
    }
}
