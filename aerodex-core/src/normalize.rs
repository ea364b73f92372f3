//! Turns raw upstream replies into assistant-facing envelopes.
//!
//! Every resource type gets a [`Guidance`]: the hint that tells the assistant
//! how to present the data, and the message returned when upstream has
//! nothing to report.

use serde_json::{Map, Value};

use crate::{
    error::AeroError,
    model::{Payload, ResultEnvelope, SigmetAirmet, UpstreamResponse},
};

pub const SIGMET_MARKER: &str = "SIGMET for";
pub const AIRMET_MARKER: &str = "AIRMET for";

/// Bodies some endpoints send instead of an empty reply.
pub const NO_DATA_SENTINELS: &[&str] = &["No AFD Data Available", "No data available"];

const METAR_HINT: &str = "This is a single or a list of METAR readings. \
Display the text and decoded version to the user. Format the response in a nice way. \
Do not invent if you don't know how to decode a symbol. \
Let the user know they can find the METAR symbols at this url https://www.weather.gov/media/wrh/mesowest/metar_decode_key.pdf";

const METAR_TAF_HINT: &str = "This is a single or a list of METAR readings including the TAF. \
Display the text and decoded version to the user. Format the response in a nice way. \
Do not invent if you don't know how to decode a symbol. \
Let the user know they can find the METAR symbols at this url https://www.weather.gov/media/wrh/mesowest/metar_decode_key.pdf";

const PIREP_HINT: &str = "The following are the PIREPS reported within {range} NM of the airport the user queried. \
Let them know that information, and format the data in a nice way.";

const SIGMET_AIRMET_HINT: &str = "You just received a list of AIRMET and SIGMETS. \
Answer the user's question with this information. Separate Airmet and sigmets if necessary.";

const WINDS_HINT: &str = "You just received a list of wind alofts. Display it in a proper way. \
If the users asked about a specific area, display only the pertinent data. \
Answer the user's question with this information.";

const DISCUSSION_HINT: &str = "This is the forecast discussion for the {code} area the user asked for. \
Format it in a nice way and use this info to answer their questions.";

const METAR_NO_DATA: &str = "This information is not available at this moment. \
Make sure you provide an airport code like KJFK.";

const PIREP_NO_DATA: &str = "It looks like there is no PIREP in the area at the moment. \
Make sure you are sending a valid airport code like KORD.";

const GENERIC_NO_DATA: &str = "This information is not available at this moment.";

const DISCUSSION_NO_DATA: &str = "This information is not available at this moment. \
Make sure you give the correct area code; for example HGX for the Houston area. \
If not working, probably there is an issue with the aviationweather.gov API.";

/// Substitute `{name}` placeholders in a hint template.
pub fn render_hint(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

/// Hint and no-data message for one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guidance {
    pub assistant_hint: String,
    pub no_data_message: String,
}

impl Guidance {
    pub fn new(assistant_hint: impl Into<String>, no_data_message: impl Into<String>) -> Self {
        Self {
            assistant_hint: assistant_hint.into(),
            no_data_message: no_data_message.into(),
        }
    }

    pub fn metar(include_taf: bool) -> Self {
        let hint = if include_taf { METAR_TAF_HINT } else { METAR_HINT };
        Self::new(hint, METAR_NO_DATA)
    }

    pub fn pireps(range_nm: u32) -> Self {
        Self::new(render_hint(PIREP_HINT, &[("range", &range_nm.to_string())]), PIREP_NO_DATA)
    }

    pub fn sigmet_airmet() -> Self {
        Self::new(SIGMET_AIRMET_HINT, GENERIC_NO_DATA)
    }

    pub fn winds_aloft() -> Self {
        Self::new(WINDS_HINT, GENERIC_NO_DATA)
    }

    pub fn forecast_discussion(code: &str) -> Self {
        Self::new(render_hint(DISCUSSION_HINT, &[("code", code)]), DISCUSSION_NO_DATA)
    }
}

/// True when the body carries no usable data.
pub fn is_no_data(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty()
        || NO_DATA_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    contact_info: String,
}

impl Normalizer {
    pub fn new(contact_info: impl Into<String>) -> Self {
        Self { contact_info: contact_info.into() }
    }

    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    /// Wrap a text reply, or report `NoData` with the guidance message.
    pub fn normalize(
        &self,
        raw: UpstreamResponse,
        guidance: &Guidance,
    ) -> Result<ResultEnvelope, AeroError> {
        self.ensure_data(&raw, guidance)?;
        Ok(self.envelope(Payload::Text(raw.body), guidance))
    }

    /// Like [`Normalizer::normalize`] but places the body under `key`.
    pub fn normalize_keyed(
        &self,
        raw: UpstreamResponse,
        key: &str,
        guidance: &Guidance,
    ) -> Result<ResultEnvelope, AeroError> {
        self.ensure_data(&raw, guidance)?;
        let mut fields = Map::new();
        fields.insert(key.to_string(), Value::String(raw.body));
        Ok(self.envelope(Payload::Fields(fields), guidance))
    }

    pub fn envelope(&self, payload: Payload, guidance: &Guidance) -> ResultEnvelope {
        ResultEnvelope {
            payload,
            assistant_hint: guidance.assistant_hint.clone(),
            contact_info: self.contact_info.clone(),
        }
    }

    /// `NoData` carrying the guidance message when the body is unusable.
    pub fn ensure_data(&self, raw: &UpstreamResponse, guidance: &Guidance) -> Result<(), AeroError> {
        if is_no_data(&raw.body) {
            tracing::warn!(status = raw.status, "upstream returned no data");
            return Err(AeroError::no_data(guidance.no_data_message.clone()));
        }
        Ok(())
    }
}

/// Split combined advisory text at the first AIRMET marker.
///
/// Everything before the marker is SIGMET material, everything from it
/// onward is AIRMET material. Without an AIRMET marker the whole text is
/// treated as SIGMET material and no AIRMETs are returned. Text preceding the
/// first marker of each half is dropped.
pub fn split_sigmet_airmet(text: &str) -> SigmetAirmet {
    let (sigmet_part, airmet_part) = match text.find(AIRMET_MARKER) {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    };

    SigmetAirmet {
        sigmets: reports(sigmet_part, SIGMET_MARKER),
        airmets: reports(airmet_part, AIRMET_MARKER),
    }
}

fn reports(text: &str, marker: &str) -> Vec<String> {
    text.split(marker)
        .skip(1)
        .map(|fragment| format!("{marker}{}", fragment.trim_end()))
        .collect()
}
