//! Core library for the `aerodex` aviation weather assistant.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstraction over the two aviationweather.gov API generations
//! - Station code canonicalization and request validation
//! - Normalization of upstream replies into assistant-facing envelopes
//! - A request facade mapping outcomes to HTTP status codes
//!
//! It is used by `aerodex-cli`, but can also sit behind an HTTP router.

pub mod airport;
pub mod config;
pub mod error;
pub mod facade;
pub mod http;
pub mod model;
pub mod normalize;
pub mod provider;

pub use airport::AirportDirectory;
pub use config::{AirportsConfig, Config, ProviderConfig};
pub use error::AeroError;
pub use facade::{AeroFacade, Reply, Request};
pub use model::{
    Airport, CwaCode, RadiusNm, ResultEnvelope, SigmetAirmet, StationCode, UpstreamResponse,
    WeatherQuery,
};
pub use normalize::{Guidance, Normalizer, split_sigmet_airmet};
pub use provider::{ProviderId, WeatherProvider};
