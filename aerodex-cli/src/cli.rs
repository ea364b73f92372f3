use aerodex_core::{AeroFacade, Config, ProviderId, Request, facade::RangeField};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, Select};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aerodex", version, about = "Aviation weather for chat assistants")]
pub struct Cli {
    /// Override the configured provider ("legacy" or "rest").
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Log upstream requests to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Advisory {
    All,
    Sigmet,
    Airmet,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the default provider and store the airport directory key.
    Configure {
        /// Provider short name, e.g. "legacy" or "rest".
        provider: Option<String>,
    },

    /// Look up airports serving a city.
    Airport { city: String },

    /// Decoded METAR for one or more stations.
    Metar {
        #[arg(required = true)]
        stations: Vec<String>,

        /// Include the TAF for each station.
        #[arg(long)]
        taf: bool,
    },

    /// Pilot reports around a station.
    Pirep {
        station: String,

        /// Search radius in nautical miles (default 30).
        #[arg(long)]
        range: Option<u32>,
    },

    /// Current SIGMETs and AIRMETs.
    Advisories {
        #[arg(long, value_enum, default_value_t = Advisory::All)]
        kind: Advisory,
    },

    /// Low-level winds and temperatures aloft.
    Winds,

    /// Area forecast discussion for a county warning area, e.g. HGX.
    Discussion { code: String },

    /// Send a raw JSON request object; use "-" to read it from stdin.
    Call { json: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        let request = match self.command {
            Command::Configure { provider } => return configure(config, provider),
            Command::Airport { city } => Request::AirportData { city },
            Command::Metar { stations, taf: false } => Request::MultipleStationsMetar { stations },
            Command::Metar { stations, taf: true } => Request::MetarWithTaf { stations },
            Command::Pirep { station, range: None } => Request::GetPirepsStandard { station },
            Command::Pirep { station, range: Some(nm) } => Request::GetPirepsWithinRange {
                station,
                range: Some(RangeField::Number(nm.into())),
            },
            Command::Advisories { kind: Advisory::All } => Request::GetSigmetAirmet,
            Command::Advisories { kind: Advisory::Sigmet } => Request::GetSigmet,
            Command::Advisories { kind: Advisory::Airmet } => Request::GetAirmet,
            Command::Winds => Request::GetWindsAloft,
            Command::Discussion { code } => Request::ForecastDiscussion { code },
            Command::Call { json } => parse_request(&json)?,
        };

        let mut config = config;
        config.apply_env_overrides()?;
        if let Some(provider) = &self.provider {
            config.set_default_provider(ProviderId::try_from(provider.as_str())?);
        }

        let facade = AeroFacade::from_config(&config)?;
        tracing::debug!(provider = %facade.provider().id(), ?request, "dispatching request");
        let reply = facade.respond(&request).await;

        println!("{}", serde_json::to_string_pretty(&reply.body)?);

        if !reply.is_success() {
            bail!("request failed with status {}", reply.status);
        }

        Ok(())
    }
}

fn parse_request(raw: &str) -> anyhow::Result<Request> {
    let text = if raw == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read request from stdin")?
    } else {
        raw.to_string()
    };

    serde_json::from_str(&text).context(
        "Invalid request object. Example: {\"operation\": \"multiple-stations-metar\", \"stations\": [\"KJFK\"]}",
    )
}

fn configure(mut config: Config, provider: Option<String>) -> anyhow::Result<()> {
    let id = match provider {
        Some(name) => ProviderId::try_from(name.as_str())?,
        None => Select::new("Which aviationweather.gov API should be used?", ProviderId::all().to_vec())
            .prompt()?,
    };
    config.set_default_provider(id);

    let key = Password::new("Airport directory API key (leave empty to keep the current one):")
        .without_confirmation()
        .prompt()?;
    if !key.trim().is_empty() {
        config.airports.api_key = Some(key.trim().to_string());
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
