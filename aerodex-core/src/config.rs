use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::provider::ProviderId;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AIRPORTS_BASE_URL: &str = "https://api.api-ninjas.com";
pub const DEFAULT_CONTACT_INFO: &str = "Let the user know that the plugin developer is happy to receive feedback. \
Critiques and feature requests are welcome.";

/// Per-provider overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
}

/// Airport directory credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirportsConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// "legacy" or "rest"; unset means "rest".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.rest]
    /// base_url = "https://aviationweather.gov"
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub airports: AirportsConfig,

    pub request_timeout_secs: Option<u64>,

    /// Footer attached to every successful reply.
    pub contact_info: Option<String>,
}

impl Config {
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::Rest),
        }
    }

    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Base URL for a provider, falling back to its public endpoint.
    pub fn provider_base_url(&self, id: ProviderId) -> &str {
        self.provider_config(id)
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| id.default_base_url())
    }

    pub fn set_provider_base_url(&mut self, id: ProviderId, base_url: String) {
        self.providers.entry(id.as_str().to_string()).or_default().base_url = Some(base_url);
    }

    pub fn airports_base_url(&self) -> &str {
        self.airports.base_url.as_deref().unwrap_or(DEFAULT_AIRPORTS_BASE_URL)
    }

    /// Returns the airport directory key or a hint on how to set it.
    pub fn airports_api_key(&self) -> Result<&str> {
        self.airports.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured for the airport directory.\n\
                 Hint: run `aerodex configure` or set AIRPORTS_API_KEY."
            )
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn contact_info(&self) -> &str {
        self.contact_info.as_deref().unwrap_or(DEFAULT_CONTACT_INFO)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "aerodex", "aerodex")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `AIRPORTS_API_KEY`, `AERODEX_PROVIDER` and `AERODEX_TIMEOUT_SECS`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("AIRPORTS_API_KEY").filter(|k| !k.is_empty()) {
            self.airports.api_key = Some(key);
        }

        if let Some(provider) = lookup("AERODEX_PROVIDER") {
            let id = ProviderId::try_from(provider.as_str())?;
            self.set_default_provider(id);
        }

        if let Some(secs) = lookup("AERODEX_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("AERODEX_TIMEOUT_SECS must be a number, got '{secs}'"))?;
            self.request_timeout_secs = Some(secs);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_rest_when_not_set() {
        let cfg = Config::default();
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Rest);
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::Legacy);
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Legacy);
    }

    #[test]
    fn unknown_default_provider_errors() {
        let cfg = Config { default_provider: Some("nope".into()), ..Config::default() };
        let err = cfg.default_provider_id().unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn base_url_falls_back_to_public_endpoint() {
        let mut cfg = Config::default();
        assert_eq!(cfg.provider_base_url(ProviderId::Rest), "https://aviationweather.gov");

        cfg.set_provider_base_url(ProviderId::Rest, "http://127.0.0.1:9000".into());
        assert_eq!(cfg.provider_base_url(ProviderId::Rest), "http://127.0.0.1:9000");
        assert_eq!(
            cfg.provider_base_url(ProviderId::Legacy),
            "https://beta.aviationweather.gov"
        );
    }

    #[test]
    fn missing_airport_key_has_hint() {
        let err = Config::default().airports_api_key().unwrap_err();
        assert!(err.to_string().contains("Hint: run `aerodex configure`"));
    }

    #[test]
    fn timeout_defaults_to_ten_seconds() {
        assert_eq!(Config::default().request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn parses_toml_document() {
        let cfg = Config::from_toml(
            r#"
            default_provider = "legacy"
            request_timeout_secs = 5
            contact_info = "ping me"

            [providers.legacy]
            base_url = "http://localhost:8080"

            [airports]
            api_key = "KEY"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Legacy);
        assert_eq!(cfg.provider_base_url(ProviderId::Legacy), "http://localhost:8080");
        assert_eq!(cfg.airports_api_key().unwrap(), "KEY");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.contact_info(), "ping me");
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut cfg = Config::default();
        cfg.airports.api_key = Some("FILE_KEY".into());

        cfg.apply_overrides_from(|name| match name {
            "AIRPORTS_API_KEY" => Some("ENV_KEY".into()),
            "AERODEX_PROVIDER" => Some("legacy".into()),
            "AERODEX_TIMEOUT_SECS" => Some("3".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(cfg.airports_api_key().unwrap(), "ENV_KEY");
        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Legacy);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn bad_timeout_override_errors() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides_from(|name| (name == "AERODEX_TIMEOUT_SECS").then(|| "soon".into()))
            .unwrap_err();
        assert!(err.to_string().contains("AERODEX_TIMEOUT_SECS"));
    }
}
