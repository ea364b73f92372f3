use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::time::Duration;

use crate::{error::AeroError, model::UpstreamResponse};

const USER_AGENT: &str = concat!("aerodex/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for every upstream call. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct UpstreamHttp {
    http: Client,
}

impl UpstreamHttp {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }

    pub async fn get(&self, url: Url, label: &str) -> Result<UpstreamResponse, AeroError> {
        self.get_with_headers(url, label, &[]).await
    }

    pub async fn get_with_headers(
        &self,
        url: Url,
        label: &str,
        headers: &[(&str, &str)],
    ) -> Result<UpstreamResponse, AeroError> {
        tracing::debug!(%url, label, "sending upstream request");

        let mut req = self.http.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let res = req.send().await.map_err(|e| {
            tracing::warn!(label, error = %e, "upstream request failed");
            AeroError::upstream(
                e.status().map(|s| s.as_u16()),
                format!("Failed to send request to {label}: {e}"),
            )
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            AeroError::upstream(
                Some(status.as_u16()),
                format!("Failed to read {label} response body: {e}"),
            )
        })?;

        tracing::debug!(label, status = status.as_u16(), bytes = body.len(), "upstream replied");

        if !status.is_success() {
            tracing::warn!(label, status = status.as_u16(), "upstream returned an error status");
            return Err(AeroError::upstream(
                Some(status.as_u16()),
                format!("{label} request failed with status {status}: {}", truncate_body(&body)),
            ));
        }

        Ok(UpstreamResponse::new(status.as_u16(), body))
    }
}

/// Join `path` onto a configured base URL, tolerating a trailing slash.
pub fn endpoint(base: &str, path: &str) -> Result<Url, AeroError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined)
        .map_err(|e| AeroError::upstream(None, format!("Invalid upstream URL '{joined}': {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
