//! Client configuration: where the evaluation service lives and how long to
//! wait for it.
//!
//! The base URL is taken from the `--api-url` flag, then the
//! [`API_URL_ENV`](crate::consts::API_URL_ENV) environment variable, then
//! [`DEFAULT_API_URL`](crate::consts::DEFAULT_API_URL).

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Url;

use crate::consts::{API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT, EVALUATE_PATH};

/// Where a resolved base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Flag,
    Env,
    Default,
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    api_url: String,
    source: UrlSource,
    pub timeout: Duration,
}

impl Config {
    /// Build a config for an explicit base URL.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        check_timeout(timeout)?;
        Ok(Self {
            api_url: normalize(api_url)?,
            source: UrlSource::Flag,
            timeout,
        })
    }

    /// Resolve from the flag value and the process environment.
    pub fn from_env(flag: Option<String>, timeout: Duration) -> Result<Self> {
        let env = std::env::var(API_URL_ENV).ok();
        Self::resolve(flag, env, timeout)
    }

    /// Resolve with explicit inputs. Empty strings count as unset.
    pub fn resolve(flag: Option<String>, env: Option<String>, timeout: Duration) -> Result<Self> {
        check_timeout(timeout)?;
        let flag = flag.filter(|s| !s.trim().is_empty());
        let env = env.filter(|s| !s.trim().is_empty());

        let (raw, source) = match (flag, env) {
            (Some(url), _) => (url, UrlSource::Flag),
            (None, Some(url)) => (url, UrlSource::Env),
            (None, None) => (DEFAULT_API_URL.to_string(), UrlSource::Default),
        };

        let api_url =
            normalize(&raw).with_context(|| format!("invalid evaluation API URL: {raw}"))?;
        Ok(Self {
            api_url,
            source,
            timeout,
        })
    }

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn source(&self) -> UrlSource {
        self.source
    }

    /// Full URL of the evaluate endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_url, EVALUATE_PATH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            source: UrlSource::Default,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn check_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        bail!("request timeout must be greater than zero");
    }
    Ok(())
}

fn normalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).context("not a valid URL")?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported scheme '{}', expected http or https", url.scheme());
    }
    // The evaluate path is appended to the base, so nothing may follow the path.
    if url.query().is_some() || url.fragment().is_some() {
        bail!("base URL must not carry a query string or fragment");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
