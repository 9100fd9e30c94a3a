//! HTTP client for the external CRM lead store.
//!
//! The store is a read-only collaborator (plus the fire-and-forget contact
//! submission path). Fetch failures map onto the two-kind error taxonomy in
//! `error.rs`; nothing here retries — a failed dashboard fetch surfaces as a
//! visible error state, never as stale or zero-valued numbers.
//!
//! Modules:
//! - leads: leads query + contact submission endpoints

pub mod leads;

use std::time::Duration;

use url::Url;

use crate::error::AnalyticsError;
use crate::state::Config;

/// Default per-request timeout when the config does not override it.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct CrmClient {
    base: Url,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl CrmClient {
    pub fn new(
        base: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base,
            api_key,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AnalyticsError> {
        let base = Url::parse(&config.crm_base_url).map_err(|e| {
            AnalyticsError::DataUnavailable(format!(
                "invalid crmBaseUrl '{}': {}",
                config.crm_base_url, e
            ))
        })?;
        let timeout = Duration::from_secs(if config.request_timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            config.request_timeout_secs
        });
        Self::new(base, config.api_key.clone(), timeout)
    }

    /// Join an endpoint path onto the configured base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, AnalyticsError> {
        self.base.join(path).map_err(|e| {
            AnalyticsError::DataUnavailable(format!("bad endpoint path '{}': {}", path, e))
        })
    }

    /// GET with bearer auth when an API key is configured.
    pub(crate) fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// POST with bearer auth when an API key is configured.
    pub(crate) fn post(&self, url: Url) -> reqwest::RequestBuilder {
        let mut req = self.http.post(url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }
}
