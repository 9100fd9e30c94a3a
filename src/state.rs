//! Application configuration and shared runtime state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::crm_api::CrmClient;

fn default_timeout_secs() -> u64 {
    10
}

fn default_confirmation_secs() -> u64 {
    5
}

/// On-disk configuration, camelCase JSON. Unknown fields are ignored so old
/// builds keep reading configs written by newer ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the CRM, e.g. "https://crm.sunleads.example".
    pub crm_base_url: String,
    /// Bearer token for the CRM. Absent means unauthenticated requests.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long a contact-form confirmation stays on screen.
    #[serde(default = "default_confirmation_secs")]
    pub confirmation_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crm_base_url: String::new(),
            api_key: None,
            request_timeout_secs: default_timeout_secs(),
            confirmation_secs: default_confirmation_secs(),
        }
    }
}

/// Get the canonical config file path (~/.sunleads/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".sunleads").join("config.json"))
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!(
            "Config file not found at {}. Create it with: {{ \"crmBaseUrl\": \"https://...\" }}",
            path.display()
        ));
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.crm_base_url.trim().is_empty() {
        return Err("Config is missing crmBaseUrl".to_string());
    }

    Ok(config)
}

/// Load configuration from ~/.sunleads/config.json
pub fn load_config() -> Result<Config, String> {
    load_from(&config_path()?)
}

/// Shared runtime state for an embedding host.
pub struct AppState {
    pub config: Mutex<Option<Config>>,
    pub client: Mutex<Option<CrmClient>>,
}

impl AppState {
    pub fn new() -> Self {
        let config = match load_config() {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("No usable config at startup: {}. CRM features disabled.", e);
                None
            }
        };
        let client = config.as_ref().and_then(|c| match CrmClient::from_config(c) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("Failed to build CRM client: {}", e);
                None
            }
        });

        Self {
            config: Mutex::new(config),
            client: Mutex::new(client),
        }
    }

    /// Replace the configuration and rebuild the CRM client to match.
    pub fn set_config(&self, config: Config) -> Result<(), String> {
        let client = CrmClient::from_config(&config).map_err(|e| e.to_string())?;

        let mut config_guard = self.config.lock().map_err(|_| "Lock poisoned")?;
        let mut client_guard = self.client.lock().map_err(|_| "Lock poisoned")?;
        *config_guard = Some(config);
        *client_guard = Some(client);
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"crmBaseUrl": "https://crm.sunleads.example", "apiKey": "secret"}"#,
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.crm_base_url, "https://crm.sunleads.example");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.confirmation_secs, 5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_load_from_requires_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"requestTimeoutSecs": 30}"#).unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.contains("crmBaseUrl"));
    }

    #[test]
    fn test_load_from_ignores_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"crmBaseUrl": "https://crm.sunleads.example", "futureKnob": true}"#,
        )
        .unwrap();
        assert!(load_from(&path).is_ok());
    }

    #[test]
    fn test_set_config_builds_client() {
        let state = AppState {
            config: Mutex::new(None),
            client: Mutex::new(None),
        };
        let config = Config {
            crm_base_url: "https://crm.sunleads.example".to_string(),
            ..Config::default()
        };
        state.set_config(config).unwrap();
        assert!(state.client.lock().unwrap().is_some());
    }

    #[test]
    fn test_set_config_rejects_bad_url() {
        let state = AppState {
            config: Mutex::new(None),
            client: Mutex::new(None),
        };
        let config = Config {
            crm_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(state.set_config(config).is_err());
        assert!(state.client.lock().unwrap().is_none());
    }
}
