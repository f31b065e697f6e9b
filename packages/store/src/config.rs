//! # Client configuration: `notes-client.toml`
//!
//! Identifiers and endpoints for the three external collaborators. The file is
//! optional; every section has defaults, and `api::config::load` layers
//! build-time and runtime environment variables on top.
//!
//! ## Structure
//!
//! ```toml
//! [instant]
//! app_id = "00000000-0000-0000-0000-000000000000"
//! api_uri = "https://api.instantdb.com"
//! client_name = "clerk"
//!
//! [clerk]
//! publishable_key = "pk_test_..."
//!
//! [reminders]
//! base_url = "http://localhost:8080"
//!
//! [live]
//! poll_interval_secs = 5   # 0 disables polling
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub instant: InstantConfig,
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub live: LiveConfig,
}

/// Hosted database settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstantConfig {
    /// Application identifier issued by the database service.
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_api_uri")]
    pub api_uri: String,
    /// Name under which the identity provider is registered with the database.
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

fn default_api_uri() -> String {
    "https://api.instantdb.com".to_string()
}

fn default_client_name() -> String {
    "clerk".to_string()
}

impl Default for InstantConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_uri: default_api_uri(),
            client_name: default_client_name(),
        }
    }
}

/// Identity provider settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClerkConfig {
    #[serde(default)]
    pub publishable_key: String,
}

/// Reminders REST API settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_reminders_url")]
    pub base_url: String,
}

fn default_reminders_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            base_url: default_reminders_url(),
        }
    }
}

/// Live query refresh settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Poll interval in seconds. 0 disables polling.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,
}

fn default_poll_interval() -> u32 {
    5
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl ClientConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notes-client.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check that the identifiers the client cannot run without are present.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.instant.app_id.trim().is_empty() {
            return Err(ClientError::Config("INSTANT_APP_ID not set".to_string()));
        }
        if self.clerk.publishable_key.trim().is_empty() {
            return Err(ClientError::Config("CLERK_PUBLISHABLE_KEY not set".to_string()));
        }
        Ok(())
    }
}
