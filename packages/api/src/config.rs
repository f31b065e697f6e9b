//! Client configuration from the environment.
//!
//! Layers, later wins:
//! 1. [`ClientConfig::default`]
//! 2. `notes-client.toml` in the working directory (native only)
//! 3. variables captured at build time (`option_env!`), which is how the web
//!    build gets its identifiers
//! 4. runtime variables, after loading `.env` with `dotenvy` (native only)

use store::ClientConfig;

/// Environment variable names, shared by the build-time and runtime layers.
pub const INSTANT_APP_ID: &str = "INSTANT_APP_ID";
pub const INSTANT_API_URI: &str = "INSTANT_API_URI";
pub const INSTANT_CLERK_CLIENT_NAME: &str = "INSTANT_CLERK_CLIENT_NAME";
pub const CLERK_PUBLISHABLE_KEY: &str = "CLERK_PUBLISHABLE_KEY";
pub const REMINDERS_API_URL: &str = "REMINDERS_API_URL";
pub const LIVE_POLL_INTERVAL_SECS: &str = "LIVE_POLL_INTERVAL_SECS";

fn build_time_vars() -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        (INSTANT_APP_ID, option_env!("INSTANT_APP_ID")),
        (INSTANT_API_URI, option_env!("INSTANT_API_URI")),
        (INSTANT_CLERK_CLIENT_NAME, option_env!("INSTANT_CLERK_CLIENT_NAME")),
        (CLERK_PUBLISHABLE_KEY, option_env!("CLERK_PUBLISHABLE_KEY")),
        (REMINDERS_API_URL, option_env!("REMINDERS_API_URL")),
        (LIVE_POLL_INTERVAL_SECS, option_env!("LIVE_POLL_INTERVAL_SECS")),
    ]
}

/// Load the configuration for this platform.
pub fn load() -> ClientConfig {
    let mut config = ClientConfig::default();

    #[cfg(not(target_arch = "wasm32"))]
    {
        match std::fs::read_to_string(ClientConfig::filename()) {
            Ok(text) => match ClientConfig::from_toml(&text) {
                Ok(parsed) => config = parsed,
                Err(e) => tracing::warn!("Ignoring {}: {}", ClientConfig::filename(), e),
            },
            Err(_) => tracing::debug!("No {} found, using defaults", ClientConfig::filename()),
        }
    }

    for (name, value) in build_time_vars() {
        if let Some(value) = value {
            apply_var(&mut config, name, value);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        dotenvy::dotenv().ok();
        for (name, _) in build_time_vars() {
            if let Ok(value) = std::env::var(name) {
                apply_var(&mut config, name, &value);
            }
        }
    }

    config
}

/// Apply one variable. Empty values and unparsable numbers are ignored.
pub fn apply_var(config: &mut ClientConfig, name: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    match name {
        INSTANT_APP_ID => config.instant.app_id = value.to_string(),
        INSTANT_API_URI => config.instant.api_uri = value.to_string(),
        INSTANT_CLERK_CLIENT_NAME => config.instant.client_name = value.to_string(),
        CLERK_PUBLISHABLE_KEY => config.clerk.publishable_key = value.to_string(),
        REMINDERS_API_URL => config.reminders.base_url = value.to_string(),
        LIVE_POLL_INTERVAL_SECS => match value.parse() {
            Ok(secs) => config.live.poll_interval_secs = secs,
            Err(_) => tracing::warn!("{} is not a number: {}", name, value),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_string_vars() {
        let mut config = ClientConfig::default();
        apply_var(&mut config, INSTANT_APP_ID, " app-42 ");
        apply_var(&mut config, CLERK_PUBLISHABLE_KEY, "pk_test_1");
        apply_var(&mut config, INSTANT_CLERK_CLIENT_NAME, "clerk-prod");
        apply_var(&mut config, REMINDERS_API_URL, "https://reminders.example.com");
        assert_eq!(config.instant.app_id, "app-42");
        assert_eq!(config.clerk.publishable_key, "pk_test_1");
        assert_eq!(config.instant.client_name, "clerk-prod");
        assert_eq!(config.reminders.base_url, "https://reminders.example.com");
    }

    #[test]
    fn test_empty_and_invalid_values_are_ignored() {
        let mut config = ClientConfig::default();
        apply_var(&mut config, INSTANT_API_URI, "   ");
        apply_var(&mut config, REMINDERS_API_URL, "");
        apply_var(&mut config, LIVE_POLL_INTERVAL_SECS, "-1");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_numeric_vars() {
        let mut config = ClientConfig::default();
        apply_var(&mut config, LIVE_POLL_INTERVAL_SECS, "0");
        assert_eq!(config.live.poll_interval_secs, 0);
    }
}
