// Rust guideline compliant 2026-10-12

//! Cold-start configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, `ALARM_PAGER_*`
//! environment variables, and the legacy `PAGERDUTY_INTEGRATION_KEY`.

use std::time::Duration;

use correlator::{CorrelatorConfig, CorrelatorError, FilterMatch, LogGroupSource};
use delivery::{DeliveryConfig, EngineError, SuccessPolicy};
use domain::RoutingKey;
use figment::Figment;
use figment::providers::Env;
use serde::{Deserialize, Deserializer};

const ENV_PREFIX: &str = "ALARM_PAGER_";
const LEGACY_KEY_VAR: &str = "PAGERDUTY_INTEGRATION_KEY";
const DEFAULT_EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Errors raised while loading [`Settings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or a value has the wrong shape.
    #[error("failed to load settings: {reason}")]
    Load {
        /// Human-readable explanation from the configuration layer.
        reason: String,
    },
}

/// Process-wide settings, read once per cold start.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Paging routing key. Empty is allowed; the provider rejects it.
    #[serde(default, deserialize_with = "routing_key")]
    pub routing_key: RoutingKey,
    /// Incident ingestion endpoint.
    #[serde(default = "default_events_url")]
    pub events_url: String,
    /// Search-window radius in minutes.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u64,
    /// Server-side lookup attribute or client-side exact match.
    #[serde(default)]
    pub filter_match: FilterMatch,
    /// Fixed log group; unset means "read the alarm's dimensions".
    #[serde(default)]
    pub log_group: Option<String>,
    /// Which provider statuses count as delivered.
    #[serde(default)]
    pub success_policy: SuccessPolicy,
    /// Delivery attempt budget, including the first attempt.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn routing_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoutingKey, D::Error> {
    String::deserialize(deserializer).map(RoutingKey::new)
}

fn default_events_url() -> String {
    DEFAULT_EVENTS_URL.to_owned()
}

fn default_window_minutes() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    3
}

impl Settings {
    /// The layered configuration sources.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::new().merge(Env::prefixed(ENV_PREFIX)).merge(
            Env::raw()
                .only(&[LEGACY_KEY_VAR])
                .map(|_| "routing_key".into()),
        )
    }

    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a value cannot be parsed into its
    /// field type (for example `ALARM_PAGER_MAX_ATTEMPTS=many`).
    pub fn load() -> Result<Self, SettingsError> {
        Self::figment()
            .extract()
            .map_err(|e| SettingsError::Load { reason: e.to_string() })
    }

    /// Build the correlator configuration these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelatorError::InvalidConfig`] for a zero or oversized
    /// window, or an empty fixed log group.
    pub fn correlator_config(&self) -> Result<CorrelatorConfig, CorrelatorError> {
        let log_group = match &self.log_group {
            Some(name) => LogGroupSource::Fixed(name.clone()),
            None => LogGroupSource::AlarmDimension,
        };
        CorrelatorConfig::builder()
            .window_radius(Duration::from_secs(self.window_minutes.saturating_mul(60)))
            .filter_match(self.filter_match)
            .log_group(log_group)
            .build()
    }

    /// Build the delivery configuration these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when `max_attempts` is zero.
    pub fn delivery_config(&self) -> Result<DeliveryConfig, EngineError> {
        DeliveryConfig::builder()
            .max_attempts(self.max_attempts)
            .success_policy(self.success_policy)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use correlator::{FilterMatch, LogGroupSource};
    use delivery::SuccessPolicy;
    use figment::Jail;
    use std::time::Duration;

    #[test]
    fn defaults_apply_without_environment() {
        Jail::expect_with(|_jail| {
            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert!(settings.routing_key.is_empty());
            assert_eq!(settings.events_url, "https://events.pagerduty.com/v2/enqueue");
            assert_eq!(settings.window_minutes, 5);
            assert_eq!(settings.filter_match, FilterMatch::ServerSide);
            assert_eq!(settings.log_group, None);
            assert_eq!(settings.success_policy, SuccessPolicy::Below400);
            assert_eq!(settings.max_attempts, 3);
            Ok(())
        });
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("ALARM_PAGER_ROUTING_KEY", "team-key");
            jail.set_env("ALARM_PAGER_WINDOW_MINUTES", "10");
            jail.set_env("ALARM_PAGER_FILTER_MATCH", "client_side");
            jail.set_env("ALARM_PAGER_LOG_GROUP", "org-trail");
            jail.set_env("ALARM_PAGER_SUCCESS_POLICY", "accepted");
            jail.set_env("ALARM_PAGER_MAX_ATTEMPTS", "5");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.routing_key.as_str(), "team-key");
            assert_eq!(settings.window_minutes, 10);
            assert_eq!(settings.filter_match, FilterMatch::ClientSide);
            assert_eq!(settings.log_group.as_deref(), Some("org-trail"));
            assert_eq!(settings.success_policy, SuccessPolicy::Accepted);
            assert_eq!(settings.max_attempts, 5);
            Ok(())
        });
    }

    #[test]
    fn legacy_key_variable_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("ALARM_PAGER_ROUTING_KEY", "new-key");
            jail.set_env("PAGERDUTY_INTEGRATION_KEY", "legacy-key");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.routing_key.as_str(), "legacy-key");
            Ok(())
        });
    }

    #[test]
    fn unparseable_value_is_a_load_error() {
        Jail::expect_with(|jail| {
            jail.set_env("ALARM_PAGER_MAX_ATTEMPTS", "many");
            assert!(Settings::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn component_configs_follow_settings() {
        Jail::expect_with(|jail| {
            jail.set_env("ALARM_PAGER_WINDOW_MINUTES", "2");
            jail.set_env("ALARM_PAGER_LOG_GROUP", "org-trail");
            jail.set_env("ALARM_PAGER_MAX_ATTEMPTS", "4");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            let correlator = settings.correlator_config().map_err(|e| e.to_string())?;
            assert_eq!(correlator.window_radius, time::Duration::minutes(2));
            assert_eq!(correlator.log_group, LogGroupSource::Fixed("org-trail".to_owned()));

            let delivery = settings.delivery_config().map_err(|e| e.to_string())?;
            assert_eq!(delivery.retry.max_attempts, 4);
            assert_eq!(delivery.retry.base_delay, Duration::from_secs(1));
            Ok(())
        });
    }

    #[test]
    fn zero_values_are_rejected_by_component_builders() {
        Jail::expect_with(|jail| {
            jail.set_env("ALARM_PAGER_WINDOW_MINUTES", "0");
            jail.set_env("ALARM_PAGER_MAX_ATTEMPTS", "0");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert!(settings.correlator_config().is_err());
            assert!(settings.delivery_config().is_err());
            Ok(())
        });
    }
}
