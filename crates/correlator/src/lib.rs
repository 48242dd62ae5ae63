// Rust guideline compliant 2026-10-12

//! Audit correlator -- answers "who did this" for an alarm.
//!
//! [`AuditCorrelator`] implements the `domain::ActorCorrelator` port on top of
//! two injected collaborator ports: `domain::MetricMetadata` resolves the
//! metric filter backing the alarm, and `domain::AuditTrail` is searched in a
//! window around the state change for an event matching the filter pattern.
//! Configuration via [`CorrelatorConfig::builder`].

mod window;

pub use window::{parse_state_change_time, search_window};

use domain::{
    AuditEvent, AuditQuery, AuditTrail, CorrelationError, MetricDimension, MetricFilterBinding,
    MetricMetadata, UNKNOWN_ACTOR,
};
use std::time::Duration;

/// Dimension preferred when an alarm carries several.
const LOG_GROUP_DIMENSION: &str = "LogGroupName";

/// Largest accepted search-window radius.
const MAX_WINDOW_RADIUS: Duration = Duration::from_secs(24 * 60 * 60);

// ---------------------------------------------------------------------------
// CorrelatorError
// ---------------------------------------------------------------------------

/// Errors raised while building a correlator.
#[derive(Debug, thiserror::Error)]
pub enum CorrelatorError {
    /// The supplied configuration is invalid.
    #[error("invalid correlator configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// CorrelatorConfig + builder
// ---------------------------------------------------------------------------

/// Where the audit search is restricted to the filter pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMatch {
    /// Pass the pattern to the audit service as an event-name lookup attribute.
    #[default]
    ServerSide,
    /// Fetch every event in the window and keep exact event-name matches.
    ClientSide,
}

/// How the log group holding the alarm's metric filter is found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogGroupSource {
    /// Read it from the alarm's metric dimensions.
    #[default]
    AlarmDimension,
    /// Always use this log group.
    Fixed(String),
}

/// Runtime configuration for an [`AuditCorrelator`].
///
/// Construct via [`CorrelatorConfig::builder`].
#[derive(Debug, Clone)]
pub struct CorrelatorConfig {
    /// Half-width of the search window around the state change.
    pub window_radius: time::Duration,
    /// Server-side or client-side event-name matching.
    pub filter_match: FilterMatch,
    /// Log-group resolution strategy.
    pub log_group: LogGroupSource,
}

/// Builder for [`CorrelatorConfig`].
///
/// Obtain via [`CorrelatorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct CorrelatorConfigBuilder {
    window_radius: Duration,
    filter_match: FilterMatch,
    log_group: LogGroupSource,
}

impl CorrelatorConfig {
    /// Create a builder.
    ///
    /// Default values: `window_radius = 5 min`, `filter_match = ServerSide`,
    /// `log_group = AlarmDimension`.
    #[must_use]
    pub fn builder() -> CorrelatorConfigBuilder {
        CorrelatorConfigBuilder {
            window_radius: Duration::from_secs(5 * 60),
            filter_match: FilterMatch::default(),
            log_group: LogGroupSource::default(),
        }
    }
}

impl CorrelatorConfigBuilder {
    /// Override the search-window radius.
    #[must_use]
    pub fn window_radius(mut self, radius: Duration) -> Self {
        self.window_radius = radius;
        self
    }

    /// Choose server-side or client-side event-name matching.
    #[must_use]
    pub fn filter_match(mut self, filter_match: FilterMatch) -> Self {
        self.filter_match = filter_match;
        self
    }

    /// Choose how the log group is resolved.
    #[must_use]
    pub fn log_group(mut self, log_group: LogGroupSource) -> Self {
        self.log_group = log_group;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelatorError::InvalidConfig`] when the radius is zero or
    /// longer than a day, or when a fixed log group name is empty.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<CorrelatorConfig, CorrelatorError> {
        if self.window_radius.is_zero() || self.window_radius > MAX_WINDOW_RADIUS {
            return Err(CorrelatorError::InvalidConfig {
                reason: format!(
                    "window radius must be in (0, 24h], got {:?}",
                    self.window_radius
                ),
            });
        }
        if matches!(&self.log_group, LogGroupSource::Fixed(name) if name.is_empty()) {
            return Err(CorrelatorError::InvalidConfig {
                reason: "fixed log group name must not be empty".to_owned(),
            });
        }
        let window_radius = time::Duration::try_from(self.window_radius).map_err(|e| {
            CorrelatorError::InvalidConfig { reason: e.to_string() }
        })?;
        Ok(CorrelatorConfig {
            window_radius,
            filter_match: self.filter_match,
            log_group: self.log_group,
        })
    }
}

// ---------------------------------------------------------------------------
// AuditCorrelator
// ---------------------------------------------------------------------------

/// Pipeline component that implements the `domain::ActorCorrelator` port.
///
/// Every lookup is attempted once; nothing is cached between calls.
#[derive(Debug)]
pub struct AuditCorrelator<M: MetricMetadata, A: AuditTrail> {
    config: CorrelatorConfig,
    metadata: M,
    audit: A,
}

impl<M: MetricMetadata, A: AuditTrail> AuditCorrelator<M, A> {
    /// Create a correlator from `config` and its two collaborator adapters.
    #[must_use]
    pub fn new(config: CorrelatorConfig, metadata: M, audit: A) -> Self {
        Self { config, metadata, audit }
    }

    /// Resolve the metric filter bound to `alarm_id`.
    ///
    /// Only the first filter of the log group is used.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::AlarmNotFound`], [`CorrelationError::MissingLogGroup`],
    /// [`CorrelationError::NoFilterFound`], [`CorrelationError::EmptyPattern`], or a
    /// lookup variant when a collaborator call fails.
    pub async fn resolve_filter(
        &self,
        alarm_id: &str,
    ) -> Result<MetricFilterBinding, CorrelationError> {
        let log_group = match &self.config.log_group {
            LogGroupSource::Fixed(name) => name.clone(),
            LogGroupSource::AlarmDimension => {
                let dimensions = self
                    .metadata
                    .alarm_dimensions(alarm_id)
                    .await
                    .map_err(CorrelationError::AlarmLookup)?
                    .ok_or_else(|| CorrelationError::AlarmNotFound {
                        alarm_id: alarm_id.to_owned(),
                    })?;
                log_group_from_dimensions(dimensions).ok_or_else(|| {
                    CorrelationError::MissingLogGroup { alarm_id: alarm_id.to_owned() }
                })?
            }
        };

        let filters = self
            .metadata
            .metric_filters(&log_group)
            .await
            .map_err(CorrelationError::FilterLookup)?;
        tracing::debug!(%log_group, count = filters.len(), "correlator.filters.listed");

        let Some(binding) = filters.into_iter().next() else {
            return Err(CorrelationError::NoFilterFound { log_group });
        };
        if binding.pattern.is_empty() {
            return Err(CorrelationError::EmptyPattern { log_group });
        }
        Ok(binding)
    }
}

impl<M: MetricMetadata, A: AuditTrail> domain::ActorCorrelator for AuditCorrelator<M, A> {
    /// Find the user name of the first matching audit event in the window.
    ///
    /// The timestamp is validated before any collaborator is called.
    ///
    /// # Errors
    ///
    /// Returns a [`CorrelationError`] when the timestamp is malformed, the
    /// filter cannot be resolved, or the audit lookup fails.
    async fn correlate(
        &self,
        alarm_id: &str,
        state_change_time: &str,
    ) -> Result<String, CorrelationError> {
        let at = parse_state_change_time(state_change_time)?;
        let (start, end) = search_window(at, self.config.window_radius)?;
        let binding = self.resolve_filter(alarm_id).await?;

        let query = AuditQuery {
            start,
            end,
            event_name: match self.config.filter_match {
                FilterMatch::ServerSide => Some(binding.pattern.clone()),
                FilterMatch::ClientSide => None,
            },
        };
        let events = self
            .audit
            .lookup_events(&query)
            .await
            .map_err(CorrelationError::AuditLookup)?;
        tracing::debug!(
            alarm_id,
            pattern = %binding.pattern,
            count = events.len(),
            "correlator.events.fetched"
        );

        let actor = events
            .iter()
            .filter(|event| {
                self.config.filter_match == FilterMatch::ServerSide
                    || event.event_name.as_deref() == Some(binding.pattern.as_str())
            })
            .find_map(user_name);
        Ok(actor.unwrap_or_else(|| UNKNOWN_ACTOR.to_owned()))
    }
}

/// Pick the log group from alarm dimensions: a `LogGroupName` dimension if
/// present, otherwise the first one.
fn log_group_from_dimensions(dimensions: Vec<MetricDimension>) -> Option<String> {
    let position = dimensions
        .iter()
        .position(|d| d.name == LOG_GROUP_DIMENSION)
        .unwrap_or(0);
    dimensions.into_iter().nth(position).map(|d| d.value)
}

/// `userIdentity.userName` of an audit event body, if present.
fn user_name(event: &AuditEvent) -> Option<String> {
    let body = event.body.as_deref()?;
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "correlator.event.unparseable");
            return None;
        }
    };
    value
        .pointer("/userIdentity/userName")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
