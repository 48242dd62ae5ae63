// Rust guideline compliant 2026-10-12

//! Shared domain types for the alarm-enrichment pipeline.
//!
//! Defines the alarm and incident records, the error taxonomy shared across
//! components, and the hexagonal port traits: the collaborator ports
//! (`AccountAliasSource`, `MetricMetadata`, `AuditTrail`, `IncidentTransport`,
//! `Sleeper`) and the component ports (`AccountIdentity`, `ActorCorrelator`,
//! `Pager`). All pipeline components depend on this crate.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Actor reported when no audit event identifies who triggered the alarm.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Account label used for a whole batch when the alias lookup fails.
pub const UNKNOWN_ACCOUNT: &str = "Unknown";

/// Account label used when the account has no alias bound to it.
pub const NO_ALIAS: &str = "NoAlias";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A decoded alarm state-change notification.
///
/// All seven fields are required and must be JSON strings in the source
/// message; see the `decoder` crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmNotification {
    /// Alarm name.
    pub alarm_name: String,
    /// Account the alarm belongs to.
    #[serde(rename = "AWSAccountId")]
    pub account_id: String,
    /// Alarm identifier (ARN).
    pub alarm_arn: String,
    /// Free-form description configured on the alarm.
    pub alarm_description: String,
    /// Reason reported for the state transition.
    pub new_state_reason: String,
    /// New alarm state, e.g. `"ALARM"` or `"OK"`.
    pub new_state_value: String,
    /// State-change timestamp, `YYYY-MM-DDThh:mm:ss.sss±hhmm`.
    pub state_change_time: String,
}

/// One metric dimension attached to an alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDimension {
    /// Dimension name (e.g. `"LogGroupName"`).
    pub name: String,
    /// Dimension value.
    pub value: String,
}

/// A metric filter bound to a log group.
///
/// The pattern identifies the class of audit events relevant to an alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFilterBinding {
    /// Log group the filter belongs to.
    pub log_group: String,
    /// Filter pattern; may be empty as returned by the service.
    pub pattern: String,
}

/// Time-bounded query against the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    /// Inclusive lower bound.
    pub start: OffsetDateTime,
    /// Inclusive upper bound.
    pub end: OffsetDateTime,
    /// Server-side event-name restriction, if any.
    pub event_name: Option<String>,
}

/// One audit-log record as returned by the audit service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Event name (API action), when reported.
    pub event_name: Option<String>,
    /// Raw JSON body of the event, when reported.
    pub body: Option<String>,
}

/// Incident severity understood by the paging provider. Alarms always page
/// as critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Wake someone up.
    Critical,
}

/// A fully enriched incident, ready for delivery.
///
/// Serializes as the paging provider's `payload` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedIncident {
    /// One-line summary shown to the responder.
    pub summary: String,
    /// Origin of the incident.
    pub source: String,
    /// Incident severity.
    pub severity: Severity,
    /// Contextual key/value pairs.
    pub custom_details: BTreeMap<String, String>,
}

/// Secret routing key selecting the on-call service.
///
/// `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct RoutingKey(String);

impl RoutingKey {
    /// Wrap a routing key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key for serialization.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when no key was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("RoutingKey(<empty>)")
        } else {
            f.write_str("RoutingKey(<redacted>)")
        }
    }
}

/// Successful delivery summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Number of attempts made, including the successful one.
    pub attempts: u32,
    /// Status returned by the provider.
    pub status: u16,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A collaborator read call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The remote service returned an error or could not be reached.
    #[error("{service} request failed: {reason}")]
    Failed {
        /// Short service name (e.g. `"iam"`).
        service: &'static str,
        /// Human-readable description.
        reason: String,
    },
}

/// The account alias could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The identity service call failed.
    #[error("account alias lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

/// Audit correlation failed before an actor could be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrelationError {
    /// The state-change time does not match `YYYY-MM-DDThh:mm:ss.sss±hhmm`.
    #[error("unparseable state change time {input:?}: {reason}")]
    TimestampParse {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The alarm metadata service does not know the alarm.
    #[error("alarm {alarm_id} not found")]
    AlarmNotFound {
        /// The alarm identifier that was looked up.
        alarm_id: String,
    },
    /// The alarm carries no dimension naming a log group.
    #[error("alarm {alarm_id} has no log group dimension")]
    MissingLogGroup {
        /// The alarm identifier that was looked up.
        alarm_id: String,
    },
    /// The log group has no metric filters.
    #[error("no metric filters found for log group {log_group}")]
    NoFilterFound {
        /// The log group that was queried.
        log_group: String,
    },
    /// The first metric filter of the log group has an empty pattern.
    #[error("metric filter for log group {log_group} has an empty pattern")]
    EmptyPattern {
        /// The log group that was queried.
        log_group: String,
    },
    /// Describing the alarm failed.
    #[error("alarm lookup failed: {0}")]
    AlarmLookup(LookupError),
    /// Describing the metric filters failed.
    #[error("metric filter lookup failed: {0}")]
    FilterLookup(LookupError),
    /// Querying the audit log failed.
    #[error("audit lookup failed: {0}")]
    AuditLookup(LookupError),
}

/// The outbound HTTP call failed before a status was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS, or timeout failure.
    #[error("transport failed: {reason}")]
    Failed {
        /// Human-readable description.
        reason: String,
    },
}

/// Why a single delivery attempt failed. Every variant is retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptFailure {
    /// The incident could not be serialized.
    #[error("serialization failed: {reason}")]
    Serialization {
        /// Human-readable description.
        reason: String,
    },
    /// The request never produced a status.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The provider answered with a non-success status.
    #[error("provider rejected incident with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },
}

/// Terminal delivery failure after the attempt budget is spent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// Every attempt failed.
    #[error("delivery failed after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last: AttemptFailure,
    },
}

// ---------------------------------------------------------------------------
// Collaborator ports
// ---------------------------------------------------------------------------

/// Hexagonal port: the identity service listing account aliases.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait AccountAliasSource {
    /// List the aliases bound to the current account, in service order.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Failed`] when the service call fails.
    async fn list_account_aliases(&self) -> Result<Vec<String>, LookupError>;
}

/// Hexagonal port: alarm and metric-filter metadata.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait MetricMetadata {
    /// Describe the alarm's metric dimensions. `Ok(None)` means the alarm
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Failed`] when the service call fails.
    async fn alarm_dimensions(
        &self,
        alarm_id: &str,
    ) -> Result<Option<Vec<MetricDimension>>, LookupError>;

    /// List the metric filters of `log_group`, in service order.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Failed`] when the service call fails.
    async fn metric_filters(&self, log_group: &str)
    -> Result<Vec<MetricFilterBinding>, LookupError>;
}

/// Hexagonal port: the audit log.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait AuditTrail {
    /// Return events inside `[query.start, query.end]`, restricted to
    /// `query.event_name` when set, in service order.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Failed`] when the service call fails.
    async fn lookup_events(&self, query: &AuditQuery) -> Result<Vec<AuditEvent>, LookupError>;
}

/// Hexagonal port: the paging provider's ingestion endpoint.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait IncidentTransport {
    /// POST a JSON body and return the HTTP status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Failed`] when no status was received.
    async fn post(&self, body: Vec<u8>) -> Result<u16, TransportError>;
}

/// Hexagonal port: the backoff clock.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait Sleeper {
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

// ---------------------------------------------------------------------------
// Component ports
// ---------------------------------------------------------------------------

/// Hexagonal port: resolves the human-readable account label.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait AccountIdentity {
    /// Return the first account alias, or [`NO_ALIAS`] when none exist.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Lookup`] when the identity service fails.
    async fn resolve_account_alias(&self) -> Result<String, IdentityError>;
}

/// Hexagonal port: finds the principal whose action triggered an alarm.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait ActorCorrelator {
    /// Return the acting principal's user name, or [`UNKNOWN_ACTOR`] when no
    /// audit event in the search window identifies one.
    ///
    /// # Errors
    ///
    /// Returns a [`CorrelationError`] when any lookup step fails.
    async fn correlate(
        &self,
        alarm_id: &str,
        state_change_time: &str,
    ) -> Result<String, CorrelationError>;
}

/// Hexagonal port: delivers an incident to the paging provider.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait Pager {
    /// Deliver `incident` under `routing_key`, retrying per the implementation's policy.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Exhausted`] when every attempt failed.
    async fn deliver(
        &self,
        incident: &EnrichedIncident,
        routing_key: &RoutingKey,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}
