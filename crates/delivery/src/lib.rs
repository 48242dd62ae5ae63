// Rust guideline compliant 2026-10-12

//! Delivery engine -- submits enriched incidents to the paging provider with
//! bounded retry.
//!
//! [`DeliveryEngine`] implements the `domain::Pager` port over an injected
//! `domain::IncidentTransport` (the HTTP call) and `domain::Sleeper` (the
//! backoff clock). Every failure is retryable until the attempt budget is
//! spent. Configuration via [`DeliveryConfig::builder`].

use domain::{
    AttemptFailure, DeliveryError, DeliveryReceipt, EnrichedIncident, IncidentTransport,
    RoutingKey, Sleeper,
};
use serde::Serialize;
use std::time::Duration;

/// Event action for new incidents.
pub const TRIGGER: &str = "trigger";

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Errors raised while building a delivery engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The supplied configuration is invalid.
    #[error("invalid delivery configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Which provider statuses count as a successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum SuccessPolicy {
    /// Only `202 Accepted`.
    #[serde(rename = "accepted")]
    Accepted,
    /// Any status below 400.
    #[default]
    #[serde(rename = "below400")]
    Below400,
}

impl SuccessPolicy {
    /// `true` when `status` is a success under this policy.
    #[must_use]
    pub fn is_success(self, status: u16) -> bool {
        match self {
            Self::Accepted => status == 202,
            Self::Below400 => status < 400,
        }
    }
}

/// Attempt budget and linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay unit; the wait before retry `i` is `i * base_delay`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the retry that follows attempt number `attempt` (1-indexed).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// `true` when another attempt may follow attempt number `attempt`.
    #[must_use]
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

// ---------------------------------------------------------------------------
// DeliveryConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`DeliveryEngine`].
///
/// Construct via [`DeliveryConfig::builder`].
#[derive(Debug, Clone, Copy)]
pub struct DeliveryConfig {
    /// Attempt budget and backoff.
    pub retry: RetryPolicy,
    /// Status classification.
    pub success: SuccessPolicy,
}

/// Builder for [`DeliveryConfig`].
///
/// Obtain via [`DeliveryConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct DeliveryConfigBuilder {
    max_attempts: u32,
    base_delay: Duration,
    success: SuccessPolicy,
}

impl DeliveryConfig {
    /// Create a builder.
    ///
    /// Default values: `max_attempts = 3`, `base_delay = 1 s`, `success = Below400`.
    #[must_use]
    pub fn builder() -> DeliveryConfigBuilder {
        DeliveryConfigBuilder {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            success: SuccessPolicy::default(),
        }
    }
}

impl DeliveryConfigBuilder {
    /// Override the attempt budget.
    #[must_use]
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Override the backoff unit.
    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Choose which statuses count as success.
    #[must_use]
    pub fn success_policy(mut self, policy: SuccessPolicy) -> Self {
        self.success = policy;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when `max_attempts` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<DeliveryConfig, EngineError> {
        if self.max_attempts == 0 {
            return Err(EngineError::InvalidConfig {
                reason: "max_attempts must be >= 1".to_owned(),
            });
        }
        Ok(DeliveryConfig {
            retry: RetryPolicy { max_attempts: self.max_attempts, base_delay: self.base_delay },
            success: self.success,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

/// Request body expected by the ingestion endpoint.
#[derive(Debug, Serialize)]
struct EventEnvelope<'a> {
    routing_key: &'a str,
    event_action: &'static str,
    payload: &'a EnrichedIncident,
}

/// Serialize the trigger request for `incident`.
///
/// # Errors
///
/// Returns the serializer error. The engine counts it as a failed attempt.
pub fn encode(incident: &EnrichedIncident, routing_key: &RoutingKey) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&EventEnvelope {
        routing_key: routing_key.as_str(),
        event_action: TRIGGER,
        payload: incident,
    })
}

// ---------------------------------------------------------------------------
// DeliveryAttempt
// ---------------------------------------------------------------------------

/// Result of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The provider accepted the incident.
    Delivered {
        /// Status returned by the provider.
        status: u16,
    },
    /// The attempt failed and another one follows.
    Retryable(AttemptFailure),
    /// The attempt failed and the budget is spent.
    Terminal(AttemptFailure),
}

/// One numbered delivery attempt and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAttempt {
    /// Attempt ordinal, starting at 1.
    pub number: u32,
    /// What happened.
    pub outcome: AttemptOutcome,
}

// ---------------------------------------------------------------------------
// DeliveryEngine
// ---------------------------------------------------------------------------

/// Pipeline component that implements the `domain::Pager` port.
///
/// Attempts run strictly one after another; the backoff is awaited on the
/// injected `Sleeper` before each retry.
#[derive(Debug)]
pub struct DeliveryEngine<T: IncidentTransport, S: Sleeper> {
    config: DeliveryConfig,
    transport: T,
    sleeper: S,
}

impl<T: IncidentTransport, S: Sleeper> DeliveryEngine<T, S> {
    /// Create an engine from `config`, a transport, and a backoff clock.
    #[must_use]
    pub fn new(config: DeliveryConfig, transport: T, sleeper: S) -> Self {
        Self { config, transport, sleeper }
    }

    /// Run attempt number `number` and classify its outcome.
    pub async fn attempt(
        &self,
        number: u32,
        incident: &EnrichedIncident,
        routing_key: &RoutingKey,
    ) -> DeliveryAttempt {
        let failure = match encode(incident, routing_key) {
            Err(e) => AttemptFailure::Serialization { reason: e.to_string() },
            Ok(body) => match self.transport.post(body).await {
                Ok(status) if self.config.success.is_success(status) => {
                    return DeliveryAttempt { number, outcome: AttemptOutcome::Delivered { status } };
                }
                Ok(status) => AttemptFailure::Rejected { status },
                Err(e) => AttemptFailure::Transport(e),
            },
        };
        let outcome = if self.config.retry.allows_retry_after(number) {
            AttemptOutcome::Retryable(failure)
        } else {
            AttemptOutcome::Terminal(failure)
        };
        DeliveryAttempt { number, outcome }
    }
}

impl<T: IncidentTransport, S: Sleeper> domain::Pager for DeliveryEngine<T, S> {
    /// Deliver `incident`, retrying up to the configured budget.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Exhausted` carrying the last failure when every
    /// attempt failed.
    async fn deliver(
        &self,
        incident: &EnrichedIncident,
        routing_key: &RoutingKey,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let mut number = 1;
        loop {
            let attempt = self.attempt(number, incident, routing_key).await;
            match attempt.outcome {
                AttemptOutcome::Delivered { status } => {
                    tracing::info!(status, attempts = number, "delivery.sent");
                    return Ok(DeliveryReceipt { attempts: number, status });
                }
                AttemptOutcome::Retryable(failure) => {
                    let delay = self.config.retry.delay_after(number);
                    tracing::warn!(
                        error = %failure,
                        next_attempt = number + 1,
                        delay = ?delay,
                        "delivery.retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    number += 1;
                }
                AttemptOutcome::Terminal(failure) => {
                    tracing::warn!(error = %failure, attempts = number, "delivery.exhausted");
                    return Err(DeliveryError::Exhausted { attempts: number, last: failure });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
