// Rust guideline compliant 2026-10-12

//! Pipeline orchestrator -- drives a batch of raw alarm notifications through
//! decode, correlate, assemble, and deliver.
//!
//! Entry points: [`Pipeline::process_batch`], [`Pipeline::process_one`].
//! Failures are isolated per notification and the batch itself never fails.

use domain::{
    AccountIdentity, ActorCorrelator, DeliveryError, DeliveryReceipt, Pager, RoutingKey,
    UNKNOWN_ACCOUNT, UNKNOWN_ACTOR,
};
use tracing::Instrument as _;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What happened to one notification.
#[derive(Debug)]
pub enum NotificationOutcome {
    /// The message could not be decoded; nothing was sent.
    Skipped(decoder::DecodeError),
    /// The incident was accepted by the provider.
    Delivered(DeliveryReceipt),
    /// Every delivery attempt failed; the incident was dropped.
    Failed(DeliveryError),
}

/// Per-batch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Notifications in the batch.
    pub received: usize,
    /// Notifications skipped because they failed to decode.
    pub skipped: usize,
    /// Incidents accepted by the provider.
    pub delivered: usize,
    /// Incidents dropped after exhausting delivery attempts.
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Drives notifications through the enrichment-and-delivery stages.
///
/// Generic over the three component ports for static dispatch. Holds only the
/// routing key; the ports are injected per call.
#[derive(Debug)]
pub struct Pipeline {
    routing_key: RoutingKey,
}

impl Pipeline {
    /// Create a pipeline that pages under `routing_key`.
    #[must_use]
    pub fn new(routing_key: RoutingKey) -> Self {
        Self { routing_key }
    }

    /// Process every notification of a batch, strictly in order.
    ///
    /// The account alias is resolved once and shared by the whole batch,
    /// falling back to `"Unknown"` when the lookup fails. No notification's
    /// failure affects another, and this method cannot fail.
    pub async fn process_batch<R, I, C, P>(
        &self,
        batch: &[R],
        identity: &I,
        correlator: &C,
        pager: &P,
    ) -> BatchReport
    where
        R: AsRef<[u8]>,
        I: AccountIdentity,
        C: ActorCorrelator,
        P: Pager,
    {
        tracing::info!(size = batch.len(), "pipeline.batch.started");

        let account_alias = match identity.resolve_account_alias().await {
            Ok(alias) => alias,
            Err(e) => {
                tracing::warn!(error = %e, "pipeline.identity.fallback");
                UNKNOWN_ACCOUNT.to_owned()
            }
        };

        let mut report = BatchReport { received: batch.len(), ..BatchReport::default() };
        for (index, raw) in batch.iter().enumerate() {
            let outcome = self
                .process_one(raw.as_ref(), &account_alias, correlator, pager)
                .instrument(tracing::info_span!("notification", index))
                .await;
            match outcome {
                NotificationOutcome::Skipped(_) => report.skipped += 1,
                NotificationOutcome::Delivered(_) => report.delivered += 1,
                NotificationOutcome::Failed(_) => report.failed += 1,
            }
        }

        tracing::info!(
            received = report.received,
            skipped = report.skipped,
            delivered = report.delivered,
            failed = report.failed,
            "pipeline.batch.finished"
        );
        report
    }

    /// Decode, correlate, assemble, and deliver a single notification.
    pub async fn process_one<C, P>(
        &self,
        raw: &[u8],
        account_alias: &str,
        correlator: &C,
        pager: &P,
    ) -> NotificationOutcome
    where
        C: ActorCorrelator,
        P: Pager,
    {
        tracing::debug!(body = %String::from_utf8_lossy(raw), "pipeline.notification.received");

        let alarm = match decoder::decode(raw) {
            Ok(alarm) => alarm,
            Err(e) => {
                tracing::warn!(error = %e, "pipeline.notification.skipped");
                return NotificationOutcome::Skipped(e);
            }
        };

        let actor = match correlator.correlate(&alarm.alarm_arn, &alarm.state_change_time).await {
            Ok(actor) => actor,
            Err(e) => {
                tracing::warn!(alarm_name = %alarm.alarm_name, error = %e, "pipeline.correlation.fallback");
                UNKNOWN_ACTOR.to_owned()
            }
        };

        let alarm_name = alarm.alarm_name.clone();
        let incident = assembler::assemble(alarm, account_alias, &actor);

        match pager.deliver(&incident, &self.routing_key).await {
            Ok(receipt) => {
                tracing::info!(%alarm_name, %actor, attempts = receipt.attempts, "pipeline.incident.delivered");
                NotificationOutcome::Delivered(receipt)
            }
            Err(e) => {
                tracing::error!(%alarm_name, error = %e, "pipeline.incident.dropped");
                NotificationOutcome::Failed(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
