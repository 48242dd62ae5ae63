// Rust guideline compliant 2026-10-12

//! Alarm-pager entry point.
//!
//! Loads settings and AWS clients once per cold start, wires the identity,
//! correlator, and delivery components to their adapters, then serves SNS
//! invocations. Each invocation is one pipeline batch and always succeeds.
//!
//! # Environment
//!
//! ```text
//! PAGERDUTY_INTEGRATION_KEY   routing key (or ALARM_PAGER_ROUTING_KEY)
//! ALARM_PAGER_WINDOW_MINUTES  search-window radius, default 5
//! ALARM_PAGER_FILTER_MATCH    server_side | client_side
//! ALARM_PAGER_LOG_GROUP       fixed log group; unset = alarm dimensions
//! ALARM_PAGER_SUCCESS_POLICY  accepted | below400
//! ALARM_PAGER_MAX_ATTEMPTS    default 3
//! RUST_LOG                    default info
//! ```

mod adapters;
mod handler;
mod settings;

use adapters::cloudtrail_audit::CloudTrailAudit;
use adapters::cloudwatch_metadata::CloudWatchMetadata;
use adapters::http_transport::HttpTransport;
use adapters::iam_aliases::IamAliases;
use adapters::tokio_sleeper::TokioSleeper;
use anyhow::Context as _;
use aws_lambda_events::event::sns::SnsEvent;
use correlator::AuditCorrelator;
use delivery::DeliveryEngine;
use handler::App;
use identity::AliasResolver;
use lambda_runtime::{LambdaEvent, service_fn};
use pipeline::Pipeline;
use settings::Settings;
use tracing::Instrument as _;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .init();

    let settings = Settings::load().context("failed to load settings")?;
    if settings.routing_key.is_empty() {
        tracing::warn!("main.routing_key.empty");
    }
    let correlator_config = settings
        .correlator_config()
        .context("failed to build correlator config")?;
    let delivery_config = settings
        .delivery_config()
        .context("failed to build delivery config")?;
    let events_url = settings
        .events_url
        .parse()
        .with_context(|| format!("invalid events url {:?}", settings.events_url))?;
    let transport = HttpTransport::new(events_url).context("failed to build http client")?;

    let aws = aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await;
    let identity = AliasResolver::new(IamAliases::new(aws_sdk_iam::Client::new(&aws)));
    let correlator = AuditCorrelator::new(
        correlator_config,
        CloudWatchMetadata::new(
            aws_sdk_cloudwatch::Client::new(&aws),
            aws_sdk_cloudwatchlogs::Client::new(&aws),
        ),
        CloudTrailAudit::new(aws_sdk_cloudtrail::Client::new(&aws)),
    );
    let pager = DeliveryEngine::new(delivery_config, transport, TokioSleeper);
    let app = App::new(Pipeline::new(settings.routing_key), identity, correlator, pager);
    let app = &app;

    tracing::info!(
        window_minutes = settings.window_minutes,
        max_attempts = settings.max_attempts,
        "main.ready"
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SnsEvent>| async move {
        let request_id = event.context.request_id.clone();
        app.handle(&event.payload)
            .instrument(tracing::info_span!("invocation", %request_id))
            .await;
        Ok::<(), lambda_runtime::Error>(())
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
    .context("lambda runtime stopped")
}
