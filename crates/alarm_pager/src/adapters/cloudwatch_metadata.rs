// Rust guideline compliant 2026-10-12

//! CloudWatch + CloudWatch Logs adapter for the `MetricMetadata` port.
//!
//! Alarms are described by name. An alarm ARN
//! (`arn:<partition>:cloudwatch:<region>:<account>:alarm:<name>`) is reduced
//! to its name first; anything else is taken to be a name already.

use domain::{LookupError, MetricDimension, MetricFilterBinding, MetricMetadata};

use super::lookup_failed;

const ALARM_ARN_MARKER: &str = ":alarm:";

/// Alarm name embedded in `alarm_id`, which may be a name or an alarm ARN.
#[must_use]
pub fn alarm_name(alarm_id: &str) -> &str {
    alarm_id
        .strip_prefix("arn:")
        .and_then(|rest| rest.split_once(ALARM_ARN_MARKER))
        .map_or(alarm_id, |(_, name)| name)
}

/// Reads alarm dimensions from CloudWatch and metric filters from CloudWatch Logs.
#[derive(Debug, Clone)]
pub struct CloudWatchMetadata {
    alarms: aws_sdk_cloudwatch::Client,
    logs: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchMetadata {
    /// Wrap the two service clients.
    #[must_use]
    pub fn new(alarms: aws_sdk_cloudwatch::Client, logs: aws_sdk_cloudwatchlogs::Client) -> Self {
        Self { alarms, logs }
    }
}

impl MetricMetadata for CloudWatchMetadata {
    async fn alarm_dimensions(
        &self,
        alarm_id: &str,
    ) -> Result<Option<Vec<MetricDimension>>, LookupError> {
        let output = self
            .alarms
            .describe_alarms()
            .alarm_names(alarm_name(alarm_id))
            .send()
            .await
            .map_err(|e| lookup_failed("cloudwatch", e))?;

        Ok(output.metric_alarms().first().map(|alarm| {
            alarm
                .dimensions()
                .iter()
                .map(|d| MetricDimension {
                    name: d.name().unwrap_or_default().to_owned(),
                    value: d.value().unwrap_or_default().to_owned(),
                })
                .collect()
        }))
    }

    async fn metric_filters(&self, log_group: &str) -> Result<Vec<MetricFilterBinding>, LookupError> {
        let output = self
            .logs
            .describe_metric_filters()
            .log_group_name(log_group)
            .send()
            .await
            .map_err(|e| lookup_failed("logs", e))?;

        Ok(output
            .metric_filters()
            .iter()
            .map(|f| MetricFilterBinding {
                log_group: f.log_group_name().unwrap_or(log_group).to_owned(),
                pattern: f.filter_pattern().unwrap_or_default().to_owned(),
            })
            .collect())
    }
}
