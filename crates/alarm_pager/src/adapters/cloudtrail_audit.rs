// Rust guideline compliant 2026-10-12

//! CloudTrail adapter for the `AuditTrail` port.
//!
//! One `LookupEvents` page per query. When the query names an event, it is
//! sent as an `EventName` lookup attribute and the service does the filtering.

use aws_sdk_cloudtrail::primitives::DateTime;
use aws_sdk_cloudtrail::types::{LookupAttribute, LookupAttributeKey};
use domain::{AuditEvent, AuditQuery, AuditTrail, LookupError};
use time::OffsetDateTime;

use super::lookup_failed;

const SERVICE: &str = "cloudtrail";

fn to_sdk_time(t: OffsetDateTime) -> DateTime {
    DateTime::from_secs_and_nanos(t.unix_timestamp(), t.nanosecond())
}

/// Searches management events through CloudTrail `LookupEvents`.
#[derive(Debug, Clone)]
pub struct CloudTrailAudit {
    client: aws_sdk_cloudtrail::Client,
}

impl CloudTrailAudit {
    /// Wrap a CloudTrail client.
    #[must_use]
    pub fn new(client: aws_sdk_cloudtrail::Client) -> Self {
        Self { client }
    }
}

impl AuditTrail for CloudTrailAudit {
    async fn lookup_events(&self, query: &AuditQuery) -> Result<Vec<AuditEvent>, LookupError> {
        let mut request = self
            .client
            .lookup_events()
            .start_time(to_sdk_time(query.start))
            .end_time(to_sdk_time(query.end));

        if let Some(name) = &query.event_name {
            let attribute = LookupAttribute::builder()
                .attribute_key(LookupAttributeKey::EventName)
                .attribute_value(name)
                .build()
                .map_err(|e| lookup_failed(SERVICE, e))?;
            request = request.lookup_attributes(attribute);
        }

        let output = request.send().await.map_err(|e| lookup_failed(SERVICE, e))?;
        tracing::debug!(count = output.events().len(), "cloudtrail.events.listed");

        Ok(output
            .events()
            .iter()
            .map(|e| AuditEvent {
                event_name: e.event_name().map(str::to_owned),
                body: e.cloud_trail_event().map(str::to_owned),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::to_sdk_time;
    use time::macros::datetime;

    #[test]
    fn sdk_time_keeps_subsecond_precision() {
        let t = to_sdk_time(datetime!(2024-05-14 09:26:07.512 UTC));
        assert_eq!(t.secs(), 1_715_678_767);
        assert_eq!(t.subsec_nanos(), 512_000_000);
    }
}
