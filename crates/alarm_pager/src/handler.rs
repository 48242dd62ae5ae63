// Rust guideline compliant 2026-10-12

//! Serverless invocation glue: one SNS delivery in, one pipeline batch out.

use aws_lambda_events::event::sns::SnsEvent;
use domain::{AccountIdentity, ActorCorrelator, Pager};
use pipeline::{BatchReport, Pipeline};

/// The wired pipeline plus its three components, built once per cold start.
#[derive(Debug)]
pub struct App<I, C, P> {
    pipeline: Pipeline,
    identity: I,
    correlator: C,
    pager: P,
}

impl<I, C, P> App<I, C, P>
where
    I: AccountIdentity,
    C: ActorCorrelator,
    P: Pager,
{
    /// Bundle a pipeline with its components.
    #[must_use]
    pub fn new(pipeline: Pipeline, identity: I, correlator: C, pager: P) -> Self {
        Self { pipeline, identity, correlator, pager }
    }

    /// Process every record's message as one batch.
    ///
    /// Never fails: per-notification problems are logged and counted.
    pub async fn handle(&self, event: &SnsEvent) -> BatchReport {
        let messages: Vec<&[u8]> = event.records.iter().map(|r| r.sns.message.as_bytes()).collect();
        self.pipeline
            .process_batch(&messages, &self.identity, &self.correlator, &self.pager)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::App;
    use aws_lambda_events::event::sns::SnsEvent;
    use domain::{
        AccountIdentity, ActorCorrelator, CorrelationError, DeliveryError, DeliveryReceipt,
        EnrichedIncident, IdentityError, Pager, RoutingKey,
    };
    use pipeline::{BatchReport, Pipeline};
    use std::cell::RefCell;

    struct FixedIdentity;

    impl AccountIdentity for FixedIdentity {
        async fn resolve_account_alias(&self) -> Result<String, IdentityError> {
            Ok("payments-prod".to_owned())
        }
    }

    struct FixedActor;

    impl ActorCorrelator for FixedActor {
        async fn correlate(&self, _alarm_id: &str, _at: &str) -> Result<String, CorrelationError> {
            Ok("alice".to_owned())
        }
    }

    #[derive(Default)]
    struct RecordingPager {
        summaries: RefCell<Vec<String>>,
    }

    impl Pager for &RecordingPager {
        async fn deliver(
            &self,
            incident: &EnrichedIncident,
            _routing_key: &RoutingKey,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            self.summaries.borrow_mut().push(incident.summary.clone());
            Ok(DeliveryReceipt { attempts: 1, status: 202 })
        }
    }

    /// One SNS record as delivered by the Lambda service.
    fn record(message: &str) -> serde_json::Value {
        serde_json::json!({
            "EventSource": "aws:sns",
            "EventVersion": "1.0",
            "EventSubscriptionArn": "arn:aws:sns:eu-west-2:123456789012:alarms:2bcfbf39-05c3-41de-beaa-fcfcc21c8f55",
            "Sns": {
                "Type": "Notification",
                "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
                "TopicArn": "arn:aws:sns:eu-west-2:123456789012:alarms",
                "Subject": "ALARM",
                "Message": message,
                "Timestamp": "2024-05-14T09:31:08.000Z",
                "SignatureVersion": "1",
                "Signature": "tcc6faL2yUC6dgZdmrwh1Y4cGa/ebXEkAi6RibDsvpi+tE/1+82j...65r==",
                "SigningCertUrl": "https://sns.eu-west-2.amazonaws.com/SimpleNotificationService.pem",
                "UnsubscribeUrl": "https://sns.eu-west-2.amazonaws.com/?Action=Unsubscribe",
                "MessageAttributes": {}
            }
        })
    }

    fn event(records: Vec<serde_json::Value>) -> SnsEvent {
        serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
    }

    fn alarm_message(name: &str) -> String {
        serde_json::json!({
            "AlarmName": name,
            "AWSAccountId": "123456789012",
            "AlarmArn": format!("arn:aws:cloudwatch:eu-west-2:123456789012:alarm:{name}"),
            "AlarmDescription": "",
            "NewStateReason": "Threshold Crossed",
            "NewStateValue": "ALARM",
            "StateChangeTime": "2024-05-14T09:31:07.512+0000"
        })
        .to_string()
    }

    #[tokio::test]
    async fn every_record_message_is_processed_in_order() {
        let pager = RecordingPager::default();
        let app = App::new(Pipeline::new(RoutingKey::new("k")), FixedIdentity, FixedActor, &pager);
        let event = event(vec![
            record(&alarm_message("first")),
            record("not json"),
            record(&alarm_message("second")),
        ]);

        let report = app.handle(&event).await;

        assert_eq!(report, BatchReport { received: 3, skipped: 1, delivered: 2, failed: 0 });
        assert_eq!(
            *pager.summaries.borrow(),
            vec![
                "Alarm Triggered: first AWS Account: payments-prod (123456789012)".to_owned(),
                "Alarm Triggered: second AWS Account: payments-prod (123456789012)".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn empty_event_is_an_empty_batch() {
        let pager = RecordingPager::default();
        let app = App::new(Pipeline::new(RoutingKey::default()), FixedIdentity, FixedActor, &pager);

        let report = app.handle(&event(vec![])).await;

        assert_eq!(report, BatchReport::default());
        assert!(pager.summaries.borrow().is_empty());
    }
}
