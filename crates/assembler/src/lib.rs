// Rust guideline compliant 2026-10-12

//! Incident assembler -- shapes a decoded alarm, the account alias, and the
//! correlated actor into an [`EnrichedIncident`].
//!
//! [`assemble`] is pure and total.

use domain::{AlarmNotification, EnrichedIncident, Severity};
use std::collections::BTreeMap;

/// Custom-detail key for the resolved account alias.
pub const ACCOUNT_NAME: &str = "Account Name";
/// Custom-detail key for the account identifier.
pub const ACCOUNT_ID: &str = "AWS Account Id";
/// Custom-detail key for the alarm name.
pub const ALARM_NAME: &str = "Alarm Name";
/// Custom-detail key for the alarm ARN.
pub const ALARM_ARN: &str = "Alarm Arn";
/// Custom-detail key for the alarm description.
pub const ALARM_DESCRIPTION: &str = "Alarm Description";
/// Custom-detail key for the state-change reason.
pub const NEW_STATE_REASON: &str = "New State Reason";
/// Custom-detail key for the new state.
pub const NEW_STATE_VALUE: &str = "New State Value";
/// Custom-detail key for the state-change time.
pub const STATE_CHANGE_TIME: &str = "State Change Time";
/// Custom-detail key for the correlated actor.
pub const USER_IDENTITY: &str = "User Identity";

/// Build the incident for one alarm.
///
/// Severity is always [`Severity::Critical`]; the actor is always included,
/// callers pass `"unknown"` when correlation did not resolve one.
#[must_use]
pub fn assemble(alarm: AlarmNotification, account_alias: &str, actor: &str) -> EnrichedIncident {
    let summary = format!(
        "Alarm Triggered: {} AWS Account: {account_alias} ({})",
        alarm.alarm_name, alarm.account_id
    );
    let source = format!("AWS Account: {account_alias} ({})", alarm.account_id);

    let custom_details = BTreeMap::from([
        (ACCOUNT_NAME.to_owned(), account_alias.to_owned()),
        (ACCOUNT_ID.to_owned(), alarm.account_id),
        (ALARM_NAME.to_owned(), alarm.alarm_name),
        (ALARM_ARN.to_owned(), alarm.alarm_arn),
        (ALARM_DESCRIPTION.to_owned(), alarm.alarm_description),
        (NEW_STATE_REASON.to_owned(), alarm.new_state_reason),
        (NEW_STATE_VALUE.to_owned(), alarm.new_state_value),
        (STATE_CHANGE_TIME.to_owned(), alarm.state_change_time),
        (USER_IDENTITY.to_owned(), actor.to_owned()),
    ]);

    EnrichedIncident { summary, source, severity: Severity::Critical, custom_details }
}
