// Rust guideline compliant 2026-10-12

//! Notification decoder -- turns a raw alarm notification message into an
//! [`AlarmNotification`].
//!
//! Decoding is all-or-nothing: malformed JSON, a missing field, or a field that
//! is not a JSON string yields [`DecodeError`] and no partial record.

use domain::AlarmNotification;

/// The message could not be decoded into an alarm notification.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Invalid JSON, a missing required field, or a non-string field value.
    #[error("malformed alarm notification: {source}")]
    Malformed {
        /// Parser diagnostic, including line and column.
        #[from]
        source: serde_json::Error,
    },
}

/// Decode one notification message.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] when `raw` is not a JSON object carrying
/// all seven required string fields.
pub fn decode(raw: &[u8]) -> Result<AlarmNotification, DecodeError> {
    let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(raw)?;
    let alarm: AlarmNotification = serde_json::from_value(serde_json::Value::Object(fields))?;
    tracing::debug!(alarm_name = %alarm.alarm_name, state = %alarm.new_state_value, "decoder.decoded");
    Ok(alarm)
}
