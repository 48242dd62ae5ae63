// Rust guideline compliant 2026-10-12

//! Adapters (secondary ports) for the alarm-pager binary.
//!
//! Each sub-module implements one collaborator port from the `domain` crate
//! on top of an AWS service client, the HTTP client, or the tokio clock.

pub mod cloudtrail_audit;
pub mod cloudwatch_metadata;
pub mod http_transport;
pub mod iam_aliases;
pub mod tokio_sleeper;

use domain::LookupError;

/// Map an SDK failure to the domain lookup error, keeping the full cause chain.
fn lookup_failed<E: std::error::Error>(service: &'static str, error: E) -> LookupError {
    LookupError::Failed {
        service,
        reason: aws_sdk_iam::error::DisplayErrorContext(error).to_string(),
    }
}
