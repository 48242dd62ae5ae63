// Rust guideline compliant 2026-10-12

//! IAM adapter for the `AccountAliasSource` port.

use domain::{AccountAliasSource, LookupError};

use super::lookup_failed;

/// Lists the account's aliases through IAM `ListAccountAliases`.
#[derive(Debug, Clone)]
pub struct IamAliases {
    client: aws_sdk_iam::Client,
}

impl IamAliases {
    /// Wrap an IAM client.
    #[must_use]
    pub fn new(client: aws_sdk_iam::Client) -> Self {
        Self { client }
    }
}

impl AccountAliasSource for IamAliases {
    async fn list_account_aliases(&self) -> Result<Vec<String>, LookupError> {
        let output = self
            .client
            .list_account_aliases()
            .send()
            .await
            .map_err(|e| lookup_failed("iam", e))?;
        Ok(output.account_aliases().to_vec())
    }
}
