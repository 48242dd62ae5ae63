// Rust guideline compliant 2026-10-12

//! Identity resolver for the alarm-enrichment pipeline.
//!
//! [`AliasResolver`] implements the `domain::AccountIdentity` port by
//! delegating the lookup to an injected `domain::AccountAliasSource` adapter.

use domain::{AccountAliasSource, IdentityError, NO_ALIAS};

/// Pipeline component that implements the `domain::AccountIdentity` port.
///
/// Generic over any `AccountAliasSource` adapter; one read-only call per resolution.
#[derive(Debug)]
pub struct AliasResolver<S: AccountAliasSource> {
    source: S,
}

impl<S: AccountAliasSource> AliasResolver<S> {
    /// Create a resolver wrapping `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: AccountAliasSource> domain::AccountIdentity for AliasResolver<S> {
    /// Return the first alias, or `"NoAlias"` when the account has none.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Lookup` when the identity service fails.
    async fn resolve_account_alias(&self) -> Result<String, IdentityError> {
        let aliases = self.source.list_account_aliases().await?;
        tracing::debug!(count = aliases.len(), "identity.aliases.listed");
        Ok(aliases.into_iter().next().unwrap_or_else(|| NO_ALIAS.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::AliasResolver;
    use domain::{AccountAliasSource, AccountIdentity as _, IdentityError, LookupError};
    use std::cell::Cell;

    struct MockSource {
        aliases: Result<Vec<String>, LookupError>,
        calls: Cell<u32>,
    }

    impl MockSource {
        fn with(aliases: &[&str]) -> Self {
            Self {
                aliases: Ok(aliases.iter().map(|a| (*a).to_owned()).collect()),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                aliases: Err(LookupError::Failed {
                    service: "iam",
                    reason: "AccessDenied".to_owned(),
                }),
                calls: Cell::new(0),
            }
        }
    }

    impl AccountAliasSource for MockSource {
        async fn list_account_aliases(&self) -> Result<Vec<String>, LookupError> {
            self.calls.set(self.calls.get() + 1);
            self.aliases.clone()
        }
    }

    #[tokio::test]
    async fn first_alias_wins() {
        let resolver = AliasResolver::new(MockSource::with(&["payments-prod", "legacy"]));
        assert_eq!(resolver.resolve_account_alias().await.unwrap(), "payments-prod");
        assert_eq!(resolver.source.calls.get(), 1);
    }

    #[tokio::test]
    async fn no_alias_sentinel_when_empty() {
        let resolver = AliasResolver::new(MockSource::with(&[]));
        assert_eq!(resolver.resolve_account_alias().await.unwrap(), "NoAlias");
    }

    #[tokio::test]
    async fn lookup_failure_is_reported() {
        let resolver = AliasResolver::new(MockSource::failing());
        let result = resolver.resolve_account_alias().await;
        assert!(matches!(result, Err(IdentityError::Lookup(_))), "{result:?}");
    }
}
