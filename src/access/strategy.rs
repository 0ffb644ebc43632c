use async_trait::async_trait;

use super::client::AuthorizationClient;
use super::error::AccessResult;
use super::types::{Principal, ResourceRef, Verdict};

/// One way of asking the authorization client about a candidate.
///
/// `Ok(None)` means the strategy ran but produced no verdict; the next strategy
/// in the chain is tried, exactly as for an error.
#[async_trait]
pub trait CheckStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(
        &self,
        client: &dyn AuthorizationClient,
        principal: &Principal,
        resource: &ResourceRef,
        action: &str,
    ) -> AccessResult<Option<Verdict>>;
}

/// Uses [`AuthorizationClient::is_allowed`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanCheck;

#[async_trait]
impl CheckStrategy for BooleanCheck {
    fn name(&self) -> &'static str {
        "is_allowed"
    }

    async fn check(
        &self,
        client: &dyn AuthorizationClient,
        principal: &Principal,
        resource: &ResourceRef,
        action: &str,
    ) -> AccessResult<Option<Verdict>> {
        let allowed = client.is_allowed(principal, resource, action).await?;
        Ok(Some(Verdict::from(allowed)))
    }
}

/// Uses [`AuthorizationClient::check_resource`]; a decision that omits the
/// action is ambiguous.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisionCheck;

#[async_trait]
impl CheckStrategy for DecisionCheck {
    fn name(&self) -> &'static str {
        "check_resource"
    }

    async fn check(
        &self,
        client: &dyn AuthorizationClient,
        principal: &Principal,
        resource: &ResourceRef,
        action: &str,
    ) -> AccessResult<Option<Verdict>> {
        let decision = client
            .check_resource(principal, resource, &[action])
            .await?;
        Ok(decision.verdict(action))
    }
}

/// Boolean check first, then the structured decision.
pub fn default_strategies() -> Vec<Box<dyn CheckStrategy>> {
    vec![Box::new(BooleanCheck), Box::new(DecisionCheck)]
}
