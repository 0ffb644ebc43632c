use async_trait::async_trait;

use super::error::{AccessError, AccessResult};
use super::types::{Principal, ResourceDecision, ResourceRef};

/// Authorization service client.
///
/// Deployments expose different subsets of these calls; every method defaults to
/// [`AccessError::Unsupported`] so an implementation only overrides what it has.
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    /// Simple yes/no check for one action.
    async fn is_allowed(
        &self,
        _principal: &Principal,
        _resource: &ResourceRef,
        _action: &str,
    ) -> AccessResult<bool> {
        Err(AccessError::Unsupported {
            capability: "is_allowed",
        })
    }

    /// Structured per-action decision for one resource.
    async fn check_resource(
        &self,
        _principal: &Principal,
        _resource: &ResourceRef,
        _actions: &[&str],
    ) -> AccessResult<ResourceDecision> {
        Err(AccessError::Unsupported {
            capability: "check_resource",
        })
    }

    /// Connectivity probe; returns a server description.
    async fn server_info(&self) -> AccessResult<String> {
        Err(AccessError::Unsupported {
            capability: "server_info",
        })
    }
}
