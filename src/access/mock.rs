use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::AuthorizationClient;
use super::error::{AccessError, AccessResult};
use super::types::{Principal, ResourceDecision, ResourceRef, Verdict};

/// In-memory authorization client with a switchable capability surface.
///
/// Verdicts are looked up by resource id, then by the `sensitivity` attribute
/// against the principal's roles. Unknown resources get no verdict.
#[derive(Debug, Default)]
pub struct MockAuthorizationClient {
    supports_boolean: bool,
    supports_decision: bool,
    failing: bool,
    by_id: RwLock<HashMap<String, Verdict>>,
    /// `(role, sensitivity) -> verdict`
    by_label: RwLock<HashMap<(String, String), Verdict>>,
    calls: AtomicUsize,
}

impl MockAuthorizationClient {
    /// Offers both capabilities.
    pub fn new() -> Self {
        Self {
            supports_boolean: true,
            supports_decision: true,
            ..Default::default()
        }
    }

    /// Offers only structured decisions.
    pub fn decisions_only() -> Self {
        Self {
            supports_decision: true,
            ..Default::default()
        }
    }

    /// Offers nothing; every call is unsupported.
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// Every supported call fails with a transport error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn set_verdict(&self, id: &str, verdict: Verdict) {
        self.by_id.write().insert(id.to_string(), verdict);
    }

    pub fn set_label_verdict(&self, role: &str, sensitivity: &str, verdict: Verdict) {
        self.by_label
            .write()
            .insert((role.to_string(), sensitivity.to_string()), verdict);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn lookup(&self, principal: &Principal, resource: &ResourceRef) -> AccessResult<Option<Verdict>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failing {
            return Err(AccessError::RequestFailed {
                url: "mock://authz".to_string(),
                message: "connection refused".to_string(),
            });
        }
        if let Some(v) = self.by_id.read().get(&resource.id) {
            return Ok(Some(*v));
        }
        let Some(label) = resource.attributes.get("sensitivity") else {
            return Ok(None);
        };
        let by_label = self.by_label.read();
        Ok(principal
            .roles
            .iter()
            .find_map(|role| by_label.get(&(role.clone(), label.clone())).copied()))
    }
}

#[async_trait]
impl AuthorizationClient for MockAuthorizationClient {
    async fn is_allowed(
        &self,
        principal: &Principal,
        resource: &ResourceRef,
        _action: &str,
    ) -> AccessResult<bool> {
        if !self.supports_boolean {
            return Err(AccessError::Unsupported {
                capability: "is_allowed",
            });
        }
        match self.lookup(principal, resource)? {
            Some(v) => Ok(v.is_allow()),
            None => Err(AccessError::MalformedResponse {
                reason: format!("no policy for {}", resource.id),
            }),
        }
    }

    async fn check_resource(
        &self,
        principal: &Principal,
        resource: &ResourceRef,
        actions: &[&str],
    ) -> AccessResult<ResourceDecision> {
        if !self.supports_decision {
            return Err(AccessError::Unsupported {
                capability: "check_resource",
            });
        }
        let mut decision = ResourceDecision::default();
        if let Some(v) = self.lookup(principal, resource)? {
            for action in actions {
                decision = decision.with_action(action, v);
            }
        }
        Ok(decision)
    }

    async fn server_info(&self) -> AccessResult<String> {
        if self.failing {
            return Err(AccessError::RequestFailed {
                url: "mock://authz".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok("mock authorization service".to_string())
    }
}
