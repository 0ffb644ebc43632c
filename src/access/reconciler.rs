use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use super::client::AuthorizationClient;
use super::strategy::{CheckStrategy, default_strategies};
use super::types::{AccessMode, Principal, ResourceRef, Verdict};

/// Result of reconciling one batch of candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowSet {
    pub allowed: HashSet<String>,
    /// Candidates that received an explicit verdict.
    pub decided: usize,
    /// Whether the mode fallback produced `allowed`.
    pub fallback: bool,
}

impl AllowSet {
    pub fn contains(&self, id: &str) -> bool {
        self.allowed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Drives a ranked chain of [`CheckStrategy`]s against an [`AuthorizationClient`].
pub struct AccessReconciler {
    client: Arc<dyn AuthorizationClient>,
    strategies: Vec<Box<dyn CheckStrategy>>,
}

impl std::fmt::Debug for AccessReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("AccessReconciler")
            .field("strategies", &names)
            .finish_non_exhaustive()
    }
}

impl AccessReconciler {
    pub fn new(client: Arc<dyn AuthorizationClient>) -> Self {
        Self::with_strategies(client, default_strategies())
    }

    pub fn with_strategies(
        client: Arc<dyn AuthorizationClient>,
        strategies: Vec<Box<dyn CheckStrategy>>,
    ) -> Self {
        Self { client, strategies }
    }

    pub fn client(&self) -> &dyn AuthorizationClient {
        self.client.as_ref()
    }

    /// Logs the server description, or a warning when the probe fails.
    pub async fn probe(&self) {
        match self.client.server_info().await {
            Ok(info) => debug!(server = %info, "Authorization service reachable"),
            Err(e) => warn!(error = %e, "Authorization connectivity probe failed"),
        }
    }

    /// First explicit verdict across the strategy chain, if any.
    async fn verdict_for(
        &self,
        principal: &Principal,
        resource: &ResourceRef,
        action: &str,
    ) -> Option<Verdict> {
        for strategy in &self.strategies {
            match strategy
                .check(self.client.as_ref(), principal, resource, action)
                .await
            {
                Ok(Some(verdict)) => return Some(verdict),
                Ok(None) => {
                    debug!(strategy = strategy.name(), id = %resource.id, "No verdict");
                }
                Err(e) => {
                    debug!(
                        strategy = strategy.name(),
                        id = %resource.id,
                        error = %e,
                        "Strategy failed, trying next"
                    );
                }
            }
        }
        None
    }

    /// Ids of `candidates` that `principal` may perform `action` on.
    ///
    /// An explicit verdict for any candidate means only `Allow` verdicts count.
    /// When no candidate got a verdict, `mode` decides.
    #[instrument(
        skip(self, principal, candidates),
        fields(principal = %principal.id, candidates = candidates.len(), mode = %mode)
    )]
    pub async fn resolve_allowed(
        &self,
        principal: &Principal,
        candidates: &[ResourceRef],
        action: &str,
        mode: AccessMode,
    ) -> AllowSet {
        if candidates.is_empty() {
            return AllowSet::default();
        }

        let verdicts = join_all(
            candidates
                .iter()
                .map(|resource| self.verdict_for(principal, resource, action)),
        )
        .await;

        let decided = verdicts.iter().filter(|v| v.is_some()).count();
        if decided == 0 {
            let allowed = match mode {
                AccessMode::Permissive => candidates.iter().map(|c| c.id.clone()).collect(),
                AccessMode::Strict => HashSet::new(),
            };
            warn!(
                %mode,
                allowed = allowed.len(),
                "No authorization verdicts, applying fallback mode"
            );
            return AllowSet {
                allowed,
                decided,
                fallback: true,
            };
        }

        let allowed: HashSet<String> = candidates
            .iter()
            .zip(&verdicts)
            .filter(|(_, v)| matches!(v, Some(Verdict::Allow)))
            .map(|(c, _)| c.id.clone())
            .collect();

        if decided < candidates.len() {
            debug!(
                undecided = candidates.len() - decided,
                "Candidates without a verdict are excluded"
            );
        }
        debug!(allowed = allowed.len(), decided, "Access reconciled");

        AllowSet {
            allowed,
            decided,
            fallback: false,
        }
    }
}
