//! Payload predicates applied at the index query layer.

use qdrant_client::qdrant::{Condition, Filter};

use super::model::{DocumentPayload, Sensitivity};
use crate::hashing::normalize_segment;

/// A single `field == value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub key: String,
    pub value: String,
}

/// Conjunction of exact-match conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadFilter {
    must: Vec<FieldMatch>,
}

impl PayloadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `key == value` condition.
    pub fn must(mut self, key: &str, value: &str) -> Self {
        self.must.push(FieldMatch {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn conditions(&self) -> &[FieldMatch] {
        &self.must
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
    }

    /// Returns a filter requiring both `self` and `other`.
    pub fn and(&self, other: &PayloadFilter) -> PayloadFilter {
        let mut must = self.must.clone();
        must.extend(other.must.iter().cloned());
        PayloadFilter { must }
    }

    /// Evaluates the filter against a payload locally.
    pub fn matches(&self, payload: &DocumentPayload) -> bool {
        self.must
            .iter()
            .all(|c| payload.field(&c.key).as_deref() == Some(c.value.as_str()))
    }

    /// Converts to a qdrant filter (`None` when empty).
    pub fn to_qdrant(&self) -> Option<Filter> {
        if self.must.is_empty() {
            return None;
        }
        Some(Filter::must(
            self.must
                .iter()
                .map(|c| Condition::matches(c.key.as_str(), c.value.clone())),
        ))
    }
}

/// Which roles may see confidential material.
///
/// Every role not listed is restricted to public chunks, so an unrecognized role
/// narrows rather than widens what retrieval can return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefilterPolicy {
    pub confidential_roles: Vec<String>,
}

impl Default for PrefilterPolicy {
    fn default() -> Self {
        Self {
            confidential_roles: vec!["manager".to_string()],
        }
    }
}

impl PrefilterPolicy {
    pub fn with_confidential_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            confidential_roles: roles
                .into_iter()
                .map(|r| r.as_ref().trim().to_lowercase())
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    pub fn allows_confidential(&self, role: &str) -> bool {
        let role = role.trim().to_lowercase();
        self.confidential_roles.iter().any(|r| *r == role)
    }
}

/// Builds the tenant/sensitivity predicate for a principal.
///
/// The tenant is trimmed and lowercased exactly like the cache key segment.
pub fn build_prefilter(tenant: &str, role: &str, policy: &PrefilterPolicy) -> PayloadFilter {
    let filter = PayloadFilter::new().must("tenant", &normalize_segment(tenant));
    if policy.allows_confidential(role) {
        filter
    } else {
        filter.must("sensitivity", Sensitivity::Public.as_str())
    }
}
