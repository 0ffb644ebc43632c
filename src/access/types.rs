use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::error::AccessError;

/// Who is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub roles: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Principal {
    pub fn new(id: &str, role: &str) -> Self {
        Self {
            id: id.to_string(),
            roles: vec![role.to_string()],
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

/// What is being accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: String,
    pub id: String,
    pub attributes: BTreeMap<String, String>,
}

impl ResourceRef {
    pub fn new(kind: &str, id: &str, attributes: BTreeMap<String, String>) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allow,
    Deny,
}

impl Verdict {
    pub fn is_allow(self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

impl From<bool> for Verdict {
    fn from(allowed: bool) -> Self {
        if allowed { Verdict::Allow } else { Verdict::Deny }
    }
}

/// Per-action verdicts for one resource, as returned by a structured check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDecision {
    pub actions: HashMap<String, Verdict>,
}

impl ResourceDecision {
    pub fn with_action(mut self, action: &str, verdict: Verdict) -> Self {
        self.actions.insert(action.to_string(), verdict);
        self
    }

    /// `None` when the decision says nothing about `action`.
    pub fn verdict(&self, action: &str) -> Option<Verdict> {
        self.actions.get(action).copied()
    }
}

/// What to do when authorization yields no verdict for any candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// Keep every candidate; the retrieval prefilter already scoped them.
    #[default]
    Permissive,
    /// Keep nothing.
    Strict,
}

impl AccessMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::Permissive => "permissive",
            AccessMode::Strict => "strict",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(AccessMode::Permissive),
            "strict" => Ok(AccessMode::Strict),
            _ => Err(AccessError::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}
