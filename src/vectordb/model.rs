use std::collections::{BTreeMap, HashMap};

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{PointId, Value};
use serde::{Deserialize, Serialize};

/// Sensitivity label assigned at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Public,
    Confidential,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Public => "public",
            Sensitivity::Confidential => "confidential",
        }
    }

    /// Parses a payload label (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Sensitivity::Public),
            "confidential" => Some(Sensitivity::Confidential),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunk payload as stored alongside its vector.
///
/// A missing sensitivity label stays `None`; it never defaults to public.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub text: String,
    pub source: String,
    pub tenant: String,
    pub sensitivity: Option<Sensitivity>,
    /// Remaining string/integer payload fields (`doc_type`, `year`, ...).
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl DocumentPayload {
    const TEXT: &'static str = "text";
    const SOURCE: &'static str = "source";
    const TENANT: &'static str = "tenant";
    const SENSITIVITY: &'static str = "sensitivity";

    pub fn new(text: &str, source: &str, tenant: &str, sensitivity: Sensitivity) -> Self {
        Self {
            text: text.to_string(),
            source: source.to_string(),
            tenant: tenant.to_string(),
            sensitivity: Some(sensitivity),
            extra: BTreeMap::new(),
        }
    }

    /// Returns a payload field by name as a string.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            Self::TEXT => Some(self.text.clone()),
            Self::SOURCE => Some(self.source.clone()),
            Self::TENANT => Some(self.tenant.clone()),
            Self::SENSITIVITY => self.sensitivity.map(|s| s.as_str().to_string()),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Flattens the payload into string attributes (used as authorization attributes).
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = self.extra.clone();
        attrs.insert(Self::SOURCE.to_string(), self.source.clone());
        attrs.insert(Self::TENANT.to_string(), self.tenant.clone());
        if let Some(s) = self.sensitivity {
            attrs.insert(Self::SENSITIVITY.to_string(), s.as_str().to_string());
        }
        attrs
    }

    pub fn from_qdrant(payload: HashMap<String, Value>) -> Self {
        let mut out = Self::default();
        for (key, value) in payload {
            let as_string = value
                .as_str()
                .map(|s| s.to_string())
                .or_else(|| value.as_integer().map(|i| i.to_string()));
            let Some(as_string) = as_string else {
                continue;
            };
            match key.as_str() {
                Self::TEXT => out.text = as_string,
                Self::SOURCE => out.source = as_string,
                Self::TENANT => out.tenant = as_string,
                Self::SENSITIVITY => out.sensitivity = Sensitivity::parse(&as_string),
                _ => {
                    out.extra.insert(key, as_string);
                }
            }
        }
        out
    }

    pub fn into_qdrant(self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(Self::TEXT.to_string(), self.text.into());
        payload.insert(Self::SOURCE.to_string(), self.source.into());
        payload.insert(Self::TENANT.to_string(), self.tenant.into());
        if let Some(s) = self.sensitivity {
            payload.insert(Self::SENSITIVITY.to_string(), s.as_str().to_string().into());
        }
        for (k, v) in self.extra {
            payload.insert(k, v.into());
        }
        payload
    }
}

/// A point returned by search, id lookup, or scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub id: String,
    /// Similarity for search results, `0.0` for lookups.
    pub score: f32,
    pub payload: DocumentPayload,
}

/// A point to be written to the index.
#[derive(Debug, Clone)]
pub struct DocumentPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: DocumentPayload,
}

impl DocumentPoint {
    /// Creates a point with a fresh UUID.
    pub fn new(vector: Vec<f32>, payload: DocumentPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vector,
            payload,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

/// Parses a document key into a point id.
///
/// Keys that are neither an unsigned integer nor a UUID (source filenames, for example)
/// are not addressable by id.
pub fn parse_point_id(key: &str) -> Option<PointId> {
    if let Ok(n) = key.parse::<u64>() {
        return Some(PointId::from(n));
    }
    uuid::Uuid::parse_str(key)
        .ok()
        .map(|u| PointId::from(u.to_string()))
}

/// Renders a point id as the string key used throughout retrieval.
pub fn point_id_to_string(id: Option<PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options) {
        Some(PointIdOptions::Num(n)) => n.to_string(),
        Some(PointIdOptions::Uuid(s)) => s,
        None => String::new(),
    }
}

/// Cosine similarity; mismatched, empty, or zero-norm vectors yield `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
