use chrono::{DateTime, Utc};

use super::error::CacheResult;
use super::store::CacheFields;

const FIELD_TENANT: &str = "tenant";
const FIELD_ROLE: &str = "role";
const FIELD_QUERY: &str = "query";
const FIELD_EMBEDDING: &str = "embedding";
const FIELD_ANSWER: &str = "answer";
const FIELD_SOURCES: &str = "sources";
const FIELD_TIMESTAMP: &str = "timestamp";

/// Serializes an embedding as packed little-endian `f32`s.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Inverse of [`embedding_to_bytes`]; `None` when the byte length is not a whole
/// number of non-zero `f32`s.
pub fn embedding_from_bytes(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

/// A cached answer as written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub tenant: String,
    pub role: String,
    pub query: String,
    pub embedding: Vec<f32>,
    pub answer: String,
    pub sources: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn to_fields(&self) -> CacheResult<CacheFields> {
        let mut fields = CacheFields::with_capacity(7);
        fields.insert(FIELD_TENANT.to_string(), self.tenant.clone().into_bytes());
        fields.insert(FIELD_ROLE.to_string(), self.role.clone().into_bytes());
        fields.insert(FIELD_QUERY.to_string(), self.query.clone().into_bytes());
        fields.insert(
            FIELD_EMBEDDING.to_string(),
            embedding_to_bytes(&self.embedding),
        );
        fields.insert(FIELD_ANSWER.to_string(), self.answer.clone().into_bytes());
        fields.insert(FIELD_SOURCES.to_string(), serde_json::to_vec(&self.sources)?);
        fields.insert(
            FIELD_TIMESTAMP.to_string(),
            self.timestamp.to_rfc3339().into_bytes(),
        );
        Ok(fields)
    }

    /// Decodes stored fields. The embedding and answer are required; the other
    /// fields fall back to empty values.
    pub fn from_fields(fields: &CacheFields) -> Option<Self> {
        let text = |name: &str| {
            fields
                .get(name)
                .map(|v| String::from_utf8_lossy(v).into_owned())
        };

        let embedding = embedding_from_bytes(fields.get(FIELD_EMBEDDING)?)?;
        let answer = text(FIELD_ANSWER)?;
        let sources = fields
            .get(FIELD_SOURCES)
            .and_then(|v| serde_json::from_slice::<Vec<String>>(v).ok())
            .unwrap_or_default();
        let timestamp = text(FIELD_TIMESTAMP)
            .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Some(Self {
            tenant: text(FIELD_TENANT).unwrap_or_default(),
            role: text(FIELD_ROLE).unwrap_or_default(),
            query: text(FIELD_QUERY).unwrap_or_default(),
            embedding,
            answer,
            sources,
            timestamp,
        })
    }
}

/// A lookup that passed the similarity gate.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub answer: String,
    pub sources: Vec<String>,
    pub similarity: f32,
    /// The query text that produced the cached answer.
    pub cached_query: String,
    pub timestamp: DateTime<Utc>,
}
