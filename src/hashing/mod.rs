//! Cache key material.
//!
//! Keys have the shape `cache:query:{tenant}:{role}:{query_hash}`. Tenant and role are
//! normalized (trimmed, lowercased) and escaped before they are placed in the key, so a
//! tenant value can never spell out another tenant's key or a glob pattern.

use globset::{Glob, GlobMatcher};

pub const CACHE_KEY_PREFIX: &str = "cache:query";

/// Upper bound (exclusive) of [`hash_query`].
pub const QUERY_HASH_MODULUS: u64 = 1_000_000_000_000;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// A collision between two different query texts under the same tenant and role is
/// tolerated: the semantic cache compares embeddings before reporting a hit, so a
/// colliding key degrades into a miss rather than a wrong answer.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Bounded hash of the literal query text (not of its embedding).
#[inline]
pub fn hash_query(query: &str) -> u64 {
    hash_to_u64(query.as_bytes()) % QUERY_HASH_MODULUS
}

/// Trims and lowercases a tenant or role value.
#[inline]
pub fn normalize_segment(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Escapes the key separator and glob metacharacters.
pub fn escape_key_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '*' => out.push_str("%2A"),
            '?' => out.push_str("%3F"),
            '[' => out.push_str("%5B"),
            ']' => out.push_str("%5D"),
            '\\' => out.push_str("%5C"),
            '{' => out.push_str("%7B"),
            '}' => out.push_str("%7D"),
            _ => out.push(c),
        }
    }
    out
}

fn key_segment(value: &str) -> String {
    escape_key_segment(&normalize_segment(value))
}

/// Builds the deterministic cache key for `(tenant, role, query)`.
pub fn cache_key(tenant: &str, role: &str, query: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        CACHE_KEY_PREFIX,
        key_segment(tenant),
        key_segment(role),
        hash_query(query)
    )
}

/// Builds a glob pattern selecting cache keys by tenant and/or role.
///
/// `None` (or a blank value) acts as a wildcard for that segment.
pub fn cache_key_pattern(tenant: Option<&str>, role: Option<&str>) -> String {
    let segment = |v: Option<&str>| {
        v.map(key_segment)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "*".to_string())
    };
    let tenant = segment(tenant);
    let role = segment(role);

    if tenant == "*" && role == "*" {
        return format!("{}:*", CACHE_KEY_PREFIX);
    }
    format!("{}:{}:{}:*", CACHE_KEY_PREFIX, tenant, role)
}

/// Compiles a pattern from [`cache_key_pattern`] into a key matcher.
pub fn key_matcher(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(Glob::new(pattern)?.compile_matcher())
}
