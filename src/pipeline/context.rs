use std::collections::HashSet;

use crate::retrieval::RankedCandidate;

/// Trims and lowercases a user question.
pub fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Numbered context blocks, each document's text cut to `char_budget` characters.
///
/// Candidates without text are skipped and do not consume a number.
pub fn build_context(docs: &[&RankedCandidate], char_budget: usize) -> String {
    docs.iter()
        .filter(|d| !d.text().trim().is_empty())
        .enumerate()
        .map(|(i, d)| {
            let source = if d.source().is_empty() { "?" } else { d.source() };
            let text: String = d.text().chars().take(char_budget).collect();
            format!("[Document {}] (Source: {})\n{}", i + 1, source, text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Distinct non-empty sources in first-seen order.
pub fn collect_sources(docs: &[&RankedCandidate]) -> Vec<String> {
    let mut seen = HashSet::new();
    docs.iter()
        .map(|d| d.source())
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .map(str::to_string)
        .collect()
}
