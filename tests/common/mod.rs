//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use secure_rag::embedding::EmbeddingResult;
use secure_rag::generation::GenerationResult;
use secure_rag::{
    DocumentIndex, DocumentPayload, DocumentPoint, Embedder, Generator, LexicalIndex,
    LexicalSnapshot, MockDocumentIndex, Sensitivity, vectordb::WriteConsistency,
};

pub const COLLECTION: &str = "legal_docs";

/// Embeds every text onto the same axis and counts calls.
#[derive(Default)]
pub struct AxisEmbedder {
    calls: AtomicUsize,
}

impl AxisEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for AxisEmbedder {
    async fn embed(&self, _text: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![1.0, 0.0, 0.0, 0.0])
    }

    fn dimension(&self) -> usize {
        4
    }
}

/// Echoes its context back so tests can inspect what the model would have seen.
#[derive(Default)]
pub struct EchoGenerator {
    contexts: Mutex<Vec<String>>,
}

impl EchoGenerator {
    pub fn calls(&self) -> usize {
        self.contexts.lock().len()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().clone()
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, context: &str, question: &str) -> GenerationResult<String> {
        self.contexts.lock().push(context.to_string());
        Ok(format!("Answer to '{question}' from {} chars", context.len()))
    }
}

type Doc = (&'static str, [f32; 4], &'static str, &'static str, &'static str, Sensitivity);

/// The confidential salary document is the closest dense match for every query.
#[rustfmt::skip]
pub const DOCS: [Doc; 5] = [
    ("1", [1.0, 0.0, 0.0, 0.0], "Salary band adjustments: manager bands rise 4% in March.", "salary.txt", "acme", Sensitivity::Confidential),
    ("2", [0.9, 0.1, 0.0, 0.0], "Salary band adjustments are announced by HR each spring.", "handbook.txt", "acme", Sensitivity::Public),
    ("3", [0.8, 0.2, 0.0, 0.0], "Remote work requires manager approval.", "remote.txt", "acme", Sensitivity::Public),
    ("4", [0.95, 0.05, 0.0, 0.0], "Globex salary band adjustments for 2024.", "globex_salary.txt", "globex", Sensitivity::Public),
    ("5", [0.0, 1.0, 0.0, 0.0], "Salary bands confidential appendix.", "appendix.txt", "acme", Sensitivity::Confidential),
];

pub async fn seeded_index() -> Arc<MockDocumentIndex> {
    let index = Arc::new(MockDocumentIndex::new());
    index.ensure_collection(COLLECTION, 4).await.unwrap();
    let points = DOCS
        .iter()
        .map(|(id, vector, text, source, tenant, sensitivity)| {
            DocumentPoint::new(
                vector.to_vec(),
                DocumentPayload::new(text, source, tenant, *sensitivity),
            )
            .with_id(id)
        })
        .collect();
    index
        .upsert_documents(COLLECTION, points, WriteConsistency::Strong)
        .await
        .unwrap();
    index
}

/// Lexical index keyed by source filename, as produced by offline corpus builds.
pub fn filename_lexical() -> Arc<LexicalIndex> {
    let snapshot = LexicalSnapshot::new(
        DOCS.iter().map(|d| d.2.to_string()).collect(),
        DOCS.iter().map(|d| d.3.to_string()).collect(),
    )
    .unwrap();
    Arc::new(LexicalIndex::build(&snapshot).unwrap())
}
