//! Interactive secure RAG console.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, BufReader};

use secure_rag::access::{AccessReconciler, CerbosClient};
use secure_rag::cache::{MemoryCacheStore, SemanticCache};
use secure_rag::config::Config;
use secure_rag::constants::validate_embedding_dim;
use secure_rag::embedding::{Embedder, OllamaEmbedder, PointwiseScorer, Reranker};
use secure_rag::generation::GenaiGenerator;
use secure_rag::guard::{LlamaGuardClassifier, SafetyClassifier};
use secure_rag::lexical::{LexicalIndex, LexicalSnapshot};
use secure_rag::pipeline::QueryPipeline;
use secure_rag::retrieval::HybridRetriever;
use secure_rag::vectordb::{DocumentIndex, QdrantClient};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Upper bound on points exported into a lexical snapshot.
const SNAPSHOT_EXPORT_LIMIT: u32 = 100_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let index = Arc::new(QdrantClient::new(&config.qdrant_url)?);
    if let Err(e) = index.health_check().await {
        tracing::warn!(error = %e, url = %config.qdrant_url, "Vector index not reachable");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(pos) = args.iter().position(|a| a == "--build-lexical") {
        let path = args
            .get(pos + 1)
            .map(PathBuf::from)
            .unwrap_or_else(|| config.lexical_path.clone());
        let snapshot =
            LexicalSnapshot::from_index(index.as_ref(), &config.collection, SNAPSHOT_EXPORT_LIMIT)
                .await?;
        snapshot.save(&path)?;
        println!("Wrote {} documents to {}", snapshot.len(), path.display());
        return Ok(());
    }

    tracing::info!(
        tenant = %config.tenant,
        role = %config.role,
        profile = %config.profile,
        access_mode = %config.access_mode,
        "Secure RAG starting"
    );

    let embedder: Arc<dyn Embedder> = Arc::new(
        OllamaEmbedder::new(&config.ollama_url, &config.embed_model)
            .with_dimension(config.embedding_dim),
    );
    let dims = config.dim_config();
    validate_embedding_dim(embedder.dimension(), dims.embedding_dim)?;

    if let Err(e) = index
        .ensure_collection(&config.collection, dims.vector_size())
        .await
    {
        tracing::warn!(error = %e, collection = %config.collection, "Could not ensure collection");
    }

    let lexical = if config.lexical_path.is_file() {
        let snapshot = LexicalSnapshot::load(&config.lexical_path)?;
        Some(Arc::new(LexicalIndex::build(&snapshot)?))
    } else {
        tracing::warn!(
            path = %config.lexical_path.display(),
            "No lexical snapshot, retrieval is dense-only"
        );
        None
    };

    let scorer: Option<Arc<dyn PointwiseScorer>> = match config.reranker_config() {
        Some(reranker_config) => match Reranker::load(reranker_config) {
            Ok(reranker) => Some(Arc::new(reranker)),
            Err(e) => {
                tracing::warn!(error = %e, "Reranker unavailable, keeping fused order");
                None
            }
        },
        None => {
            tracing::info!("No reranker model configured, keeping fused order");
            None
        }
    };

    let retriever = HybridRetriever::new(index, embedder.clone(), config.retriever_config())?
        .with_lexical(lexical)
        .with_scorer(scorer);

    let cache = SemanticCache::new(
        MemoryCacheStore::with_capacity(config.cache_capacity),
        config.cache_config(),
    )?;

    let access = AccessReconciler::new(Arc::new(CerbosClient::new(&config.cerbos_url)));
    let generator = Arc::new(GenaiGenerator::new(&config.generation_model));

    let classifier: Option<Arc<dyn SafetyClassifier>> = if config.profile.guarded() {
        Some(Arc::new(LlamaGuardClassifier::new(
            &config.ollama_url,
            &config.guard_model,
        )))
    } else {
        None
    };

    let pipeline = QueryPipeline::new(
        embedder,
        retriever,
        cache,
        access,
        generator,
        config.pipeline_config(),
    )?
    .with_classifier(classifier);

    println!(
        "\n--- Secure RAG (profile={}, role={}, tenant={}) ---",
        config.profile, config.role, config.tenant
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("Ask a question (or 'exit'): ");
        io::stdout().flush()?;

        let Some(question) = lines.next_line().await? else {
            break;
        };
        let trimmed = question.trim();
        if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        match pipeline.answer(trimmed, &config.tenant, &config.role).await {
            Ok(answer) => {
                println!("\nAnswer:\n {}", answer.text);
                println!("\nSources: {:?}", answer.sources);
            }
            Err(e) => println!("\nBlocked/Failed: {e}"),
        }
    }

    tracing::info!("Secure RAG shutdown complete");
    Ok(())
}
