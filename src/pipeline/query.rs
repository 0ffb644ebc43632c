use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::access::{AccessReconciler, Principal, ResourceRef};
use crate::cache::{CacheStore, SemanticCache};
use crate::constants::REFUSAL_MESSAGE;
use crate::embedding::Embedder;
use crate::generation::Generator;
use crate::guard::{PatternRedactor, Redactor, SafetyClassifier};
use crate::hashing::normalize_segment;
use crate::retrieval::{HybridRetriever, RankedCandidate};
use crate::vectordb::{DocumentIndex, build_prefilter};

use super::config::PipelineConfig;
use super::context::{build_context, collect_sources, normalize_question};
use super::error::{PipelineError, PipelineResult};

/// Final answer for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
    /// Served from the semantic cache.
    pub cached: bool,
    /// Cache similarity when `cached`.
    pub similarity: Option<f32>,
}

/// Owns every collaborator a query needs; one instance serves concurrent callers.
pub struct QueryPipeline<V: DocumentIndex, S: CacheStore> {
    embedder: Arc<dyn Embedder>,
    retriever: HybridRetriever<V>,
    cache: SemanticCache<S>,
    access: AccessReconciler,
    generator: Arc<dyn Generator>,
    redactor: Arc<dyn Redactor>,
    classifier: Option<Arc<dyn SafetyClassifier>>,
    config: PipelineConfig,
}

impl<V: DocumentIndex, S: CacheStore> std::fmt::Debug for QueryPipeline<V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("retriever", &self.retriever)
            .field("access", &self.access)
            .field("guarded", &self.classifier.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<V: DocumentIndex, S: CacheStore> QueryPipeline<V, S> {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        retriever: HybridRetriever<V>,
        cache: SemanticCache<S>,
        access: AccessReconciler,
        generator: Arc<dyn Generator>,
        config: PipelineConfig,
    ) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            embedder,
            retriever,
            cache,
            access,
            generator,
            redactor: Arc::new(PatternRedactor),
            classifier: None,
            config,
        })
    }

    pub fn with_redactor(mut self, redactor: Arc<dyn Redactor>) -> Self {
        self.redactor = redactor;
        self
    }

    /// Enables input and output safety classification.
    pub fn with_classifier(mut self, classifier: Option<Arc<dyn SafetyClassifier>>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &SemanticCache<S> {
        &self.cache
    }

    pub fn retriever(&self) -> &HybridRetriever<V> {
        &self.retriever
    }

    /// Answers `question` for a principal of `role` in `tenant`.
    #[instrument(skip(self, question), fields(tenant = %tenant, role = %role))]
    pub async fn answer(&self, question: &str, tenant: &str, role: &str) -> PipelineResult<Answer> {
        let question = normalize_question(question);
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }
        // Cache key, prefilter and principal must all see the same scope.
        let tenant = normalize_segment(tenant);
        let role = normalize_segment(role);

        if let Some(classifier) = &self.classifier
            && !classifier.classify(&question).await?.is_safe()
        {
            info!("Question blocked by input guard");
            return Err(PipelineError::BlockedInput);
        }

        let question = self.redactor.redact(&question);
        let embedding = self.embedder.embed(&question).await?;

        match self.cache.get(&question, &embedding, &tenant, &role).await {
            Ok(Some(hit)) => {
                info!(similarity = hit.similarity, "Answer served from cache");
                return Ok(Answer {
                    text: hit.answer,
                    sources: hit.sources,
                    cached: true,
                    similarity: Some(hit.similarity),
                });
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache lookup failed, continuing as miss"),
        }

        let filter = build_prefilter(&tenant, &role, &self.config.prefilter);
        debug!(conditions = filter.conditions().len(), "Prefilter built");

        let candidates = self
            .retriever
            .retrieve_with_embedding(&question, embedding.clone(), self.config.top_k, Some(&filter))
            .await?;

        let allowed = self.authorize(&candidates, &tenant, &role).await;

        let context = build_context(&allowed, self.config.context_char_budget);
        let sources = collect_sources(&allowed);
        debug!(
            retrieved = candidates.len(),
            allowed = allowed.len(),
            context_len = context.len(),
            "Context assembled"
        );

        let raw = self.generator.generate(&context, &question).await?;
        let mut text = self.redactor.redact(&raw);

        if let Some(classifier) = &self.classifier {
            match classifier.classify(&text).await {
                Ok(verdict) if verdict.is_safe() => {}
                Ok(_) => {
                    info!("Answer replaced by output guard");
                    text = REFUSAL_MESSAGE.to_string();
                }
                Err(e) => {
                    warn!(error = %e, "Output safety check failed, refusing");
                    text = REFUSAL_MESSAGE.to_string();
                }
            }
        }

        if let Err(e) = self
            .cache
            .set(&question, &embedding, &text, &sources, &tenant, &role, None)
            .await
        {
            warn!(error = %e, "Cache store failed");
        }

        Ok(Answer {
            text,
            sources,
            cached: false,
            similarity: None,
        })
    }

    /// Candidates the principal may read, in retrieval order.
    async fn authorize<'a>(
        &self,
        candidates: &'a [RankedCandidate],
        tenant: &str,
        role: &str,
    ) -> Vec<&'a RankedCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }

        self.access.probe().await;

        let principal = Principal::new(&self.config.principal_id, role)
            .with_attribute("tenant", tenant);
        let resources: Vec<ResourceRef> = candidates
            .iter()
            .map(|c| ResourceRef::new(&self.config.resource_kind, &c.id, c.payload.attributes()))
            .collect();

        let allow = self
            .access
            .resolve_allowed(
                &principal,
                &resources,
                &self.config.action,
                self.config.access_mode,
            )
            .await;

        candidates.iter().filter(|c| allow.contains(&c.id)).collect()
    }
}
