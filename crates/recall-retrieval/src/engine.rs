//! HybridRetriever: the main entry point for recall-retrieval.
//!
//! Owns one embedding pipeline and the current [`CorpusSnapshot`] behind a
//! single `RwLock<Arc<_>>`. Indexing builds a complete snapshot off-lock and
//! swaps it in; a query clones the `Arc` once and reads only that snapshot.

use std::sync::{Arc, RwLock};

use recall_core::config::RecallConfig;
use recall_core::errors::{RecallResult, ValidationError};
use recall_core::models::{Document, FusedResult, Metadata, ParentGroup, SearchHit};
use recall_core::text::is_blank;
use recall_core::traits::IParentLookup;
use recall_embeddings::{CancellationFlag, EmbedOptions, EmbeddingPipeline, IEmbeddingExecutor};
use recall_observability::tracing_setup::events;
use recall_observability::{index_span, retrieval_span};
use recall_vector::SearchOptions;
use serde::Serialize;
use tracing::{debug, info, Instrument};

use crate::context::{AssembledContext, ContextAssembler, ContextOptions};
use crate::corpus::CorpusSnapshot;
use crate::fusion::{fuse, FusionOptions};
use crate::grouping::group_by_parent;

/// Per-query overrides of [`RetrievalConfig`](recall_core::config::RetrievalConfig).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub top_k: Option<usize>,
    pub vector_weight: Option<f64>,
    pub token_budget: Option<usize>,
    pub group_by_parent: Option<bool>,
    pub cancel: Option<CancellationFlag>,
}

impl QueryOptions {
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn vector_weight(mut self, vector_weight: f64) -> Self {
        self.vector_weight = Some(vector_weight);
        self
    }

    pub fn token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = Some(token_budget);
        self
    }

    pub fn grouped(mut self, group_by_parent: bool) -> Self {
        self.group_by_parent = Some(group_by_parent);
        self
    }
}

/// What an `index` call built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub documents: usize,
    pub vocabulary_size: usize,
    pub dimension: usize,
}

/// Everything a query produced. `groups` is empty unless grouping was on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetrievalOutcome {
    pub results: Vec<FusedResult>,
    pub groups: Vec<ParentGroup>,
    pub context: AssembledContext,
}

pub struct HybridRetriever {
    config: RecallConfig,
    embeddings: EmbeddingPipeline,
    corpus: RwLock<Arc<CorpusSnapshot>>,
    parents: Option<Arc<dyn IParentLookup>>,
}

impl HybridRetriever {
    /// Validates `config` and wires the stages together.
    pub fn new(config: RecallConfig, executor: Box<dyn IEmbeddingExecutor>) -> RecallResult<Self> {
        config.validate()?;
        let embeddings = EmbeddingPipeline::new(config.embedding.clone(), executor)?;
        let corpus = CorpusSnapshot::empty(config.vector.dimension);

        info!(
            dimensions = config.embedding.dimensions,
            vector_weight = config.retrieval.vector_weight,
            rrf_k = config.retrieval.rrf_k,
            group_by_parent = config.retrieval.group_by_parent,
            "hybrid retriever initialized"
        );

        Ok(Self {
            config,
            embeddings,
            corpus: RwLock::new(Arc::new(corpus)),
            parents: None,
        })
    }

    /// Resolve parent documents through `lookup` when grouping.
    pub fn with_parent_lookup(mut self, lookup: Arc<dyn IParentLookup>) -> Self {
        self.parents = Some(lookup);
        self
    }

    /// Current corpus. Stays valid even if a reindex swaps in a new one.
    pub fn corpus(&self) -> Arc<CorpusSnapshot> {
        let guard = self.corpus.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    fn swap(&self, next: CorpusSnapshot) {
        let documents = next.len();
        let next = Arc::new(next);
        *self.corpus.write().unwrap_or_else(|e| e.into_inner()) = next;
        events::snapshot_swapped("corpus", documents);
    }

    /// Embed and index `documents`, replacing the previous corpus.
    ///
    /// Any failure leaves the previous corpus searchable.
    pub async fn index(&self, documents: &[Document]) -> RecallResult<IndexReport> {
        self.index_inner(documents)
            .instrument(index_span!(documents.len()))
            .await
    }

    async fn index_inner(&self, documents: &[Document]) -> RecallResult<IndexReport> {
        if documents.is_empty() {
            return Err(ValidationError::EmptyCorpus.into());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = self.embeddings.embed(&texts, &EmbedOptions::passage()).await?;
        let next = CorpusSnapshot::build(self.config.vector.dimension, documents, &vectors)?;

        let report = IndexReport {
            documents: documents.len(),
            vocabulary_size: next.bm25().vocabulary_size(),
            dimension: next.vectors().dimension(),
        };
        self.swap(next);
        info!(
            documents = report.documents,
            vocabulary = report.vocabulary_size,
            dimension = report.dimension,
            "corpus indexed"
        );
        Ok(report)
    }

    /// Run a hybrid query: embed, search both indexes, fuse, optionally
    /// group by parent, and pack the context.
    pub async fn query(&self, text: &str, options: &QueryOptions) -> RecallResult<RetrievalOutcome> {
        let weight = options
            .vector_weight
            .unwrap_or(self.config.retrieval.vector_weight);
        self.query_inner(text, options, weight)
            .instrument(retrieval_span!(text, weight))
            .await
    }

    async fn query_inner(
        &self,
        text: &str,
        options: &QueryOptions,
        vector_weight: f64,
    ) -> RecallResult<RetrievalOutcome> {
        let retrieval = &self.config.retrieval;
        let top_k = options.top_k.unwrap_or(retrieval.top_k);
        let grouped = options.group_by_parent.unwrap_or(retrieval.group_by_parent);
        let mut context_options = ContextOptions::from(retrieval);
        if let Some(budget) = options.token_budget {
            context_options.token_budget = budget;
        }
        let assembler = ContextAssembler::new(context_options);

        let corpus = self.corpus();
        if is_blank(text) || corpus.is_empty() {
            debug!("nothing to search");
            return Ok(RetrievalOutcome {
                context: assembler.assemble(&[]),
                ..Default::default()
            });
        }

        let pool = retrieval.retrieval_k.max(top_k);

        let mut embed_options = EmbedOptions::query();
        if let Some(cancel) = &options.cancel {
            embed_options = embed_options.with_cancel(cancel.clone());
        }
        let query_vectors = self
            .embeddings
            .embed(&[text.to_string()], &embed_options)
            .await?;
        let query_vector = query_vectors.into_iter().next().unwrap_or_default();

        let search_options = SearchOptions::with_metadata().min_score(retrieval.similarity_threshold);
        let vector_hits: Vec<SearchHit> = corpus
            .search_vectors(&query_vector, pool, &search_options)?
            .into_iter()
            .map(|m| hit(&corpus, m.id, m.score, m.rank, m.metadata))
            .collect();

        let bm25_hits: Vec<SearchHit> = if vector_weight >= 1.0 {
            Vec::new()
        } else {
            corpus
                .search_bm25(text, pool, self.config.bm25)
                .into_iter()
                .map(|m| hit(&corpus, m.id, m.score, m.rank, None))
                .collect()
        };
        debug!(
            vector_hits = vector_hits.len(),
            bm25_hits = bm25_hits.len(),
            "candidates retrieved"
        );

        let fusion = FusionOptions {
            k: retrieval.rrf_k,
            vector_weight,
            top_k: if grouped { pool } else { top_k },
        };
        let mut results = fuse(&vector_hits, &bm25_hits, fusion);
        // Pass-through fusion keeps the whole candidate pool.
        if !grouped && top_k > 0 {
            results.truncate(top_k);
        }

        let (groups, context) = if grouped {
            let groups = group_by_parent(
                &results,
                top_k,
                retrieval.max_chunks_per_parent,
                self.parents.as_deref(),
            );
            let context = assembler.assemble_groups(&groups);
            (groups, context)
        } else {
            let context = assembler.assemble(&results);
            (Vec::new(), context)
        };

        events::retrieval_completed(
            if grouped { groups.len() } else { results.len() },
            context.estimated_tokens,
            context.limited,
        );
        Ok(RetrievalOutcome {
            results,
            groups,
            context,
        })
    }

    /// Look up an indexed document by id.
    pub fn get_document(&self, id: &str) -> Option<Document> {
        self.corpus().get_document(id).cloned()
    }

    /// Drop the corpus and the embedding cache.
    pub fn clear(&self) {
        self.swap(CorpusSnapshot::empty(self.config.vector.dimension));
        self.embeddings.clear_cache();
    }

    pub fn len(&self) -> usize {
        self.corpus().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    pub fn embeddings(&self) -> &EmbeddingPipeline {
        &self.embeddings
    }
}

/// Attach text (and metadata, when the retriever did not) from the same
/// corpus the hit came from.
fn hit(corpus: &CorpusSnapshot, id: String, score: f32, rank: usize, metadata: Option<Metadata>) -> SearchHit {
    let document = corpus.get_document(&id);
    let text = document.map(|d| d.text.clone()).unwrap_or_default();
    let metadata = metadata
        .or_else(|| document.map(|d| d.metadata.clone()))
        .unwrap_or_default();
    SearchHit {
        id,
        score,
        rank,
        text,
        metadata,
    }
}
