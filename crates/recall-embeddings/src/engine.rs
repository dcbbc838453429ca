//! EmbeddingPipeline: the main entry point for recall-embeddings.
//!
//! Normalizes input, serves what it can from the cache, deduplicates the
//! rest, plans batches, and hands them to the coordinator one at a time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use recall_core::config::EmbeddingConfig;
use recall_core::errors::{EmbeddingError, RecallResult, ValidationError};
use recall_core::models::RetrievalMode;
use recall_core::text;
use recall_core::traits::IEmbeddingModel;
use recall_observability::embedding_span;
use tracing::{debug, info, Instrument};

use crate::batching::{plan_batches, BatchItem};
use crate::cache::EmbeddingCache;
use crate::coordinator::{BatchCoordinator, BatchPosition};
use crate::executor::{CancellationFlag, IEmbeddingExecutor, InProcessExecutor};
use crate::stats::{EmbeddingStats, StatsCounters};

/// Per-call embedding options.
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    pub mode: RetrievalMode,
    pub cancel: Option<CancellationFlag>,
}

impl EmbedOptions {
    pub fn query() -> Self {
        Self {
            mode: RetrievalMode::Query,
            cancel: None,
        }
    }

    pub fn passage() -> Self {
        Self {
            mode: RetrievalMode::Passage,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Cached, deduplicating, batching front end to an embedding executor.
///
/// Owns its cache; two pipelines never share entries.
pub struct EmbeddingPipeline {
    config: EmbeddingConfig,
    cache: Mutex<EmbeddingCache>,
    coordinator: BatchCoordinator,
    stats: Arc<StatsCounters>,
}

impl EmbeddingPipeline {
    /// Create a pipeline over an arbitrary executor.
    ///
    /// Fails if the executor's output dimension disagrees with the config.
    pub fn new(config: EmbeddingConfig, executor: Box<dyn IEmbeddingExecutor>) -> RecallResult<Self> {
        if executor.dimensions() != config.dimensions {
            return Err(ValidationError::DimensionMismatch {
                expected: config.dimensions,
                actual: executor.dimensions(),
            }
            .into());
        }

        let stats = Arc::new(StatsCounters::default());
        let coordinator = BatchCoordinator::new(executor, &config, Arc::clone(&stats));

        info!(
            executor = coordinator.executor_name(),
            dims = config.dimensions,
            batching = ?config.batching,
            cache_capacity = config.cache_capacity,
            "EmbeddingPipeline initialized"
        );

        Ok(Self {
            cache: Mutex::new(EmbeddingCache::new(config.cache_capacity)),
            config,
            coordinator,
            stats,
        })
    }

    /// Create a pipeline that runs `model` inline.
    pub fn in_process(config: EmbeddingConfig, model: Arc<dyn IEmbeddingModel>) -> RecallResult<Self> {
        Self::new(config, Box::new(InProcessExecutor::new(model)))
    }

    /// Embed `texts`, returning one vector per input in input order.
    ///
    /// Blank texts become zero vectors. Texts sharing a cache key are sent
    /// to the executor once. Vectors from batches that completed before a
    /// failure stay cached.
    pub async fn embed(&self, texts: &[String], options: &EmbedOptions) -> RecallResult<Vec<Vec<f32>>> {
        let span = embedding_span!(self.coordinator.executor_name(), texts.len());
        self.embed_inner(texts, options).instrument(span).await
    }

    async fn embed_inner(&self, texts: &[String], options: &EmbedOptions) -> RecallResult<Vec<Vec<f32>>> {
        let dims = self.config.dimensions;
        let mut output: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut pending: Vec<BatchItem> = Vec::new();
        // cache key -> positions beyond the first that share it
        let mut duplicates: HashMap<String, Vec<usize>> = HashMap::new();

        {
            let cache = self.lock_cache();
            let (mut hits, mut misses) = (0u64, 0u64);
            for (index, raw) in texts.iter().enumerate() {
                if text::is_blank(raw) {
                    output[index] = Some(vec![0.0; dims]);
                    continue;
                }
                let normalized = text::normalize(raw);
                let key = text::cache_key(options.mode, &normalized);

                if let Some(vector) = cache.get(&key) {
                    hits += 1;
                    output[index] = Some(vector);
                    continue;
                }
                if let Some(extra) = duplicates.get_mut(&key) {
                    extra.push(index);
                    continue;
                }

                misses += 1;
                duplicates.insert(key.clone(), Vec::new());
                pending.push(BatchItem {
                    index,
                    prepared: self.prepare(options.mode, &normalized),
                    normalized,
                    cache_key: key,
                    estimated_tokens: None,
                });
            }
            StatsCounters::bump(&self.stats.cache_hits, hits);
            StatsCounters::bump(&self.stats.cache_misses, misses);
            debug!(hits, misses, "cache lookup complete");
        }

        let batches = plan_batches(pending, &self.config);
        let total = batches.len();
        let cancel = options.cancel.clone().unwrap_or_default();

        for (batch_index, batch) in batches.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(completed = batch_index, total, "embedding cancelled");
                return Err(EmbeddingError::Cancelled {
                    completed_batches: batch_index,
                    total_batches: total,
                }
                .into());
            }

            let prepared: Vec<String> = batch.iter().map(|item| item.prepared.clone()).collect();
            let position = BatchPosition {
                index: batch_index,
                total,
            };
            let vectors = self
                .coordinator
                .run_batch(&prepared, position, &cancel)
                .await?;

            let mut cache = self.lock_cache();
            for (item, vector) in batch.into_iter().zip(vectors) {
                if let Some(extra) = duplicates.get(&item.cache_key) {
                    for &dup in extra {
                        output[dup] = Some(vector.clone());
                    }
                }
                output[item.index] = Some(vector.clone());
                cache.insert(item.cache_key, vector);
            }
        }

        Ok(output
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| vec![0.0; dims]))
            .collect())
    }

    /// Drop every cached vector.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        debug!("embedding cache cleared");
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn stats(&self) -> EmbeddingStats {
        self.stats.snapshot()
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    fn prepare(&self, mode: RetrievalMode, normalized: &str) -> String {
        let prefix = match mode {
            RetrievalMode::Query => self.config.query_prefix.as_str(),
            RetrievalMode::Passage => self.config.passage_prefix.as_str(),
            RetrievalMode::Raw => "",
        };
        format!("{prefix}{normalized}")
    }

    fn lock_cache(&self) -> MutexGuard<'_, EmbeddingCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
