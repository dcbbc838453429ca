//! HybridRetriever end to end over the hashing embedder.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use recall_core::config::RecallConfig;
use recall_core::errors::{RecallError, ValidationError};
use recall_core::models::{Document, ParentDocument};
use recall_core::traits::{IEmbeddingModel, IParentLookup};
use recall_embeddings::{HashingEmbedder, InProcessExecutor};
use recall_retrieval::{CachedParentLookup, HybridRetriever, QueryOptions};

const DIMS: usize = 32;

fn config() -> RecallConfig {
    let mut config = RecallConfig::default();
    config.embedding.dimensions = DIMS;
    config.vector.dimension = DIMS;
    config
}

fn retriever_with(config: RecallConfig) -> HybridRetriever {
    let model: Arc<dyn IEmbeddingModel> = Arc::new(HashingEmbedder::new(DIMS));
    HybridRetriever::new(config, Box::new(InProcessExecutor::new(model))).unwrap()
}

fn retriever() -> HybridRetriever {
    retriever_with(config())
}

fn pets() -> Vec<Document> {
    vec![
        Document::new("d1", "the cat sat on the mat"),
        Document::new("d2", "the dog ran in the park"),
        Document::new("d3", "a cat and a dog became friends"),
    ]
}

fn chunked() -> Vec<Document> {
    vec![
        Document::new("p1#0", "alpha introduction to the topic")
            .with_meta("parent_id", "p1")
            .with_meta("chunk_index", 0),
        Document::new("p1#1", "alpha details follow here")
            .with_meta("parent_id", "p1")
            .with_meta("chunk_index", 1),
        Document::new("p2#0", "alpha shows up in another document")
            .with_meta("parent_id", "p2")
            .with_meta("chunk_index", 0),
        Document::new("p3#0", "unrelated words only")
            .with_meta("parent_id", "p3")
            .with_meta("chunk_index", 0),
    ]
}

fn ids(outcome: &recall_retrieval::RetrievalOutcome) -> Vec<&str> {
    outcome.results.iter().map(|r| r.id.as_str()).collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Construction and indexing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn model_dimension_must_match_config() {
    let model: Arc<dyn IEmbeddingModel> = Arc::new(HashingEmbedder::new(DIMS / 2));
    let err = HybridRetriever::new(config(), Box::new(InProcessExecutor::new(model)))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RecallError::Validation(ValidationError::DimensionMismatch { .. })
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = config();
    config.vector.dimension = DIMS + 1;
    let model: Arc<dyn IEmbeddingModel> = Arc::new(HashingEmbedder::new(DIMS));
    let err = HybridRetriever::new(config, Box::new(InProcessExecutor::new(model)))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RecallError::Validation(ValidationError::InvalidConfig { .. })
    ));
}

#[tokio::test]
async fn indexing_an_empty_corpus_fails() {
    let err = retriever().index(&[]).await.unwrap_err();
    assert!(matches!(err, RecallError::Validation(ValidationError::EmptyCorpus)));
}

#[tokio::test]
async fn index_reports_what_was_built() {
    let retriever = retriever();
    let report = retriever.index(&pets()).await.unwrap();
    assert_eq!(report.documents, 3);
    assert_eq!(report.dimension, DIMS);
    assert!(report.vocabulary_size > 0);
    assert_eq!(retriever.len(), 3);
    let corpus = retriever.corpus();
    assert_eq!(corpus.vectors().len(), 3);
    assert_eq!(corpus.bm25().doc_count(), 3);
    assert_eq!(retriever.embeddings().cache_len(), 3);
}

#[tokio::test]
async fn reindexing_replaces_the_corpus() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    retriever
        .index(&[Document::new("n1", "fresh content")])
        .await
        .unwrap();
    assert!(retriever.get_document("d1").is_none());
    assert_eq!(retriever.get_document("n1").unwrap().text, "fresh content");
    assert_eq!(retriever.len(), 1);
}

#[tokio::test]
async fn clear_empties_everything() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    retriever.clear();
    assert!(retriever.is_empty());
    let corpus = retriever.corpus();
    assert!(corpus.vectors().is_empty());
    assert!(corpus.bm25().is_empty());
    assert_eq!(retriever.embeddings().cache_len(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn query_before_indexing_is_empty() {
    let outcome = retriever()
        .query("cat", &QueryOptions::default())
        .await
        .unwrap();
    assert!(outcome.results.is_empty());
    assert!(outcome.context.text.is_empty());
    assert!(!outcome.context.limited);
}

#[tokio::test]
async fn blank_query_is_empty() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    let outcome = retriever.query("   ", &QueryOptions::default()).await.unwrap();
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn control_character_query_is_blank() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    let before = retriever.embeddings().stats();
    let outcome = retriever
        .query("\u{0}\u{7}", &QueryOptions::default())
        .await
        .unwrap();
    assert!(outcome.results.is_empty());
    assert!(outcome.context.text.is_empty());
    assert_eq!(retriever.embeddings().stats(), before);
}

#[tokio::test]
async fn lexical_only_query_returns_bm25_order() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    let outcome = retriever
        .query("cat", &QueryOptions::default().vector_weight(0.0))
        .await
        .unwrap();

    let mut found = ids(&outcome);
    found.sort_unstable();
    assert_eq!(found, vec!["d1", "d3"]);
    assert!(outcome.results.iter().all(|r| r.vector_rank.is_none()));
    assert!(outcome.results.iter().all(|r| r.bm25_rank.is_some()));
    assert!(outcome.results.iter().all(|r| r.text.contains("cat")));
}

#[tokio::test]
async fn vector_only_query_skips_bm25() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    let outcome = retriever
        .query("cat", &QueryOptions::default().vector_weight(1.0).top_k(10))
        .await
        .unwrap();

    assert!(!outcome.results.is_empty());
    assert!(outcome.results.iter().all(|r| r.bm25_rank.is_none()));
    assert!(outcome.results.iter().all(|r| r.vector_rank.is_some()));
}

#[tokio::test]
async fn hybrid_query_attaches_text_and_metadata() {
    let retriever = retriever();
    let docs = vec![
        Document::new("d1", "the cat sat on the mat").with_meta("source", "notes"),
        Document::new("d2", "the dog ran in the park").with_meta("source", "diary"),
    ];
    retriever.index(&docs).await.unwrap();
    let outcome = retriever
        .query("cat", &QueryOptions::default())
        .await
        .unwrap();

    let top = &outcome.results[0];
    assert_eq!(top.id, "d1");
    assert_eq!(top.source(), "hybrid");
    assert_eq!(top.text, "the cat sat on the mat");
    assert_eq!(top.metadata.get("source").and_then(|v| v.as_str()), Some("notes"));
    assert!(outcome.context.text.starts_with("[1] d1\n"));
}

#[tokio::test]
async fn top_k_limits_results() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    for weight in [0.0, 0.5, 1.0] {
        let outcome = retriever
            .query("cat dog", &QueryOptions::default().top_k(1).vector_weight(weight))
            .await
            .unwrap();
        assert_eq!(outcome.results.len(), 1, "weight {weight}");
    }
}

#[tokio::test]
async fn tiny_budget_limits_the_context() {
    let retriever = retriever();
    retriever.index(&pets()).await.unwrap();
    let outcome = retriever
        .query("cat", &QueryOptions::default().token_budget(3))
        .await
        .unwrap();
    assert!(!outcome.results.is_empty());
    assert!(outcome.context.limited);
    assert!(outcome.context.text.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Grouping
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn grouped_query_collapses_chunks_under_parents() {
    let retriever = retriever();
    retriever.index(&chunked()).await.unwrap();
    let outcome = retriever
        .query("alpha", &QueryOptions::default().vector_weight(0.0).grouped(true))
        .await
        .unwrap();

    let parents: Vec<&str> = outcome.groups.iter().map(|g| g.parent_id.as_str()).collect();
    assert_eq!(parents.len(), 2);
    assert!(parents.contains(&"p1"));
    assert!(parents.contains(&"p2"));

    let p1 = outcome.groups.iter().find(|g| g.parent_id == "p1").unwrap();
    let chunk_ids: Vec<&str> = p1.chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(chunk_ids, vec!["p1#0", "p1#1"]);
    assert!(!p1.resolved);
    assert_eq!(p1.text, "alpha introduction to the topic\n\nalpha details follow here");

    assert!(outcome.context.sources.contains(&"p1".to_string()));
    assert!(!outcome.context.limited);
}

#[tokio::test]
async fn grouped_query_resolves_parents_through_lookup() {
    let mut parents = HashMap::new();
    parents.insert(
        "p1".to_string(),
        ParentDocument {
            id: "p1".into(),
            text: "the full first document".into(),
            metadata: Default::default(),
        },
    );
    let lookup: Arc<dyn IParentLookup> = Arc::new(CachedParentLookup::new(parents, 16));

    let retriever = retriever().with_parent_lookup(lookup);
    retriever.index(&chunked()).await.unwrap();
    let outcome = retriever
        .query("alpha", &QueryOptions::default().vector_weight(0.0).grouped(true))
        .await
        .unwrap();

    let p1 = outcome.groups.iter().find(|g| g.parent_id == "p1").unwrap();
    assert!(p1.resolved);
    assert_eq!(p1.text, "the full first document");

    let p2 = outcome.groups.iter().find(|g| g.parent_id == "p2").unwrap();
    assert!(!p2.resolved);
}

#[tokio::test]
async fn grouping_can_be_enabled_by_config() {
    let mut config = config();
    config.retrieval.group_by_parent = true;
    config.retrieval.top_k = 1;
    let retriever = retriever_with(config);
    retriever.index(&chunked()).await.unwrap();
    let outcome = retriever
        .query("alpha", &QueryOptions::default().vector_weight(0.0))
        .await
        .unwrap();
    assert_eq!(outcome.groups.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Concurrent reindexing
// ═══════════════════════════════════════════════════════════════════════

fn generation(prefix: &str, n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| Document::new(format!("{prefix}{i}"), format!("shared term {prefix} entry {i}")))
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn queries_never_mix_corpus_generations_during_reindex() {
    let retriever = retriever();
    let first = generation("a", 2_000);
    let second = generation("b", 2_000);
    runtime().block_on(retriever.index(&first)).unwrap();

    let done = AtomicBool::new(false);
    let (queries, mixed) = std::thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let rt = runtime();
            let (mut queries, mut mixed) = (0usize, 0usize);
            while !done.load(Ordering::Acquire) || queries == 0 {
                let outcome = rt
                    .block_on(retriever.query("shared term", &QueryOptions::default().top_k(10)))
                    .unwrap();
                let generations: HashSet<char> = outcome
                    .results
                    .iter()
                    .filter_map(|r| r.id.chars().next())
                    .collect();
                if generations.len() > 1 || outcome.results.iter().any(|r| r.text.is_empty()) {
                    mixed += 1;
                }
                queries += 1;
            }
            (queries, mixed)
        });

        let rt = runtime();
        for round in 0..6 {
            let documents = if round % 2 == 0 { &second } else { &first };
            rt.block_on(retriever.index(documents)).unwrap();
        }
        done.store(true, Ordering::Release);
        reader.join().unwrap()
    });

    assert!(queries > 0);
    assert_eq!(mixed, 0, "{mixed} of {queries} queries mixed generations");
    assert_eq!(retriever.len(), 2_000);
}
