//! Request-facing facade over the retrieval pipeline.
//!
//! A [`SearchEngine`] owns at most one published [`Generation`] behind a
//! single `RwLock`ed pointer. Builds compute an entirely new generation
//! and publish it with one pointer swap, so an in-flight query can never
//! observe a half-built vocabulary paired with partial vectors. Queries
//! snapshot the current generation once and need no further locking,
//! since a published generation is immutable.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::index::{IndexError, IndexGeneration, TermWeight};
use crate::normalize::{normalize, Normalized};
use crate::ranker::{rank, RankError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no index has been built yet; index a corpus first")]
    NotIndexed,
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Rank(#[from] RankError),
}

/// A raw document as handed over by the loading collaborator. The
/// engine never mutates the text.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// A document with its normalization output, as stored in a generation.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedDocument {
    pub id: String,
    pub text: String,
    pub normalized_text: String,
    pub token_count: usize,
}

/// One immutable (documents, vocabulary, vectors) bundle produced by a
/// single build.
pub struct Generation {
    index: IndexGeneration,
    documents: Vec<IndexedDocument>,
}

impl Generation {
    pub fn index(&self) -> &IndexGeneration {
        &self.index
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn document(&self, index: usize) -> Result<&IndexedDocument, IndexError> {
        self.documents.get(index).ok_or(IndexError::OutOfRange {
            index,
            len: self.documents.len(),
        })
    }

    pub fn top_terms(&self, index: usize, limit: usize) -> Result<Vec<TermWeight>, IndexError> {
        self.index.top_terms(index, limit)
    }

    /// Run one query against this generation: normalize, project into
    /// the fixed vocabulary, rank every document, keep the best
    /// `top_k`. The query allocates its own transient vector and result
    /// list, so concurrent queries share nothing mutable.
    ///
    /// A query that normalizes to zero tokens is not an error: it
    /// projects to the zero vector and every document scores 0.0.
    pub fn search(&self, query: &str, top_k: usize) -> Result<SearchOutcome, RankError> {
        let normalized = normalize(query);
        let query_vector = self.index.project(&normalized.text);
        let ranked = rank(&query_vector, self.index.vectors())?;
        let total = ranked.len();
        let hits = ranked
            .into_iter()
            .take(top_k)
            .map(|r| SearchHit {
                doc_index: r.doc_index,
                document_id: self.documents[r.doc_index].id.clone(),
                rank: r.rank,
                score: r.score,
            })
            .collect();
        Ok(SearchOutcome {
            query: normalized,
            total,
            hits,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_index: usize,
    pub document_id: String,
    pub rank: usize,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: Normalized,
    /// Number of documents scored, before top-k truncation.
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

#[derive(Default)]
pub struct SearchEngine {
    current: RwLock<Option<Arc<Generation>>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and index a corpus, then publish the new generation
    /// atomically. On failure (e.g. an empty corpus) any previously
    /// published generation stays untouched.
    pub fn build_index(&self, documents: Vec<Document>) -> Result<usize, EngineError> {
        let processed: Vec<IndexedDocument> = documents
            .into_iter()
            .map(|doc| {
                let normalized = normalize(&doc.text);
                IndexedDocument {
                    id: doc.id,
                    text: doc.text,
                    normalized_text: normalized.text,
                    token_count: normalized.tokens.len(),
                }
            })
            .collect();
        let texts: Vec<&str> = processed.iter().map(|d| d.normalized_text.as_str()).collect();
        let index = IndexGeneration::build(&texts)?;

        let generation = Arc::new(Generation {
            index,
            documents: processed,
        });
        let count = generation.documents.len();
        let vocabulary = generation.index.vocabulary_size();
        *self.current.write() = Some(generation);
        tracing::info!(documents = count, vocabulary, "published new index generation");
        Ok(count)
    }

    /// The currently published generation, if any. Each query should
    /// take one snapshot and use it for its whole lifetime.
    pub fn snapshot(&self) -> Option<Arc<Generation>> {
        self.current.read().clone()
    }

    /// Query against the currently published generation. Convenience
    /// wrapper over one [`Generation::search`] snapshot.
    pub fn search(&self, query: &str, top_k: usize) -> Result<SearchOutcome, EngineError> {
        let generation = self.snapshot().ok_or(EngineError::NotIndexed)?;
        Ok(generation.search(query, top_k)?)
    }

    pub fn is_indexed(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.snapshot().map(|g| g.index.vocabulary_size()).unwrap_or(0)
    }

    pub fn document_count(&self) -> usize {
        self.snapshot().map(|g| g.documents.len()).unwrap_or(0)
    }
}
