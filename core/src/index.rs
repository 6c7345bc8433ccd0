//! Vector-space index over normalized token streams.
//!
//! One [`IndexGeneration`] bundles a vocabulary with the per-document
//! weight vectors computed from it. A generation is immutable once
//! built; rebuilding produces a whole new value that replaces the old
//! one, so a stale vocabulary can never be paired with vectors from a
//! different build.
//!
//! Weights are raw term frequency times smoothed idf, with no vector
//! length normalization. This deliberately reproduces the reference
//! behavior so that ranking stays a pure generalized-Jaccard overlap
//! measure (see `ranker`).

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::TermId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,
    #[error("document index {index} out of range for a corpus of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// A weighted term in a document, as surfaced by [`IndexGeneration::top_terms`].
#[derive(Debug, Clone, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f32,
}

#[derive(Debug)]
pub struct IndexGeneration {
    vocabulary: HashMap<String, TermId>,
    /// Terms by id, the reverse of `vocabulary`.
    terms: Vec<String>,
    idf: Vec<f32>,
    vectors: Vec<Vec<f32>>,
}

impl IndexGeneration {
    /// Build a generation from normalized document texts, in corpus
    /// order. Term ids are assigned in first-seen order, which keeps
    /// the vocabulary ordering deterministic as well as stable for the
    /// generation's lifetime.
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Result<Self, IndexError> {
        if corpus.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        let mut vocabulary: HashMap<String, TermId> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        let mut df: Vec<u32> = Vec::new();
        let mut tf: Vec<HashMap<TermId, u32>> = Vec::with_capacity(corpus.len());

        for text in corpus {
            let mut counts: HashMap<TermId, u32> = HashMap::new();
            for term in text.as_ref().split_whitespace() {
                let tid = match vocabulary.get(term) {
                    Some(&tid) => tid,
                    None => {
                        let tid = terms.len() as TermId;
                        vocabulary.insert(term.to_string(), tid);
                        terms.push(term.to_string());
                        df.push(0);
                        tid
                    }
                };
                let count = counts.entry(tid).or_insert(0);
                if *count == 0 {
                    df[tid as usize] += 1;
                }
                *count += 1;
            }
            tf.push(counts);
        }

        let n = corpus.len() as f32;
        // Smoothed idf: the +1 in the denominator avoids a zero weight
        // for terms present in every document.
        let idf: Vec<f32> = df
            .iter()
            .map(|&d| 1.0 + (n / (1.0 + d as f32)).ln())
            .collect();

        let dim = terms.len();
        let vectors: Vec<Vec<f32>> = tf
            .into_iter()
            .map(|counts| {
                let mut v = vec![0.0f32; dim];
                for (tid, count) in counts {
                    v[tid as usize] = count as f32 * idf[tid as usize];
                }
                v
            })
            .collect();

        tracing::debug!(documents = corpus.len(), terms = dim, "built index generation");
        Ok(Self {
            vocabulary,
            terms,
            idf,
            vectors,
        })
    }

    /// Project a normalized query into this generation's vector space.
    /// Out-of-vocabulary terms contribute zero weight and never fail.
    pub fn project(&self, normalized_query: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.terms.len()];
        for term in normalized_query.split_whitespace() {
            if let Some(&tid) = self.vocabulary.get(term) {
                v[tid as usize] += self.idf[tid as usize];
            }
        }
        v
    }

    pub fn vector_of(&self, index: usize) -> Result<&[f32], IndexError> {
        self.vectors
            .get(index)
            .map(Vec::as_slice)
            .ok_or(IndexError::OutOfRange {
                index,
                len: self.vectors.len(),
            })
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn num_docs(&self) -> usize {
        self.vectors.len()
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.vocabulary.get(term).copied()
    }

    /// The `limit` highest-weighted terms of one document, descending.
    pub fn top_terms(&self, index: usize, limit: usize) -> Result<Vec<TermWeight>, IndexError> {
        let vector = self.vector_of(index)?;
        let mut weighted: Vec<(TermId, f32)> = vector
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0.0)
            .map(|(tid, &w)| (tid as TermId, w))
            .collect();
        weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(weighted
            .into_iter()
            .take(limit)
            .map(|(tid, weight)| TermWeight {
                term: self.terms[tid as usize].clone(),
                weight,
            })
            .collect())
    }
}
