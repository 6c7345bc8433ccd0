//! Generalized Jaccard scoring and ranking.
//!
//! `similarity` is sum(min) / sum(max) over two non-negative weight
//! vectors, operating on the raw tf-idf weights. There is intentionally
//! no cosine-style length normalization anywhere in the pipeline: the
//! metric is a pure weighted set-overlap measure, matching the reference
//! system (see DESIGN.md).

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("weight vectors differ in dimension ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// One scored document. Derived per query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub doc_index: usize,
    pub rank: usize,
    pub score: f32,
}

/// Generalized Jaccard similarity of two equal-dimension weight
/// vectors, in [0, 1]. Two all-zero vectors score 0.0 by definition.
///
/// A dimension mismatch means the query was projected against a
/// different vocabulary than the documents were built with. That is a
/// generation-management bug, not bad user input, so it is logged
/// loudly before the error is returned.
pub fn similarity(a: &[f32], b: &[f32]) -> Result<f32, RankError> {
    if a.len() != b.len() {
        tracing::error!(
            left = a.len(),
            right = b.len(),
            "weight vector dimensions diverged; query and documents come from different index generations"
        );
        return Err(RankError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let mut numerator = 0.0f32;
    let mut denominator = 0.0f32;
    for (&x, &y) in a.iter().zip(b) {
        numerator += x.min(y);
        denominator += x.max(y);
    }
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok(numerator / denominator)
}

/// Score every document against the query and return all of them,
/// highest similarity first, with 1-based ranks. Ties keep corpus
/// order (stable sort). Truncation to a top-k is the caller's job.
pub fn rank(query: &[f32], documents: &[Vec<f32>]) -> Result<Vec<RankedResult>, RankError> {
    let mut scored = Vec::with_capacity(documents.len());
    for (doc_index, doc) in documents.iter().enumerate() {
        scored.push((doc_index, similarity(query, doc)?));
    }
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(position, (doc_index, score))| RankedResult {
            doc_index,
            rank: position + 1,
            score,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric() {
        let a = vec![1.0, 0.5, 0.0];
        let b = vec![0.2, 0.7, 1.0];
        assert_eq!(similarity(&a, &b).unwrap(), similarity(&b, &a).unwrap());
    }

    #[test]
    fn identity_on_nonzero_vectors() {
        let v = vec![0.3, 1.2, 0.0, 4.5];
        assert!((similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_against_zero_is_zero_not_nan() {
        let z = vec![0.0; 4];
        assert_eq!(similarity(&z, &z).unwrap(), 0.0);
    }

    #[test]
    fn bounded_between_zero_and_one() {
        let pairs = [
            (vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]),
            (vec![0.0, 0.0, 5.0], vec![5.0, 0.0, 0.0]),
            (vec![0.1, 0.1, 0.1], vec![10.0, 10.0, 10.0]),
        ];
        for (a, b) in &pairs {
            let s = similarity(a, b).unwrap();
            assert!((0.0..=1.0).contains(&s), "out of range: {s}");
        }
    }

    #[test]
    fn disjoint_support_scores_zero() {
        let a = vec![1.0, 0.0, 2.0, 0.0];
        let b = vec![0.0, 3.0, 0.0, 4.0];
        assert_eq!(similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(
            similarity(&a, &b).unwrap_err(),
            RankError::DimensionMismatch { left: 2, right: 3 }
        );
    }

    #[test]
    fn rank_returns_every_document_with_permutation_ranks() {
        let query = vec![1.0, 1.0, 0.0];
        let docs = vec![
            vec![0.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ];
        let results = rank(&query, &docs).unwrap();
        assert_eq!(results.len(), docs.len());
        let mut ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);
        // scores non-increasing in rank order
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(results[0].doc_index, 1);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let query = vec![1.0, 0.0];
        let docs = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]];
        let results = rank(&query, &docs).unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.doc_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn all_zero_query_scores_everything_zero() {
        let query = vec![0.0, 0.0];
        let docs = vec![vec![1.0, 0.0], vec![0.0, 0.0]];
        let results = rank(&query, &docs).unwrap();
        assert!(results.iter().all(|r| r.score == 0.0));
        assert_eq!(results.len(), 2);
    }
}
