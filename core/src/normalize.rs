use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::stem::stem;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N}\s]").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = include_str!("../data/stopwords.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
}

/// Output of the full normalization pipeline: the space-joined stemmed
/// text plus the same sequence as individual tokens.
#[derive(Debug, Clone, Serialize)]
pub struct Normalized {
    pub text: String,
    pub tokens: Vec<String>,
}

/// Per-stage pipeline output, keyed the way the HTTP API exposes it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStages {
    pub original: String,
    pub case_folding: String,
    pub tokenizing: String,
    pub filtering: String,
    pub stopword_removal: String,
    pub stemming: String,
}

fn case_fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Replace every character that is not a letter, digit, or whitespace
/// with a space, then split on whitespace runs.
fn tokenize(text: &str) -> Vec<String> {
    NON_WORD
        .replace_all(text, " ")
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Drop purely numeric tokens and tokens shorter than 2 characters.
fn filter_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| t.chars().count() > 1 && !t.chars().all(|c| c.is_numeric()))
        .collect()
}

fn remove_stopwords(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !STOPWORDS.contains(t.as_str()))
        .collect()
}

fn stem_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens.iter().map(|t| stem(t)).collect()
}

/// Run the full pipeline: case folding, tokenizing, filtering, stopword
/// removal, stemming. Never fails; ill-formed input degrades to an
/// empty token stream.
pub fn normalize(text: &str) -> Normalized {
    let folded = case_fold(text);
    let tokens = remove_stopwords(filter_tokens(tokenize(&folded)));
    let tokens = stem_tokens(tokens);
    Normalized {
        text: tokens.join(" "),
        tokens,
    }
}

/// Diagnostic variant of [`normalize`] that records the joined output of
/// every stage without changing pipeline semantics.
pub fn normalize_stages(text: &str) -> PipelineStages {
    let folded = case_fold(text);
    let tokenized = tokenize(&folded);
    let filtered = filter_tokens(tokenized.clone());
    let without_stopwords = remove_stopwords(filtered.clone());
    let stemmed = stem_tokens(without_stopwords.clone());
    PipelineStages {
        original: text.to_string(),
        case_folding: folded,
        tokenizing: tokenized.join(" "),
        filtering: filtered.join(" "),
        stopword_removal: without_stopwords.join(" "),
        stemming: stemmed.join(" "),
    }
}
