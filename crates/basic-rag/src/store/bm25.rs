//! BM25 keyword index
//!
//! Three scoring variants are supported, with `N` documents, `df` documents
//! containing a term, `tf` its frequency in a document of length `dl` and the
//! corpus mean length `avgdl`:
//!
//! - Okapi: `idf = ln(1 + (N - df + 0.5) / (df + 0.5))`
//! - BM25L: `idf = ln((N + 1) / (df + 0.5))`, with `delta` added to the
//!   length-normalized term frequency
//! - BM25+: `idf = ln((N + 1) / df)`, with `delta` added to every matching
//!   term
//!
//! Only terms that actually occur in a document contribute to its score, so a
//! document sharing no token with the query scores exactly zero.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Words of at least two word characters
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token pattern is valid"));

/// Divisor applied before the sigmoid when scaling scores
const SCALING_FACTOR: f32 = 8.0;

/// BM25 scoring variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bm25Algorithm {
    /// Classic Okapi BM25
    Okapi,
    /// BM25L, which reduces the penalty on long documents
    #[default]
    L,
    /// BM25+, which lower-bounds the contribution of a matching term
    Plus,
}

/// BM25 free parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f32,
    /// Length normalization
    pub b: f32,
    /// Lower bound for BM25L / BM25+
    pub delta: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            delta: 0.5,
        }
    }
}

/// Lowercase the text and split it into word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Map a raw score into (0, 1)
#[inline]
pub fn scale_score(score: f32) -> f32 {
    1.0 / (1.0 + (-score / SCALING_FACTOR).exp())
}

#[derive(Debug, Clone)]
struct DocStats {
    id: Uuid,
    length: u32,
    term_freqs: HashMap<String, u32>,
}

/// Term statistics for every indexed document
#[derive(Debug, Clone)]
pub struct Bm25Index {
    algorithm: Bm25Algorithm,
    params: Bm25Params,
    docs: Vec<DocStats>,
    doc_freqs: HashMap<String, usize>,
    total_tokens: u64,
}

impl Bm25Index {
    pub fn new(algorithm: Bm25Algorithm, params: Bm25Params) -> Self {
        Self {
            algorithm,
            params,
            docs: Vec::new(),
            doc_freqs: HashMap::new(),
            total_tokens: 0,
        }
    }

    pub fn algorithm(&self) -> Bm25Algorithm {
        self.algorithm
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Mean document length in tokens
    pub fn average_length(&self) -> f32 {
        if self.docs.is_empty() {
            0.0
        } else {
            self.total_tokens as f32 / self.docs.len() as f32
        }
    }

    /// Index a document's content
    pub fn add(&mut self, id: Uuid, content: &str) {
        let tokens = tokenize(content);
        let mut term_freqs: HashMap<String, u32> = HashMap::new();
        for token in tokens.iter() {
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
        }
        for term in term_freqs.keys() {
            *self.doc_freqs.entry(term.clone()).or_insert(0) += 1;
        }

        self.total_tokens += tokens.len() as u64;
        self.docs.push(DocStats {
            id,
            length: tokens.len() as u32,
            term_freqs,
        });
    }

    /// Inverse document frequency of a term present in `doc_frequency` documents
    fn idf(&self, doc_frequency: usize) -> f32 {
        let n = self.docs.len() as f32;
        let df = doc_frequency as f32;
        match self.algorithm {
            Bm25Algorithm::Okapi => (1.0 + ((n - df + 0.5) / (df + 0.5)).max(0.0)).ln(),
            Bm25Algorithm::L => ((n + 1.0) / (df + 0.5)).ln(),
            Bm25Algorithm::Plus => ((n + 1.0) / df.max(1.0)).ln(),
        }
    }

    /// Contribution of one matching term
    fn term_score(&self, idf: f32, tf: u32, length: u32, avgdl: f32) -> f32 {
        let Bm25Params { k1, b, delta } = self.params;
        let tf = tf as f32;
        let length_norm = if avgdl > 0.0 {
            1.0 - b + b * (length as f32 / avgdl)
        } else {
            1.0
        };

        match self.algorithm {
            Bm25Algorithm::Okapi => idf * tf * (k1 + 1.0) / (tf + k1 * length_norm),
            Bm25Algorithm::L => {
                let ctd = tf / length_norm;
                idf * (k1 + 1.0) * (ctd + delta) / (k1 + ctd + delta)
            }
            Bm25Algorithm::Plus => idf * (delta + tf * (k1 + 1.0) / (k1 * length_norm + tf)),
        }
    }

    /// Score every indexed document against the query, in insertion order
    pub fn score(&self, query: &str) -> Vec<(Uuid, f32)> {
        let query_tokens = tokenize(query);
        let avgdl = self.average_length();

        let idfs: Vec<Option<f32>> = query_tokens
            .iter()
            .map(|token| self.doc_freqs.get(token).map(|&df| self.idf(df)))
            .collect();

        self.docs
            .iter()
            .map(|doc| {
                let score = query_tokens
                    .iter()
                    .zip(idfs.iter())
                    .filter_map(|(token, idf)| {
                        let idf = (*idf)?;
                        let tf = *doc.term_freqs.get(token)?;
                        Some(self.term_score(idf, tf, doc.length, avgdl))
                    })
                    .sum::<f32>();
                (doc.id, score)
            })
            .collect()
    }
}
