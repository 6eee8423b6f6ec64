//! TF-IDF feature extraction over normalised question text.

use std::collections::{BTreeMap, HashMap, HashSet};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Vectoriser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub min_ngram: usize,
    pub max_ngram: usize,
    pub max_features: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            min_ngram: 1,
            max_ngram: 2,
            max_features: 1000,
        }
    }
}

/// Fitted bag-of-n-grams TF-IDF vectoriser.
///
/// Rows are L2-normalised raw term counts weighted by the smoothed inverse
/// document frequency `ln((1 + n) / (1 + df)) + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from a set of documents.
    pub fn fit(documents: &[String], config: VectorizerConfig) -> Self {
        let mut term_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let terms = ngrams(doc, &config);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms; ties resolve alphabetically so the
        // fitted vocabulary does not depend on hash order.
        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(config.max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n_docs = documents.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect::<BTreeMap<_, _>>();
        debug!(features = vocabulary.len(), docs = documents.len(), "fitted tf-idf vocabulary");

        Self {
            config,
            vocabulary,
            idf,
        }
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Every vocabulary index addresses an idf weight.
    pub fn is_consistent(&self) -> bool {
        self.idf.len() == self.vocabulary.len()
            && self.vocabulary.values().all(|&idx| idx < self.idf.len())
    }

    /// Vectorise one document. Returns `None` when no known term occurs.
    pub fn transform(&self, document: &str) -> Option<Array1<f64>> {
        let mut row = Array1::<f64>::zeros(self.n_features());
        for term in ngrams(document, &self.config) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                row[idx] += 1.0;
            }
        }
        row.zip_mut_with(&Array1::from(self.idf.clone()), |v, idf| *v *= idf);
        let norm = row.dot(&row).sqrt();
        if norm == 0.0 {
            return None;
        }
        row.mapv_inplace(|v| v / norm);
        Some(row)
    }

    /// Vectorise a batch; documents without known terms become zero rows.
    pub fn transform_batch(&self, documents: &[String]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.n_features()));
        for (mut out, doc) in matrix.rows_mut().into_iter().zip(documents) {
            if let Some(row) = self.transform(doc) {
                out.assign(&row);
            }
        }
        matrix
    }
}

/// Word n-grams over tokens of at least two characters.
fn ngrams(document: &str, config: &VectorizerConfig) -> Vec<String> {
    let tokens: Vec<&str> = document
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2)
        .collect();
    let mut out = Vec::new();
    for n in config.min_ngram..=config.max_ngram {
        if n == 0 || n > tokens.len() {
            continue;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn vocabulary_contains_unigrams_and_bigrams() {
        let vec = TfidfVectorizer::fit(
            &docs(&["show employee", "count employee"]),
            VectorizerConfig::default(),
        );
        let terms: Vec<&str> = vec.vocabulary().keys().map(String::as_str).collect();
        assert_eq!(
            terms,
            vec!["count", "count employee", "employee", "show", "show employee"]
        );
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let vec = TfidfVectorizer::fit(&docs(&["a b employee"]), VectorizerConfig::default());
        assert_eq!(vec.n_features(), 1);
    }

    #[test]
    fn rows_are_unit_length_and_rare_terms_weigh_more() {
        let vec = TfidfVectorizer::fit(
            &docs(&["show employee", "count employee", "list employee"]),
            VectorizerConfig {
                max_ngram: 1,
                ..Default::default()
            },
        );
        let row = vec.transform("show employee").unwrap();
        assert!((row.dot(&row) - 1.0).abs() < 1e-9);
        let show = row[vec.vocabulary()["show"]];
        let employee = row[vec.vocabulary()["employee"]];
        assert!(show > employee);
    }

    #[test]
    fn unseen_text_has_no_features() {
        let vec = TfidfVectorizer::fit(&docs(&["show employee"]), VectorizerConfig::default());
        assert!(vec.transform("").is_none());
        assert!(vec.transform("weather tomorrow").is_none());
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let vec = TfidfVectorizer::fit(
            &docs(&["employee salary", "employee project", "employee"]),
            VectorizerConfig {
                min_ngram: 1,
                max_ngram: 1,
                max_features: 2,
            },
        );
        let terms: Vec<&str> = vec.vocabulary().keys().map(String::as_str).collect();
        assert_eq!(terms, vec!["employee", "project"]);
    }
}
