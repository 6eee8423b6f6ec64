//! Text normalisation shared by classifier training and inference.

use std::{collections::HashSet, path::Path};

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::{config::Settings, nlp::entities::DEPARTMENTS};

/// Standard English stopword list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn",
    "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn", "shan",
    "shouldn", "wasn", "weren", "won", "wouldn",
];

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("data", "datum"),
];

/// Suffix rules applied in order; the first match wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("s", ""),
];

/// Endings that look plural but are not.
const KEEP_ENDINGS: &[&str] = &["ss", "us", "is"];

static BUILTIN_STOPWORDS: Lazy<HashSet<String>> =
    Lazy::new(|| stopword_set(ENGLISH_STOPWORDS.iter().copied()));

/// Dictionary-free noun lemmatiser: irregular forms, then plural suffix rules.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer;

impl Lemmatizer {
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some((_, base)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
            return (*base).to_string();
        }
        if word.len() <= 3 || KEEP_ENDINGS.iter().any(|end| word.ends_with(end)) {
            return word.to_string();
        }
        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() >= 2 {
                    return format!("{stem}{replacement}");
                }
            }
        }
        word.to_string()
    }
}

#[derive(Debug, Clone)]
struct Resources {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

/// Lowercases, strips punctuation, drops stopwords and lemmatises tokens.
///
/// Without linguistic resources the normaliser still lowercases and strips
/// punctuation but leaves the token stream untouched.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    resources: Option<Resources>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Normaliser backed by the built-in stopword list.
    pub fn new() -> Self {
        Self::with_stopwords(BUILTIN_STOPWORDS.clone())
    }

    /// Normaliser that only lowercases and strips punctuation.
    pub fn degraded() -> Self {
        Self { resources: None }
    }

    fn with_stopwords(stopwords: HashSet<String>) -> Self {
        Self {
            resources: Some(Resources {
                stopwords,
                lemmatizer: Lemmatizer,
            }),
        }
    }

    /// Build from configuration, falling back to degraded mode when a
    /// configured stopword file cannot be read.
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.stopwords_path {
            None => Self::new(),
            Some(path) => match load_stopwords(path) {
                Ok(words) => {
                    debug!(path = %path.display(), count = words.len(), "loaded stopwords");
                    Self::with_stopwords(words)
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "stopwords unavailable; normalising without them");
                    Self::degraded()
                }
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.resources.is_none()
    }

    /// Digest of the mode, stopword set and lemmatiser rules; two normalisers
    /// with the same fingerprint produce the same output for any input.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        match &self.resources {
            None => hasher.update(b"degraded"),
            Some(resources) => {
                hasher.update(b"stopwords");
                let mut words: Vec<&str> = resources.stopwords.iter().map(String::as_str).collect();
                words.sort_unstable();
                for word in words {
                    hasher.update(word.as_bytes());
                    hasher.update(b"\n");
                }
                hasher.update(b"lemmatizer");
                for (plural, base) in IRREGULAR_PLURALS.iter().chain(SUFFIX_RULES) {
                    hasher.update(plural.as_bytes());
                    hasher.update(b"=");
                    hasher.update(base.as_bytes());
                    hasher.update(b"\n");
                }
                for ending in KEEP_ENDINGS {
                    hasher.update(ending.as_bytes());
                    hasher.update(b"\n");
                }
            }
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn normalize(&self, raw_text: &str) -> String {
        let stripped = strip_punctuation(&raw_text.trim().to_lowercase());
        let Some(resources) = &self.resources else {
            return stripped;
        };
        stripped
            .unicode_words()
            .filter(|token| !resources.stopwords.contains(*token))
            .map(|token| resources.lemmatizer.lemmatize(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Department names double as ordinary words ("it"); they must survive
/// stopword removal to stay visible to the classifier.
fn stopword_set<'a>(words: impl Iterator<Item = &'a str>) -> HashSet<String> {
    words
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty() && !DEPARTMENTS.contains(&w.as_str()))
        .collect()
}

fn load_stopwords(path: &Path) -> std::io::Result<HashSet<String>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(stopword_set(raw.lines()))
}
