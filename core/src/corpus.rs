use crate::error::{Error, Result};
use crate::scorer::{rank_terms, RankedTerm};
use crate::tokenizer::{distinct_terms, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// IDF returned for terms the corpus has never seen.
pub const DEFAULT_IDF: f64 = 1.5;

/// Document-frequency statistics over a set of documents.
///
/// Counts record presence, not occurrences: a term repeated in one document
/// bumps its entry by one. Counts never exceed `document_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    document_count: u32,
    term_document_counts: HashMap<String, u32>,
    stopwords: HashSet<String>,
    default_idf: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub num_docs: u32,
    pub num_terms: usize,
    pub num_stopwords: usize,
}

impl Default for Corpus {
    fn default() -> Self { Self::new(DEFAULT_IDF) }
}

impl Corpus {
    pub fn new(default_idf: f64) -> Self {
        Self {
            document_count: 0,
            term_document_counts: HashMap::new(),
            stopwords: HashSet::new(),
            default_idf,
        }
    }

    /// Build a corpus from already-parsed statistics.
    pub fn load(document_count: u32, term_document_counts: HashMap<String, u32>, default_idf: f64) -> Result<Self> {
        check_counts(document_count, &term_document_counts)?;
        Ok(Self { document_count, term_document_counts, stopwords: HashSet::new(), default_idf })
    }

    /// Swap in new statistics. On error the corpus is left untouched.
    pub fn replace_counts(&mut self, document_count: u32, term_document_counts: HashMap<String, u32>) -> Result<()> {
        check_counts(document_count, &term_document_counts)?;
        self.document_count = document_count;
        self.term_document_counts = term_document_counts;
        Ok(())
    }

    pub fn document_count(&self) -> u32 { self.document_count }
    pub fn term_document_counts(&self) -> &HashMap<String, u32> { &self.term_document_counts }
    pub fn term_count(&self) -> usize { self.term_document_counts.len() }
    pub fn stopwords(&self) -> &HashSet<String> { &self.stopwords }
    pub fn default_idf(&self) -> f64 { self.default_idf }
    pub fn set_default_idf(&mut self, default_idf: f64) { self.default_idf = default_idf; }

    /// Number of documents containing `term`, if the corpus has seen it.
    pub fn document_frequency(&self, term: &str) -> Option<u32> {
        self.term_document_counts.get(term).copied()
    }

    pub fn is_stopword(&self, term: &str) -> bool { self.stopwords.contains(term) }

    /// Replace the stopword set. Stopwords always have an IDF of zero.
    pub fn set_stopwords<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = terms.into_iter().map(Into::into).collect();
    }

    /// Count one more document and every distinct term in it.
    ///
    /// Fails without touching the corpus once the document count is at `u32::MAX`.
    /// Term counts never exceed the document count, so they cannot overflow.
    pub fn add_document(&mut self, text: &str) -> Result<()> {
        let document_count = self.document_count.checked_add(1).ok_or(Error::DocumentCountOverflow)?;
        let tokens = tokenize(text);
        self.document_count = document_count;
        for term in distinct_terms(&tokens) {
            *self.term_document_counts.entry(term.to_string()).or_insert(0) += 1;
        }
        tracing::trace!(num_docs = self.document_count, num_tokens = tokens.len(), "added document");
        Ok(())
    }

    /// Smoothed inverse document frequency, `ln((1 + N) / (1 + df))`.
    ///
    /// Stopwords score 0 whatever their count. Terms missing from the corpus
    /// get `default_idf` rather than a formula value.
    pub fn idf(&self, term: &str) -> f64 {
        if self.is_stopword(term) {
            return 0.0;
        }
        match self.term_document_counts.get(term) {
            Some(&df) => ((1.0 + self.document_count as f64) / (1.0 + df as f64)).ln(),
            None => self.default_idf,
        }
    }

    /// Terms of `document` ordered by decreasing TF-IDF.
    pub fn rank_terms(&self, document: &str) -> Result<Vec<RankedTerm>> {
        rank_terms(document, self)
    }

    /// Terms present in more than `threshold * document_count` documents,
    /// most frequent first (ties by term).
    pub fn derived_stopwords(&self, threshold: f64) -> Vec<&str> {
        let cutoff = threshold * self.document_count as f64;
        let mut terms: Vec<(&str, u32)> = self
            .term_document_counts
            .iter()
            .filter(|(_, &df)| df as f64 > cutoff)
            .map(|(t, &df)| (t.as_str(), df))
            .collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.into_iter().map(|(t, _)| t).collect()
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            num_docs: self.document_count,
            num_terms: self.term_document_counts.len(),
            num_stopwords: self.stopwords.len(),
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{num_docs: {}, term_num_docs: {}}}", self.document_count, self.term_document_counts.len())
    }
}

fn check_counts(document_count: u32, counts: &HashMap<String, u32>) -> Result<()> {
    match counts.iter().find(|(_, &df)| df > document_count) {
        Some((term, df)) => Err(Error::format(
            0,
            &format!("{term}: {df}"),
            format!("count exceeds document count {document_count}"),
        )),
        None => Ok(()),
    }
}
