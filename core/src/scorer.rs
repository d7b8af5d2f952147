use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub score: f64,
}

/// Rank the distinct terms of `document` by `tf * idf`, highest first.
///
/// `tf` is the occurrence count of a term divided by the number of distinct
/// terms in the document (not by the token count). Equal scores keep the
/// order in which the terms first appear in the document.
pub fn rank_terms(document: &str, corpus: &Corpus) -> Result<Vec<RankedTerm>> {
    let tokens = tokenize(document);

    // term -> (first position, occurrences)
    let mut tf_raw: HashMap<&str, (usize, u32)> = HashMap::new();
    for token in &tokens {
        let next = tf_raw.len();
        tf_raw.entry(token.as_str()).or_insert((next, 0)).1 += 1;
    }
    if tf_raw.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let n = tf_raw.len() as f64;
    let mut ordered: Vec<(&str, usize, u32)> = tf_raw.into_iter().map(|(t, (pos, c))| (t, pos, c)).collect();
    ordered.sort_unstable_by_key(|&(_, pos, _)| pos);

    let mut ranked: Vec<RankedTerm> = ordered
        .into_iter()
        .map(|(term, _, count)| RankedTerm { term: term.to_string(), score: count as f64 / n * corpus.idf(term) })
        .collect();
    // stable: ties stay in first-occurrence order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(num_tokens = tokens.len(), num_terms = ranked.len(), "ranked document terms");
    Ok(ranked)
}
