//! Text encodings of a corpus and its stopword list, and the file I/O around them.
//!
//! Corpus file:
//!
//! ```text
//! 50
//! the: 48
//! girl: 1
//! ```
//!
//! Stopword file: one term per line.

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fs::{create_dir_all, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// Fraction of the document count above which `save_corpus` marks a term as a stopword.
pub const DEFAULT_STOPWORD_THRESHOLD: f64 = 0.01;

/// Parse the corpus encoding into `(document_count, term -> document count)`.
///
/// Blank lines are skipped. Each entry is split on its first `:`. A later line
/// for the same term replaces the earlier one.
pub fn parse_corpus(text: &str) -> Result<(u32, HashMap<String, u32>)> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (first_no, first) = lines
        .next()
        .ok_or_else(|| Error::format(1, "", "missing document count"))?;
    let num_docs: u32 = first
        .trim()
        .parse()
        .map_err(|_| Error::format(first_no, first, "document count is not a non-negative integer"))?;

    let mut counts: HashMap<String, u32> = HashMap::new();
    for (line_no, line) in lines {
        let (term, count) = line
            .split_once(':')
            .ok_or_else(|| Error::format(line_no, line, "expected `<term>: <count>`"))?;
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::format(line_no, line, "empty term"));
        }
        let count: u32 = count
            .trim()
            .parse()
            .map_err(|_| Error::format(line_no, line, "count is not a non-negative integer"))?;
        if count > num_docs {
            return Err(Error::format(line_no, line, format!("count exceeds document count {num_docs}")));
        }
        counts.insert(term.to_string(), count);
    }
    tracing::debug!(num_docs, num_terms = counts.len(), "parsed corpus");
    Ok((num_docs, counts))
}

/// Parse a stopword list: one trimmed term per line, blank lines ignored.
pub fn parse_stopwords(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Encode the corpus counters, terms in ascending order.
///
/// Terms containing `:` would not parse back, so they are refused with
/// [`Error::UnencodableTerm`].
pub fn render_corpus(corpus: &Corpus) -> Result<String> {
    let mut terms: Vec<(&String, &u32)> = corpus.term_document_counts().iter().collect();
    terms.sort();
    if let Some((term, _)) = terms.iter().find(|(t, _)| t.contains(':')) {
        return Err(Error::UnencodableTerm(term.to_string()));
    }
    let entries: String = terms.into_iter().map(|(term, count)| format!("{term}: {count}\n")).collect();
    Ok(format!("{}\n{entries}", corpus.document_count()))
}

/// Encode the stopwords derived from document frequency (see [`Corpus::derived_stopwords`]).
pub fn render_stopwords(corpus: &Corpus, threshold: f64) -> String {
    corpus
        .derived_stopwords(threshold)
        .into_iter()
        .map(|t| format!("{t}\n"))
        .collect()
}

fn read_to_string(path: &Path, not_found: impl FnOnce() -> Error) -> Result<String> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Load a corpus file with no stopwords.
pub fn load_corpus(path: &Path, default_idf: f64) -> Result<Corpus> {
    let text = read_to_string(path, || Error::CorpusNotFound(path.to_path_buf()))?;
    let (num_docs, counts) = parse_corpus(&text)?;
    tracing::debug!(path = %path.display(), num_docs, "loaded corpus");
    Corpus::load(num_docs, counts, default_idf)
}

pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let text = read_to_string(path, || Error::StopwordsNotFound(path.to_path_buf()))?;
    let stopwords = parse_stopwords(&text);
    tracing::debug!(path = %path.display(), num_stopwords = stopwords.len(), "loaded stopwords");
    Ok(stopwords)
}

/// Build a corpus from an optional corpus file and an optional stopword file.
///
/// With neither path this is an empty corpus.
pub fn open(corpus_path: Option<&Path>, stopword_path: Option<&Path>, default_idf: f64) -> Result<Corpus> {
    let mut corpus = match corpus_path {
        Some(p) => load_corpus(p, default_idf)?,
        None => Corpus::new(default_idf),
    };
    if let Some(p) = stopword_path {
        corpus.set_stopwords(load_stopwords(p)?);
    }
    Ok(corpus)
}

/// Replace the counters of `corpus` with the contents of a corpus file.
///
/// The file is fully parsed and checked first; on any error `corpus` is unchanged.
/// Stopwords and the default IDF are kept.
pub fn reload_corpus(corpus: &mut Corpus, path: &Path) -> Result<()> {
    let text = read_to_string(path, || Error::CorpusNotFound(path.to_path_buf()))?;
    let (num_docs, counts) = parse_corpus(&text)?;
    corpus.replace_counts(num_docs, counts)
}

/// Write the corpus encoding and the derived stopword list.
///
/// Both encodings are built before either file is touched.
pub fn save_corpus(corpus: &Corpus, corpus_path: &Path, stopword_path: &Path, stopword_threshold: f64) -> Result<()> {
    let encoded = render_corpus(corpus)?;
    let stopwords = render_stopwords(corpus, stopword_threshold);
    write_file(corpus_path, &encoded)?;
    write_file(stopword_path, &stopwords)?;
    tracing::info!(
        corpus = %corpus_path.display(),
        stopwords = %stopword_path.display(),
        num_docs = corpus.document_count(),
        num_terms = corpus.term_count(),
        num_stopwords = stopwords.lines().count(),
        "saved corpus"
    );
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut f = File::create(path)?;
    f.write_all(contents.as_bytes())?;
    Ok(())
}
