use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use tfidf_core::persist::{load_corpus, load_stopwords, open, reload_corpus, save_corpus};
use tfidf_core::{Corpus, Error};

const TEST_CORPUS: &str = "50\na: 2\nthe: 48\ngirl: 1\nmoon: 1\nsaid: 5\nhello: 1\n";
const TEST_STOPWORDS: &str = "moon\n";
const DEFAULT_IDF_UNITTEST: f64 = 1.0;

struct Fixtures {
    _dir: TempDir,
    corpus: PathBuf,
    stopwords: PathBuf,
}

fn fixtures() -> Fixtures {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("tfidf_testcorpus.txt");
    let stopwords = dir.path().join("tfidf_teststopwords.txt");
    fs::write(&corpus, TEST_CORPUS).unwrap();
    fs::write(&stopwords, TEST_STOPWORDS).unwrap();
    Fixtures { _dir: dir, corpus, stopwords }
}

fn expected_idf(num_docs: u32, df: u32) -> f64 {
    ((1 + num_docs) as f64 / (1 + df) as f64).ln()
}

fn terms(corpus: &Corpus, doc: &str) -> Vec<String> {
    corpus.rank_terms(doc).unwrap().into_iter().map(|r| r.term).collect()
}

fn position(terms: &[String], term: &str) -> usize {
    terms.iter().position(|t| t == term).unwrap()
}

#[test]
fn reports_documents_and_terms() {
    let fx = fixtures();
    let corpus = load_corpus(&fx.corpus, DEFAULT_IDF_UNITTEST).unwrap();
    assert_eq!(corpus.document_count(), 50);
    assert_eq!(corpus.term_count(), 6);
}

#[test]
fn unseen_terms_get_the_default() {
    let fx = fixtures();
    let corpus = load_corpus(&fx.corpus, DEFAULT_IDF_UNITTEST).unwrap();
    assert_eq!(corpus.idf("nonexistent"), DEFAULT_IDF_UNITTEST);
    // case sensitive
    assert_eq!(corpus.idf("THE"), DEFAULT_IDF_UNITTEST);
}

#[test]
fn seen_terms_follow_document_frequency() {
    let fx = fixtures();
    let corpus = load_corpus(&fx.corpus, DEFAULT_IDF_UNITTEST).unwrap();
    assert!((corpus.idf("the") - 0.0400).abs() < 1e-4);
    assert!((corpus.idf("a") - 2.833).abs() < 1e-3);
    assert!(corpus.idf("a") > corpus.idf("the"));
    assert_eq!(corpus.idf("girl"), corpus.idf("moon"));
}

#[test]
fn ranks_single_keyword_document() {
    let fx = fixtures();
    let corpus = load_corpus(&fx.corpus, 0.01).unwrap();
    assert_eq!(terms(&corpus, "the spoon and the fork")[0], "the");
}

#[test]
fn ranks_multi_keyword_document() {
    let fx = fixtures();
    let corpus = load_corpus(&fx.corpus, DEFAULT_IDF_UNITTEST).unwrap();
    let ranked = terms(&corpus, "the girl said hello over the phone");
    assert_eq!(ranked[0], "girl");
    assert_eq!(ranked.last().unwrap(), "the");
    assert!(position(&ranked, "girl") < position(&ranked, "said"));
    assert!(position(&ranked, "said") < position(&ranked, "phone"));
    assert!(position(&ranked, "phone") < position(&ranked, "the"));
}

#[test]
fn adds_documents_to_existing_corpus() {
    let fx = fixtures();
    let mut corpus = open(Some(fx.corpus.as_path()), None, DEFAULT_IDF_UNITTEST).unwrap();
    assert_eq!(corpus.idf("water"), DEFAULT_IDF_UNITTEST);
    assert_eq!(corpus.idf("moon"), expected_idf(corpus.document_count(), 1));
    assert_eq!(corpus.idf("said"), expected_idf(corpus.document_count(), 5));

    corpus.add_document("water moon").unwrap();

    assert_eq!(corpus.document_count(), 51);
    assert_eq!(corpus.idf("water"), expected_idf(corpus.document_count(), 1));
    assert_eq!(corpus.idf("moon"), expected_idf(corpus.document_count(), 2));
    assert_eq!(corpus.idf("said"), expected_idf(corpus.document_count(), 5));
}

#[test]
fn adds_documents_to_empty_corpus() {
    let mut corpus = open(None, None, DEFAULT_IDF_UNITTEST).unwrap();
    for term in ["moon", "water", "said"] {
        assert_eq!(corpus.idf(term), DEFAULT_IDF_UNITTEST);
    }

    corpus.add_document("moon").unwrap();
    corpus.add_document("moon said hello").unwrap();

    assert_eq!(corpus.idf("water"), DEFAULT_IDF_UNITTEST);
    assert_eq!(corpus.idf("said"), expected_idf(corpus.document_count(), 1));
    assert_eq!(corpus.idf("moon"), expected_idf(corpus.document_count(), 2));
}

#[test]
fn observes_stopwords() {
    let fx = fixtures();
    let mut corpus = open(Some(fx.corpus.as_path()), Some(fx.stopwords.as_path()), DEFAULT_IDF_UNITTEST).unwrap();
    assert_eq!(corpus.idf("water"), DEFAULT_IDF_UNITTEST);
    assert_eq!(corpus.idf("moon"), 0.0);
    assert_eq!(corpus.idf("said"), expected_idf(corpus.document_count(), 5));

    corpus.add_document("moon").unwrap();
    corpus.add_document("moon and water").unwrap();

    assert_eq!(corpus.idf("water"), expected_idf(corpus.document_count(), 1));
    assert_eq!(corpus.idf("moon"), 0.0);
    assert_eq!(corpus.idf("said"), expected_idf(corpus.document_count(), 5));
}

#[test]
fn missing_files_are_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    assert!(matches!(load_corpus(&missing, 1.0), Err(Error::CorpusNotFound(p)) if p == missing));
    assert!(matches!(load_stopwords(&missing), Err(Error::StopwordsNotFound(p)) if p == missing));
    assert!(matches!(open(None, Some(missing.as_path()), 1.0), Err(Error::StopwordsNotFound(_))));
}

#[test]
fn save_and_reload_round_trips() {
    let fx = fixtures();
    let mut corpus = load_corpus(&fx.corpus, DEFAULT_IDF_UNITTEST).unwrap();
    corpus.add_document("water moon moon").unwrap();

    let out = tempdir().unwrap();
    let corpus_out = out.path().join("nested/corpus.txt");
    let stop_out = out.path().join("nested/stopwords.txt");
    save_corpus(&corpus, &corpus_out, &stop_out, 0.3).unwrap();

    let reloaded = load_corpus(&corpus_out, DEFAULT_IDF_UNITTEST).unwrap();
    assert_eq!(reloaded.document_count(), corpus.document_count());
    assert_eq!(reloaded.term_document_counts(), corpus.term_document_counts());

    // 0.3 * 51 = 15.3: only "the" is common enough
    let stopwords = load_stopwords(&stop_out).unwrap();
    assert_eq!(stopwords.len(), 1);
    assert!(stopwords.contains("the"));
}

#[test]
fn failed_reload_leaves_corpus_untouched() {
    let fx = fixtures();
    let mut corpus = open(Some(fx.corpus.as_path()), Some(fx.stopwords.as_path()), DEFAULT_IDF_UNITTEST).unwrap();
    let before = corpus.clone();

    let bad = fx.corpus.with_file_name("bad.txt");
    fs::write(&bad, "10\nmoon: 3\nbroken line\n").unwrap();
    let err = reload_corpus(&mut corpus, &bad).unwrap_err();
    assert!(matches!(err, Error::CorpusFormat { line_number: 3, .. }));
    assert_eq!(corpus, before);

    assert!(reload_corpus(&mut corpus, Path::new("/definitely/not/here")).is_err());
    assert_eq!(corpus, before);

    fs::write(&bad, "10\nmoon: 3\n").unwrap();
    reload_corpus(&mut corpus, &bad).unwrap();
    assert_eq!(corpus.document_count(), 10);
    assert_eq!(corpus.term_count(), 1);
    assert!(corpus.is_stopword("moon"));
}

#[test]
fn empty_document_cannot_be_ranked() {
    let corpus = Corpus::new(1.0);
    assert!(matches!(corpus.rank_terms("   "), Err(Error::EmptyDocument)));
}

#[test]
fn save_refuses_terms_that_cannot_reload() {
    let mut corpus = Corpus::new(DEFAULT_IDF_UNITTEST);
    corpus.add_document("Note: the moon").unwrap();

    let out = tempdir().unwrap();
    let corpus_out = out.path().join("corpus.txt");
    let stop_out = out.path().join("stopwords.txt");
    let err = save_corpus(&corpus, &corpus_out, &stop_out, 0.5).unwrap_err();
    assert!(matches!(err, Error::UnencodableTerm(ref t) if t == "Note:"));
    assert!(!corpus_out.exists());
    assert!(!stop_out.exists());
}
