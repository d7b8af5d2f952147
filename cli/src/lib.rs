use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tfidf_core::persist::load_corpus;
use tfidf_core::{Corpus, RankedTerm};
use walkdir::WalkDir;

/// A document record in a `.json` / `.jsonl` input. Other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub body: String,
}

/// Input files under `input` (or `input` itself), in path order.
///
/// `.txt` files hold one document each; `.json` and `.jsonl` hold [`InputDoc`]s.
pub fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "txt" | "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Document bodies contained in one input file.
pub fn read_documents(file: &Path) -> Result<Vec<String>> {
    match file.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => read_jsonl(file),
        Some("json") => read_json(file),
        _ => Ok(vec![fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?]),
    }
}

fn read_jsonl(file: &Path) -> Result<Vec<String>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut bodies = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid document", file.display(), i + 1))?;
        bodies.push(doc.body);
    }
    Ok(bodies)
}

fn read_json(file: &Path) -> Result<Vec<String>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("{}: invalid JSON", file.display()))?;
    let docs: Vec<InputDoc> = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<_, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => {
            tracing::warn!(file = %file.display(), "skipping JSON that is neither an object nor an array");
            vec![]
        }
    };
    Ok(docs.into_iter().map(|d| d.body).collect())
}

/// Add every document found under `input` to `corpus`. Returns how many were added.
pub fn ingest(corpus: &mut Corpus, input: &Path) -> Result<usize> {
    let files = collect_files(input);
    if files.is_empty() {
        tracing::warn!(input = %input.display(), "no .txt, .json or .jsonl inputs found");
    }
    let mut added = 0;
    for file in files {
        let bodies = read_documents(&file)?;
        tracing::debug!(file = %file.display(), docs = bodies.len(), "read input");
        for body in &bodies {
            corpus.add_document(body).with_context(|| format!("adding document from {}", file.display()))?;
        }
        added += bodies.len();
    }
    Ok(added)
}

/// Build a corpus from `input`, starting from `base` when given.
pub fn build_corpus(input: &Path, base: Option<&Path>, default_idf: f64) -> Result<Corpus> {
    let mut corpus = match base {
        Some(p) => load_corpus(p, default_idf).with_context(|| format!("loading base corpus {}", p.display()))?,
        None => Corpus::new(default_idf),
    };
    let added = ingest(&mut corpus, input)?;
    tracing::info!(added, num_docs = corpus.document_count(), num_terms = corpus.term_count(), "ingested documents");
    Ok(corpus)
}

/// Tab-separated `term<TAB>score` lines, at most `top` of them.
pub fn format_ranked(ranked: &[RankedTerm], top: Option<usize>) -> String {
    ranked
        .iter()
        .take(top.unwrap_or(usize::MAX))
        .map(|r| format!("{}\t{:.6}\n", r.term, r.score))
        .collect()
}
