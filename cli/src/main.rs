use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tfidf_core::persist::{open, save_corpus};
use tfidf_core::{Corpus, DEFAULT_IDF, DEFAULT_STOPWORD_THRESHOLD};
use tfidf_cli::{build_corpus, format_ranked};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "tfidf")]
#[command(about = "Build TF-IDF corpora and rank document keywords", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus file (`<num docs>` then `<term>: <count>` lines)
    #[arg(long)]
    corpus: PathBuf,
    /// Stopword file, one term per line
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// IDF returned for terms missing from the corpus
    #[arg(long, default_value_t = DEFAULT_IDF)]
    default_idf: f64,
}

impl CorpusArgs {
    fn open(&self) -> Result<Corpus> {
        open(Some(self.corpus.as_path()), self.stopwords.as_deref(), self.default_idf)
            .with_context(|| format!("opening corpus {}", self.corpus.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a corpus and stopword list from .txt, .json or .jsonl documents
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Where to write the corpus
        #[arg(long)]
        corpus_out: PathBuf,
        /// Where to write the derived stopwords
        #[arg(long)]
        stopwords_out: PathBuf,
        /// Existing corpus to extend instead of starting empty
        #[arg(long)]
        base_corpus: Option<PathBuf>,
        /// A term is a stopword if it occurs in more than this fraction of documents
        #[arg(long, default_value_t = DEFAULT_STOPWORD_THRESHOLD)]
        stopword_threshold: f64,
    },
    /// Print the IDF of each term
    Idf {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Rank the terms of a document by TF-IDF
    Keywords {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Document text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// File holding the document text
        #[arg(long)]
        file: Option<PathBuf>,
        /// Only print the first N terms
        #[arg(long)]
        top: Option<usize>,
        /// Emit JSON instead of tab-separated lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print document and term counts
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, corpus_out, stopwords_out, base_corpus, stopword_threshold } => {
            let corpus = build_corpus(&input, base_corpus.as_deref(), DEFAULT_IDF)?;
            save_corpus(&corpus, &corpus_out, &stopwords_out, stopword_threshold)
                .with_context(|| format!("writing {}", corpus_out.display()))?;
            println!("{corpus}");
        }
        Commands::Idf { corpus, terms } => {
            let corpus = corpus.open()?;
            for term in terms {
                println!("{}\t{:.6}", term, corpus.idf(&term));
            }
        }
        Commands::Keywords { corpus, text, file, top, json } => {
            let corpus = corpus.open()?;
            let document = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_document(&path)?,
                (None, None) => anyhow::bail!("either --text or --file is required"),
            };
            let mut ranked = corpus.rank_terms(&document)?;
            if json {
                ranked.truncate(top.unwrap_or(ranked.len()));
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                print!("{}", format_ranked(&ranked, top));
            }
        }
        Commands::Stats { corpus, json } => {
            let corpus = corpus.open()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&corpus.summary())?);
            } else {
                println!("{corpus}");
            }
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
