use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    #[error("stopwords not found: {}", .0.display())]
    StopwordsNotFound(PathBuf),

    /// A corpus entry that could not be parsed or violates the count invariant.
    /// `line_number` is 1-based, or 0 when the entry did not come from a file.
    #[error("malformed corpus entry at line {line_number} ({line:?}): {reason}")]
    CorpusFormat {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("document contains no terms")]
    EmptyDocument,

    /// The document count is already at its maximum.
    #[error("corpus is full: document count cannot exceed {}", u32::MAX)]
    DocumentCountOverflow,

    /// A term the corpus encoding cannot represent (it splits entries on the first `:`).
    #[error("term {0:?} contains ':' and cannot be written to a corpus file")]
    UnencodableTerm(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn format(line_number: usize, line: &str, reason: impl Into<String>) -> Self {
        Error::CorpusFormat { line_number, line: line.to_string(), reason: reason.into() }
    }
}
