pub mod corpus;
pub mod error;
pub mod persist;
pub mod scorer;
pub mod tokenizer;

pub use corpus::{Corpus, CorpusSummary, DEFAULT_IDF};
pub use error::{Error, Result};
pub use persist::DEFAULT_STOPWORD_THRESHOLD;
pub use scorer::{rank_terms, RankedTerm};
