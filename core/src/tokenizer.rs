use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // Anchor spans, any other tag, or a run of ASCII word characters plus ' @ #.
    // The search is unanchored: a chunk is kept if any part of it matches.
    static ref KEEP: Regex = Regex::new(r"<a.*?/a>|<[^>]*>|[A-Za-z0-9_'@#]+").expect("valid regex");
}

/// Split text on ASCII whitespace and keep the chunks that look like words or markup.
///
/// Chunks are returned verbatim, in order: no case folding, no stemming and no
/// trimming of punctuation attached to a kept chunk ("hello," stays "hello,").
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_ascii_whitespace()
        .filter(|chunk| KEEP.is_match(chunk))
        .map(str::to_string)
        .collect()
}

/// Unique tokens in order of first occurrence.
pub fn distinct_terms<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tokens.len());
    tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| seen.insert(*t))
        .collect()
}
