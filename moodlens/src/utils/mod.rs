//! Lexical helpers and content fingerprinting.
//!
//! Everything here is pure and allocation-light; the guards and the
//! softening engine are built on top of these functions.

mod fingerprint;
mod lexical;

pub use fingerprint::content_fingerprint;
pub use lexical::{jaccard_similarity, normalize_whitespace, token_set, tokenize};
