//! In-memory lexical (BM25) index.
//!
//! Built once from a [`LexicalSnapshot`]; read-only afterwards and safe to share across
//! concurrent queries. Refreshing means building a new index from a new snapshot.

pub mod bm25;
pub mod error;
pub mod snapshot;
pub mod tokenizer;


pub use bm25::{Bm25Params, LexicalIndex};
pub use error::{LexicalError, LexicalResult};
pub use snapshot::LexicalSnapshot;
pub use tokenizer::{Tokenize, WhitespaceTokenizer};
