pub mod concurrent_map;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod ranking;
pub mod server;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use document::{Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::{DocId, InvertedIndex, WordFrequencies};
pub use ranking::DocumentPredicate;
pub use server::{EngineOptions, ExecutionPolicy, SearchServer};
