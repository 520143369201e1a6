use crate::document::{average_rating, Document, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::{DocId, DocumentData, DocumentIds, InvertedIndex, WordFrequencies};
use crate::query::parse_query;
use crate::ranking::{self, DocumentPredicate};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use rayon::prelude::*;
use tracing::debug;

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
pub const RELEVANCE_EPSILON: f64 = 1e-6;
pub const DEFAULT_SHARD_COUNT: usize = 120;

/// How a call spreads its work. Both policies give the same answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Upper bound on the length of a ranked result list.
    pub max_results: usize,
    /// Relevances closer than this are ranked by rating instead.
    pub relevance_epsilon: f64,
    /// Shards in the accumulator used by parallel ranking.
    pub shard_count: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

/// In-memory TF-IDF search engine.
///
/// The engine does not guard itself against concurrent mutation; the
/// borrow checker already forbids searching while a document is being
/// added or removed.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    options: EngineOptions,
}

impl SearchServer {
    /// Build with stop words given as one space-delimited string.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Ok(Self::with_options(StopWords::parse(stop_words_text)?, EngineOptions::default()))
    }

    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_options(StopWords::new(stop_words)?, EngineOptions::default()))
    }

    pub fn with_options(stop_words: StopWords, options: EngineOptions) -> Self {
        Self { stop_words, index: InvertedIndex::new(), options }
    }

    pub fn options(&self) -> &EngineOptions { &self.options }
    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    /// Index a document. The whole text is validated before anything is
    /// stored, so a rejected document leaves no trace.
    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::InvalidId(id));
        }
        if self.index.contains(id) {
            return Err(SearchError::DuplicateId(id));
        }
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidWord(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        let rating = average_rating(ratings);
        self.index.insert(id, &words, DocumentData { rating, status });
        debug!(id, words = words.len(), rating, ?status, "document indexed");
        Ok(())
    }

    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_: DocId, s: DocumentStatus, _: i32| {
            s == status
        })
    }

    pub fn find_top_documents_by<P: DocumentPredicate>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    /// Rank all documents accepted by `predicate` and keep the best
    /// `max_results`, ordered by descending relevance then rating.
    pub fn find_top_documents_with<P: DocumentPredicate>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let query = parse_query(raw_query, &self.stop_words, true)?;
        let EngineOptions { max_results, relevance_epsilon, shard_count } = self.options;
        let top = match policy {
            ExecutionPolicy::Sequential => {
                let found = ranking::find_all_documents(&self.index, &query, &predicate);
                debug!(candidates = found.len(), "sequential ranking");
                ranking::top_documents(found, max_results, relevance_epsilon)
            }
            ExecutionPolicy::Parallel => {
                let found =
                    ranking::par_find_all_documents(&self.index, &query, &predicate, shard_count);
                debug!(candidates = found.len(), shard_count, "parallel ranking");
                ranking::par_top_documents(found, max_results, relevance_epsilon)
            }
        };
        Ok(top)
    }

    pub fn document_count(&self) -> usize { self.index.document_count() }

    /// Live ids in ascending order.
    pub fn document_ids(&self) -> DocumentIds<'_> { self.index.document_ids() }

    /// Word frequencies of one document; empty when the id is unknown.
    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies {
        self.index.word_frequencies(id)
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    /// Drop a document and all of its postings. Unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with(ExecutionPolicy::Sequential, id)
    }

    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, id: DocId) {
        let removed = match policy {
            ExecutionPolicy::Sequential => self.index.remove(id),
            ExecutionPolicy::Parallel => self.index.remove_parallel(id),
        };
        if removed {
            debug!(id, ?policy, "document removed");
        }
    }

    /// Plus words of the query that occur in the document, sorted and
    /// deduplicated, together with its status. The list is empty when any
    /// minus word occurs in the document.
    ///
    /// The query is parsed before the id is looked up, so a malformed query
    /// fails with `InvalidQueryWord` even for an unknown id.
    ///
    /// Returned words borrow from the engine and cannot outlive the next
    /// mutation of it.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, id)
    }

    fn word_in_document(&self, word: &str, id: DocId) -> Option<&str> {
        self.index.postings_entry(word).filter(|(_, p)| p.contains_key(&id)).map(|(w, _)| w)
    }

    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        let purge = policy == ExecutionPolicy::Sequential;
        let query = parse_query(raw_query, &self.stop_words, purge)?;
        let status = self.index.document(id).ok_or(SearchError::DocumentNotFound(id))?.status;
        let lookup = |word: &str| self.word_in_document(word, id);
        match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(|w| lookup(*w).is_some()) {
                    return Ok((Vec::new(), status));
                }
                Ok((query.plus_words.iter().filter_map(|w| lookup(*w)).collect(), status))
            }
            ExecutionPolicy::Parallel => {
                if query.minus_words.par_iter().any(|w| lookup(*w).is_some()) {
                    return Ok((Vec::new(), status));
                }
                let mut matched: Vec<&str> =
                    query.plus_words.par_iter().filter_map(|w| lookup(*w)).collect();
                matched.par_sort_unstable();
                matched.dedup();
                Ok((matched, status))
            }
        }
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter { self.index.document_ids() }
}
