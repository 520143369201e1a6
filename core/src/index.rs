use crate::document::DocumentStatus;
use rayon::prelude::*;
use std::collections::{btree_map, BTreeMap};
use std::sync::Arc;

pub type DocId = i32;

/// Document -> term frequency, for one word.
pub type Postings = BTreeMap<DocId, f64>;

/// Word -> term frequency, for one document.
pub type WordFrequencies = BTreeMap<Arc<str>, f64>;

pub type DocumentIds<'a> = std::iter::Copied<btree_map::Keys<'a, DocId, DocumentData>>;

static EMPTY_FREQUENCIES: WordFrequencies = BTreeMap::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Inverted index kept together with its reverse mapping.
///
/// `word_to_docs` and `doc_to_words` are mirror images: every
/// (word, document, frequency) triple in one is present in the other.
/// Only `insert` and the `remove*` methods mutate them, and they always
/// update both sides. Words are interned once as `Arc<str>` and shared by
/// both maps, so any `&str` borrowed from the index stays valid until the
/// owning document is removed.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_to_docs: BTreeMap<Arc<str>, Postings>,
    doc_to_words: BTreeMap<DocId, WordFrequencies>,
    documents: BTreeMap<DocId, DocumentData>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn contains(&self, id: DocId) -> bool { self.documents.contains_key(&id) }
    pub fn document(&self, id: DocId) -> Option<&DocumentData> { self.documents.get(&id) }
    pub fn document_count(&self) -> usize { self.documents.len() }
    pub fn word_count(&self) -> usize { self.word_to_docs.len() }

    /// Live ids in ascending order.
    pub fn document_ids(&self) -> DocumentIds<'_> { self.documents.keys().copied() }

    pub fn postings(&self, word: &str) -> Option<&Postings> { self.word_to_docs.get(word) }

    /// The interned copy of `word` together with its postings.
    pub fn postings_entry(&self, word: &str) -> Option<(&str, &Postings)> {
        self.word_to_docs.get_key_value(word).map(|(w, p)| (&**w, p))
    }

    pub fn word_frequencies(&self, id: DocId) -> &WordFrequencies {
        self.doc_to_words.get(&id).unwrap_or(&EMPTY_FREQUENCIES)
    }

    /// ln(N / df) for a word present in `posting_count` documents.
    pub fn inverse_document_freq(&self, posting_count: usize) -> f64 {
        (self.document_count() as f64 / posting_count as f64).ln()
    }

    /// Register a document from already validated, stop-word-free words.
    /// Each occurrence adds `1 / words.len()` to the word's frequency.
    /// The caller guarantees `id` is not yet present.
    pub fn insert(&mut self, id: DocId, words: &[&str], data: DocumentData) {
        debug_assert!(!self.contains(id));
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            let mut freqs = WordFrequencies::new();
            for &word in words {
                let key = match self.word_to_docs.get_key_value(word) {
                    Some((key, _)) => Arc::clone(key),
                    None => Arc::from(word),
                };
                *self.word_to_docs.entry(Arc::clone(&key)).or_default().entry(id).or_insert(0.0) +=
                    inv_word_count;
                *freqs.entry(key).or_insert(0.0) += inv_word_count;
            }
            self.doc_to_words.insert(id, freqs);
        }
        self.documents.insert(id, data);
    }

    /// Strip a document from every posting list. Returns false if `id` was absent.
    pub fn remove(&mut self, id: DocId) -> bool {
        if self.documents.remove(&id).is_none() {
            return false;
        }
        let Some(freqs) = self.doc_to_words.remove(&id) else {
            return true;
        };
        for word in freqs.keys() {
            if let Some(postings) = self.word_to_docs.get_mut(word) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.word_to_docs.remove(word);
                }
            }
        }
        true
    }

    /// Same result as [`remove`](Self::remove), with the per-word erasure
    /// fanned out across the rayon pool. The touched posting lists are
    /// detached first, so every worker owns its list outright.
    pub fn remove_parallel(&mut self, id: DocId) -> bool {
        if self.documents.remove(&id).is_none() {
            return false;
        }
        let Some(freqs) = self.doc_to_words.remove(&id) else {
            return true;
        };
        let mut detached: Vec<(Arc<str>, Postings)> =
            freqs.keys().filter_map(|word| self.word_to_docs.remove_entry(word)).collect();
        detached.par_iter_mut().for_each(|(_, postings)| {
            postings.remove(&id);
        });
        self.word_to_docs.extend(detached.into_iter().filter(|(_, postings)| !postings.is_empty()));
        true
    }

    /// Check that both maps mirror each other exactly.
    pub fn is_consistent(&self) -> bool {
        let forward = self.word_to_docs.iter().all(|(word, postings)| {
            !postings.is_empty()
                && postings.iter().all(|(id, tf)| {
                    self.doc_to_words.get(id).and_then(|f| f.get(word)) == Some(tf)
                })
        });
        let backward = self.doc_to_words.iter().all(|(id, freqs)| {
            self.documents.contains_key(id)
                && freqs.iter().all(|(word, tf)| {
                    self.word_to_docs.get(word).and_then(|p| p.get(id)) == Some(tf)
                })
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> DocumentData { DocumentData { rating: 1, status: DocumentStatus::Actual } }

    #[test]
    fn insert_fills_both_directions() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["big", "dog", "big"], data());
        assert!(index.is_consistent());
        let freqs = index.word_frequencies(1);
        assert!((freqs["big"] - 2.0 / 3.0).abs() < 1e-9);
        assert!((freqs["dog"] - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(index.postings("dog").map(|p| p.len()), Some(1));
    }

    #[test]
    fn words_are_interned_once() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["dog"], data());
        index.insert(2, &["dog"], data());
        let a = index.word_frequencies(1).keys().next().unwrap();
        let b = index.word_frequencies(2).keys().next().unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn removal_drops_empty_posting_lists() {
        for parallel in [false, true] {
            let mut index = InvertedIndex::new();
            index.insert(1, &["cat", "city"], data());
            index.insert(2, &["dog", "city"], data());
            let removed = if parallel { index.remove_parallel(1) } else { index.remove(1) };
            assert!(removed);
            assert!(index.postings("cat").is_none());
            assert_eq!(index.postings("city").map(|p| p.len()), Some(1));
            assert!(index.word_frequencies(1).is_empty());
            assert_eq!(index.document_ids().collect::<Vec<_>>(), vec![2]);
            assert!(index.is_consistent());
        }
    }

    #[test]
    fn removing_absent_id_is_a_no_op() {
        let mut index = InvertedIndex::new();
        index.insert(1, &["cat"], data());
        assert!(!index.remove(5));
        assert!(!index.remove_parallel(5));
        assert_eq!(index.document_count(), 1);
    }

    #[test]
    fn wordless_document_is_still_counted() {
        let mut index = InvertedIndex::new();
        index.insert(3, &[], data());
        assert_eq!(index.document_count(), 1);
        assert_eq!(index.word_count(), 0);
        assert!(index.remove(3));
        assert_eq!(index.document_count(), 0);
    }
}
