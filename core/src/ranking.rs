//! TF-IDF ranking over the inverted index.
//!
//! Relevance of a document is the sum, over every plus word it contains,
//! of `tf * ln(N / df)`. Any minus word present in the document removes it
//! from the result no matter how it scored.

use crate::concurrent_map::ConcurrentMap;
use crate::document::{Document, DocumentStatus};
use crate::index::{DocId, InvertedIndex};
use crate::query::Query;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

/// Filter applied to every candidate: `(id, status, rating) -> keep`.
pub trait DocumentPredicate: Fn(DocId, DocumentStatus, i32) -> bool + Sync {}

impl<F> DocumentPredicate for F where F: Fn(DocId, DocumentStatus, i32) -> bool + Sync {}

fn keep<P: DocumentPredicate>(index: &InvertedIndex, id: DocId, predicate: &P) -> bool {
    index.document(id).is_some_and(|d| predicate(id, d.status, d.rating))
}

fn collect_documents(index: &InvertedIndex, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
    relevance
        .into_iter()
        .filter_map(|(id, rel)| index.document(id).map(|d| Document::new(id, rel, d.rating)))
        .collect()
}

/// Single-threaded scoring, strict left-to-right over the query words.
pub fn find_all_documents<P: DocumentPredicate>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
) -> Vec<Document> {
    let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
    for &word in &query.plus_words {
        let Some(postings) = index.postings(word) else { continue };
        let idf = index.inverse_document_freq(postings.len());
        for (&id, &tf) in postings {
            if keep(index, id, predicate) {
                *relevance.entry(id).or_insert(0.0) += tf * idf;
            }
        }
    }
    for &word in &query.minus_words {
        let Some(postings) = index.postings(word) else { continue };
        for id in postings.keys() {
            relevance.remove(id);
        }
    }
    collect_documents(index, relevance)
}

/// Fork-join scoring: plus words and their posting lists are scored on the
/// rayon pool, contributions meet in a sharded accumulator.
///
/// Minus words run only after every plus-word contribution has joined.
pub fn par_find_all_documents<P: DocumentPredicate>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    shard_count: usize,
) -> Vec<Document> {
    let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(shard_count);
    query.plus_words.par_iter().for_each(|&word| {
        let Some(postings) = index.postings(word) else { return };
        let idf = index.inverse_document_freq(postings.len());
        postings.par_iter().for_each(|(&id, &tf)| {
            if keep(index, id, predicate) {
                *relevance.access(id) += tf * idf;
            }
        });
    });
    query.minus_words.par_iter().for_each(|&word| {
        let Some(postings) = index.postings(word) else { return };
        postings.par_iter().for_each(|(&id, _)| {
            relevance.erase(id);
        });
    });
    collect_documents(index, relevance.into_map())
}

/// Descending relevance, a total order.
fn by_relevance(lhs: &Document, rhs: &Document) -> Ordering {
    rhs.relevance.total_cmp(&lhs.relevance)
}

/// Expects `documents` sorted by descending relevance. Runs of neighbours
/// within `epsilon` of the run's first entry count as ties and are
/// reordered by descending rating, keeping their relative order otherwise.
fn break_ties_by_rating(documents: &mut [Document], epsilon: f64) {
    let mut start = 0;
    while start < documents.len() {
        let head = documents[start].relevance;
        let len = documents[start..]
            .iter()
            .take_while(|d| (head - d.relevance).abs() < epsilon)
            .count()
            .max(1);
        documents[start..start + len].sort_by_key(|d| Reverse(d.rating));
        start += len;
    }
}

pub fn top_documents(mut documents: Vec<Document>, limit: usize, epsilon: f64) -> Vec<Document> {
    documents.sort_by(by_relevance);
    break_ties_by_rating(&mut documents, epsilon);
    documents.truncate(limit);
    documents
}

pub fn par_top_documents(
    mut documents: Vec<Document>,
    limit: usize,
    epsilon: f64,
) -> Vec<Document> {
    documents.par_sort_by(by_relevance);
    break_ties_by_rating(&mut documents, epsilon);
    documents.truncate(limit);
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DocumentData;

    fn corpus() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        let actual = |rating| DocumentData { rating, status: DocumentStatus::Actual };
        index.insert(1, &["white", "cat", "fashionable", "collar"], actual(2));
        index.insert(2, &["fluffy", "cat", "fluffy", "tail"], actual(5));
        index.insert(3, &["groomed", "dog", "expressive", "eyes"], actual(-1));
        let banned = DocumentData { rating: 9, status: DocumentStatus::Banned };
        index.insert(4, &["groomed", "starling", "eugene"], banned);
        index
    }

    fn query<'a>(plus: &[&'a str], minus: &[&'a str]) -> Query<'a> {
        Query { plus_words: plus.to_vec(), minus_words: minus.to_vec() }
    }

    fn by_id(docs: &[Document]) -> BTreeMap<DocId, f64> {
        docs.iter().map(|d| (d.id, d.relevance)).collect()
    }

    #[test]
    fn accumulates_tf_idf() {
        let index = corpus();
        let all = |_: DocId, _: DocumentStatus, _: i32| true;
        let docs = find_all_documents(&index, &query(&["fluffy", "cat"], &[]), &all);
        let scores = by_id(&docs);
        let cat_idf = (4.0f64 / 2.0).ln();
        let fluffy_idf = (4.0f64 / 1.0).ln();
        assert!((scores[&1] - 0.25 * cat_idf).abs() < 1e-9);
        assert!((scores[&2] - (0.5 * fluffy_idf + 0.25 * cat_idf)).abs() < 1e-9);
    }

    #[test]
    fn minus_words_exclude_and_predicate_filters() {
        let index = corpus();
        let actual = |_: DocId, s: DocumentStatus, _: i32| s == DocumentStatus::Actual;
        let docs = find_all_documents(&index, &query(&["groomed", "cat"], &["tail"]), &actual);
        let ids: Vec<DocId> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let index = corpus();
        let all = |_: DocId, _: DocumentStatus, _: i32| true;
        let q = query(&["groomed", "cat", "fluffy", "eyes", "nothing"], &["collar"]);
        let seq = by_id(&find_all_documents(&index, &q, &all));
        let par = by_id(&par_find_all_documents(&index, &q, &all, 3));
        assert_eq!(seq.keys().collect::<Vec<_>>(), par.keys().collect::<Vec<_>>());
        for (id, rel) in &seq {
            assert!((rel - par[id]).abs() < 1e-6);
        }
    }

    #[test]
    fn ties_break_on_rating_and_list_is_truncated() {
        let docs = vec![
            Document::new(1, 0.5, 1),
            Document::new(2, 0.5 + 1e-9, 7),
            Document::new(3, 0.9, 0),
            Document::new(4, 0.1, 100),
        ];
        let top = top_documents(docs.clone(), 3, 1e-6);
        assert_eq!(top.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(par_top_documents(docs, 3, 1e-6), top);
    }

    #[test]
    fn near_ties_in_a_chain_sort_without_panicking() {
        // relevances 0.6e-6 apart: neighbours tie, but not transitively
        let mut docs: Vec<Document> = (0..100)
            .map(|i| Document::new(i, 0.5 + i as f64 * 0.6e-6, i * 37 % 7))
            .collect();
        // deterministic shuffle
        for i in (1..docs.len()).rev() {
            docs.swap(i, (i * 7919 + 13) % (i + 1));
        }
        let full = top_documents(docs.clone(), docs.len(), 1e-6);
        assert_eq!(full.len(), 100);
        assert_eq!(par_top_documents(docs.clone(), docs.len(), 1e-6), full);

        // each tie group starts within epsilon and is ordered by rating
        let mut start = 0;
        while start < full.len() {
            let head = full[start].relevance;
            let mut end = start + 1;
            while end < full.len() && (head - full[end].relevance).abs() < 1e-6 {
                assert!(full[end - 1].rating >= full[end].rating);
                end += 1;
            }
            if end < full.len() {
                assert!(head - full[end].relevance >= 1e-6);
            }
            start = end;
        }
        assert_eq!(top_documents(docs, 5, 1e-6), full[..5].to_vec());
    }
}
