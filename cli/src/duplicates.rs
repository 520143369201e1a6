use search_core::{DocId, SearchServer};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Ids of documents whose set of distinct words equals that of a lower id.
pub fn find_duplicates(server: &SearchServer) -> Vec<DocId> {
    let mut first_seen: BTreeMap<BTreeSet<&str>, DocId> = BTreeMap::new();
    let mut duplicates = Vec::new();
    for id in server {
        let words: BTreeSet<&str> = server.word_frequencies(id).keys().map(|w| &**w).collect();
        if first_seen.contains_key(&words) {
            duplicates.push(id);
        } else {
            first_seen.insert(words, id);
        }
    }
    duplicates
}

/// Remove every duplicate, keeping the lowest id of each group.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let duplicates = find_duplicates(server);
    for &id in &duplicates {
        server.remove_document(id);
        info!(id, "Found duplicate document id");
    }
    duplicates
}
