use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};

/// Parsed query. Words borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

impl Query<'_> {
    pub fn is_empty(&self) -> bool { self.plus_words.is_empty() && self.minus_words.is_empty() }
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
}

fn parse_query_word(word: &str) -> Result<QueryWord<'_>> {
    let (data, is_minus) = match word.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (word, false),
    };
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        return Err(SearchError::InvalidQueryWord(word.to_string()));
    }
    Ok(QueryWord { data, is_minus })
}

/// Split raw query text into plus and minus words. Stop words are dropped
/// from both sides. With `purge`, each side is sorted and deduplicated;
/// without it, words keep their query order.
pub fn parse_query<'q>(text: &'q str, stop_words: &StopWords, purge: bool) -> Result<Query<'q>> {
    let mut query = Query::default();
    for token in split_into_words(text) {
        let word = parse_query_word(token)?;
        if stop_words.contains(word.data) {
            continue;
        }
        if word.is_minus {
            query.minus_words.push(word.data);
        } else {
            query.plus_words.push(word.data);
        }
    }
    if purge {
        for words in [&mut query.plus_words, &mut query.minus_words] {
            words.sort_unstable();
            words.dedup();
        }
    }
    Ok(query)
}
