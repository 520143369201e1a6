use crate::error::{Result, SearchError};
use std::collections::BTreeSet;

/// Split text on the space character, skipping empty pieces.
/// The iterator is lazy and cheap to clone, so it can be walked again.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> + Clone {
    text.split(' ').filter(|w| !w.is_empty())
}

/// A word is valid when it holds no control characters (codes 0..=31).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Case-sensitive stop words, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build from any collection of words. Empty entries are dropped and
    /// duplicates collapse; a word with control characters is rejected.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from a space-delimited string.
    pub fn parse(text: &str) -> Result<Self> { Self::new(split_into_words(text)) }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }
    pub fn len(&self) -> usize { self.words.len() }
    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}
