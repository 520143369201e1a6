use std::fmt;
use std::ops::Deref;

/// One page of a result list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T>(pub &'a [T]);

impl<T> Deref for Page<'_, T> {
    type Target = [T];
    fn deref(&self) -> &[T] { self.0 }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Split `items` into consecutive pages of `page_size`; the last page may be
/// shorter. A zero page size yields no pages.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<Page<'_, T>> {
    if page_size == 0 {
        return Vec::new();
    }
    items.chunks(page_size).map(Page).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_core::Document;

    #[test]
    fn last_page_holds_the_remainder() {
        let items = [1, 2, 3, 4, 5];
        let pages = paginate(&items, 2);
        assert_eq!(pages.len(), 3);
        assert_eq!(&*pages[0], &[1, 2]);
        assert_eq!(&*pages[2], &[5]);
        assert!(paginate(&items, 0).is_empty());
        assert!(paginate::<i32>(&[], 3).is_empty());
    }

    #[test]
    fn page_prints_its_documents() {
        let docs = [Document::new(1, 0.5, 2), Document::new(3, 0.25, -1)];
        let pages = paginate(&docs, 2);
        assert_eq!(
            pages[0].to_string(),
            concat!(
                "{ document_id = 1, relevance = 0.5, rating = 2 }",
                "{ document_id = 3, relevance = 0.25, rating = -1 }"
            )
        );
    }
}
