use rayon::prelude::*;
use search_core::{Document, Result, SearchServer};

/// Run every query on the rayon pool. Results keep the order of `queries`;
/// the first failing query fails the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries.par_iter().map(|q| server.find_top_documents(q.as_ref())).collect()
}

/// Like [`process_queries`], flattened into one list.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
