use anyhow::{Context, Result};
use search_core::{DocId, DocumentStatus, EngineOptions, SearchServer};
use search_core::tokenizer::StopWords;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// Read documents from a `.jsonl` file (one object per line) or a `.json`
/// file holding either an array of objects or a single object.
pub fn load_documents(path: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(f);
    if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let doc: InputDoc = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}", path.display(), n + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<InputDoc>, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(docs)
}

/// Index every document; the first rejected document aborts the build.
pub fn build_server(
    docs: &[InputDoc],
    stop_words: &str,
    options: EngineOptions,
) -> Result<SearchServer> {
    let stop_words = StopWords::parse(stop_words).context("invalid stop words")?;
    let mut server = SearchServer::with_options(stop_words, options);
    for doc in docs {
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("indexing document {}", doc.id))?;
    }
    tracing::info!(
        num_docs = server.document_count(),
        num_terms = server.index().word_count(),
        "ingested documents"
    );
    Ok(server)
}
