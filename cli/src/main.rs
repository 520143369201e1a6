use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use search_cli::{
    build_server, load_documents, paginate, process_queries, remove_duplicates, RequestQueue,
};
use search_core::{DocId, DocumentStatus, EngineOptions, ExecutionPolicy};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Query an in-memory TF-IDF index built from JSON documents", long_about = None)]
struct Cli {
    /// Documents to index (.json array/object or .jsonl)
    #[arg(long)]
    docs: PathBuf,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Use the parallel execution policy
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Maximum results per query
    #[arg(long, default_value_t = search_core::server::MAX_RESULT_DOCUMENT_COUNT)]
    max_results: usize,
    /// Shards used by parallel ranking
    #[arg(long, default_value_t = search_core::server::DEFAULT_SHARD_COUNT)]
    shards: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
        /// Print results in pages of this size
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Print the query words found in one document
    Match { query: String, id: DocId },
    /// Remove documents that repeat another document's words
    Dedup,
    /// Run several queries at once
    Batch { queries: Vec<String> },
    /// Replay queries from a file (one per line) and report empty results
    Replay { file: PathBuf },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let docs = load_documents(&cli.docs)?;
    let options = EngineOptions {
        max_results: cli.max_results,
        shard_count: cli.shards,
        ..EngineOptions::default()
    };
    let mut server = build_server(&docs, &cli.stop_words, options)?;
    let policy = if cli.parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };

    match cli.command {
        Commands::Search { query, status, page_size } => {
            let status = DocumentStatus::from(status);
            let with_status = move |_: DocId, s: DocumentStatus, _: i32| s == status;
            let found = server.find_top_documents_with(policy, &query, with_status)?;
            match page_size {
                Some(size) => {
                    for (n, page) in paginate(&found, size).iter().enumerate() {
                        println!("page {}: {page}", n + 1);
                    }
                }
                None => {
                    for doc in &found {
                        println!("{}", serde_json::to_string(doc)?);
                    }
                }
            }
        }
        Commands::Match { query, id } => {
            let (words, status) = server.match_document_with(policy, &query, id)?;
            println!("{}", serde_json::json!({ "id": id, "words": words, "status": status }));
        }
        Commands::Dedup => {
            let removed = remove_duplicates(&mut server);
            let remaining = server.document_count();
            println!("{}", serde_json::json!({ "removed": removed, "remaining": remaining }));
        }
        Commands::Batch { queries } => {
            for (query, found) in queries.iter().zip(process_queries(&server, &queries)?) {
                println!("{}", serde_json::json!({ "query": query, "results": found }));
            }
        }
        Commands::Replay { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut queue = RequestQueue::new(&server);
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                if let Err(e) = queue.add_find_request(line) {
                    tracing::warn!(query = line, error = %e, "skipping query");
                }
            }
            println!("{}", serde_json::json!({ "no_result_requests": queue.no_result_requests() }));
        }
    }
    tracing::info!("done");
    Ok(())
}
