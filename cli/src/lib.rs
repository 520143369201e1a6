pub mod batch;
pub mod duplicates;
pub mod loader;
pub mod paginator;
pub mod request_queue;

pub use batch::{process_queries, process_queries_joined};
pub use duplicates::{find_duplicates, remove_duplicates};
pub use loader::{build_server, load_documents, InputDoc};
pub use paginator::{paginate, Page};
pub use request_queue::RequestQueue;
