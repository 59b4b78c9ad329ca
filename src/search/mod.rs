//! Search module - substring search over a Markdown/plain-text corpus / 搜索模块
//!
//! Architecture / 架构：
//! - context: bounded window around one match (pure function)
//! - scanner: walks the content root, exhaustive overlapping search per file
//! - cache: read-only snippets loaded once from a flat JSON snapshot
//! - coordinator: cache first, live scan on a complete miss
//!
//! Nothing in here is mutated by a request; every search builds a fresh result.

pub mod cache;
pub mod content_root;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod scanner;
pub mod schema;

pub use cache::{derive_file_id, CacheSnapshot, CacheStore};
pub use content_root::resolve_content_root;
pub use context::extract_context;
pub use coordinator::{DocumentSearch, SearchCoordinator, SnippetCache};
pub use error::SearchError;
pub use scanner::{DocumentScanner, FileScan, ScanCancel};
pub use schema::{FileResultSet, SearchOutcome, SearchSource};
