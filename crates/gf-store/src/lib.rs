//! gf-store: object-store contract and local backends.
//!
//! Blob paths are bucket-relative, `/`-separated strings. Listing uses glob
//! patterns where `*` never crosses a `/` and `{a,b}` alternation is
//! supported, matching the semantics of hosted object stores.

pub mod fs;
pub mod mem;

pub use fs::FsStore;
pub use mem::MemStore;

use serde_json::Value;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("No blob at path {path}")]
    NotFound { path: String },

    #[error("expected a .json path, got {path}")]
    NotJsonPath { path: String },

    #[error("JSON error at {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Blob storage as the rest of the pipeline sees it.
///
/// Implementations must be safe to share across worker threads; every method
/// takes `&self`.
pub trait ObjectStore: Send + Sync {
    /// All blob paths matching `pattern`, sorted.
    fn list(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Top-level model names present in the store, sorted.
    fn models(&self) -> StoreResult<Vec<String>>;

    /// Download and parse a JSON blob. The path must end in `.json`.
    fn get_json(&self, path: &str) -> StoreResult<Value>;

    /// Upload raw bytes with an explicit content type.
    fn put_bytes(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()>;

    /// Delete a blob, silently doing nothing when it is already absent.
    fn delete_if_exists(&self, path: &str) -> StoreResult<()>;

    /// Serialize `value` and upload it as `application/json`.
    fn put_json(&self, path: &str, value: &Value) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_string(),
            source,
        })?;
        self.put_bytes(path, bytes, JSON_CONTENT_TYPE)
    }
}

pub(crate) fn compile_glob(pattern: &str) -> StoreResult<globset::GlobMatcher> {
    let glob = globset::GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| StoreError::BadPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}
