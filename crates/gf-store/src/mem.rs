//! In-memory store backing the test suites.

use crate::{ObjectStore, StoreError, StoreResult, compile_glob};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct Blob {
    bytes: Vec<u8>,
    content_type: String,
}

/// Thread-safe map of blob path to contents.
#[derive(Default)]
pub struct MemStore {
    blobs: Mutex<BTreeMap<String, Blob>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .map(|blob| blob.content_type.clone())
    }

    pub fn get_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .map(|blob| blob.bytes.clone())
    }
}

impl ObjectStore for MemStore {
    fn list(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let matcher = compile_glob(pattern)?;
        let blobs = self.blobs.lock().unwrap();
        Ok(blobs
            .keys()
            .filter(|path| matcher.is_match(path))
            .cloned()
            .collect())
    }

    fn models(&self) -> StoreResult<Vec<String>> {
        let blobs = self.blobs.lock().unwrap();
        let names: BTreeSet<String> = blobs
            .keys()
            .filter_map(|path| path.split_once('/'))
            .map(|(model, _)| model.to_string())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn get_json(&self, path: &str) -> StoreResult<Value> {
        if !path.ends_with(".json") {
            return Err(StoreError::NotJsonPath {
                path: path.to_string(),
            });
        }
        let bytes = self.get_bytes(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: path.to_string(),
            source,
        })
    }

    fn put_bytes(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()> {
        let blob = Blob {
            bytes,
            content_type: content_type.to_string(),
        };
        self.blobs.lock().unwrap().insert(path.to_string(), blob);
        Ok(())
    }

    fn delete_if_exists(&self, path: &str) -> StoreResult<()> {
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}
