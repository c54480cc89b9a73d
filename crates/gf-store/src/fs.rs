//! Filesystem-backed store rooted at a local directory.

use crate::{ObjectStore, StoreError, StoreResult, compile_glob};
use globset::GlobMatcher;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maps blob paths onto files under a root directory. Local files carry no
/// content-type metadata, so the content type passed to uploads is dropped.
#[derive(Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }
        Ok(Self { root })
    }

    fn blob_file(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

fn visit(dir: &Path, prefix: &str, matcher: &GlobMatcher, out: &mut Vec<String>) -> StoreResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let path = entry.path();
        if path.is_dir() {
            visit(&path, &rel, matcher, out)?;
        } else if matcher.is_match(&rel) {
            out.push(rel);
        }
    }
    Ok(())
}

impl ObjectStore for FsStore {
    fn list(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let matcher = compile_glob(pattern)?;
        let mut out = Vec::new();
        visit(&self.root, "", &matcher, &mut out)?;
        out.sort();
        Ok(out)
    }

    fn models(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn get_json(&self, path: &str) -> StoreResult<Value> {
        if !path.ends_with(".json") {
            return Err(StoreError::NotJsonPath {
                path: path.to_string(),
            });
        }
        let bytes = match fs::read(self.blob_file(path)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: path.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: path.to_string(),
            source,
        })
    }

    fn put_bytes(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> StoreResult<()> {
        let file = self.blob_file(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(file, bytes)?;
        Ok(())
    }

    fn delete_if_exists(&self, path: &str) -> StoreResult<()> {
        match fs::remove_file(self.blob_file(path)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
