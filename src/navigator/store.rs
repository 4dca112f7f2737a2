//! Document storage: the store contract and the line-delimited JSON backend.

use bevy::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::annotation::record::{parse_line, to_line};
use crate::annotation::Document;

#[derive(Debug, Error)]
/// Errors produced while reading or writing a document collection.
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    /// Reading or writing the collection file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not serialize document '{id}': {source}")]
    /// A document could not be turned back into a record line.
    Serialize {
        id: String,
        source: serde_json::Error,
    },

    #[error("unknown document '{0}'")]
    /// No document in the collection has this id.
    UnknownDocument(String),

    #[error("no readable documents in {0:?}")]
    /// Every line of the file was blank or malformed.
    Empty(PathBuf),
}

/// Persistence contract the navigator relies on
pub trait DocumentStore {
    /// Document ids in collection order
    fn list_document_ids(&self) -> Vec<String>;

    fn load_document(&self, id: &str) -> Result<Document, StoreError>;

    /// Persist one document. On error the store is left as it was.
    fn save_document(&mut self, document: &Document) -> Result<(), StoreError>;
}

/// A collection backed by one JSONL file, held fully in memory
#[derive(Debug, Clone, Default)]
pub struct JsonlStore {
    path: PathBuf,
    documents: Vec<Document>,
    skipped_lines: usize,
}

impl JsonlStore {
    /// Read and parse a collection file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let store = Self::parse(path, &contents);
        if store.documents.is_empty() {
            return Err(StoreError::Empty(store.path));
        }
        Ok(store)
    }

    /// Parse collection text, skipping blank and malformed lines
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Self {
        let path = path.into();
        let mut documents: Vec<Document> = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut skipped_lines = 0;

        for (line_number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line, documents.len()) {
                Ok(mut document) => {
                    if !seen_ids.insert(document.id.clone()) {
                        let unique = unique_id(&document.id, &seen_ids);
                        warn!(
                            "Line {} of {:?} repeats document id '{}', shown as '{}'",
                            line_number + 1,
                            path,
                            document.id,
                            unique
                        );
                        seen_ids.insert(unique.clone());
                        document.id = unique;
                    }
                    documents.push(document);
                }
                Err(e) => {
                    warn!("Skipping line {} of {:?}: {}", line_number + 1, path, e);
                    skipped_lines += 1;
                }
            }
        }

        info!(
            "Parsed {} documents from {:?} ({} lines skipped)",
            documents.len(),
            path,
            skipped_lines
        );

        Self {
            path,
            documents,
            skipped_lines,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| StoreError::UnknownDocument(id.to_string()))
    }

    /// Replace a document in memory only
    pub fn stage(&mut self, document: &Document) -> Result<(), StoreError> {
        let index = self.position(&document.id)?;
        self.documents[index] = document.clone();
        Ok(())
    }
}

/// `id` with the first free `#n` suffix
fn unique_id(id: &str, taken: &HashSet<String>) -> String {
    (2..)
        .map(|n| format!("{}#{}", id, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| id.to_string())
}

impl DocumentStore for JsonlStore {
    fn list_document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    fn load_document(&self, id: &str) -> Result<Document, StoreError> {
        let index = self.position(id)?;
        Ok(self.documents[index].clone())
    }

    fn save_document(&mut self, document: &Document) -> Result<(), StoreError> {
        let index = self.position(&document.id)?;

        let contents = render(
            self.documents
                .iter()
                .enumerate()
                .map(|(i, d)| if i == index { document } else { d }),
        )?;
        write_atomically(&self.path, &contents)?;

        // Only commit in memory once the file is written
        self.documents[index] = document.clone();
        Ok(())
    }
}

fn render<'a>(documents: impl Iterator<Item = &'a Document>) -> Result<String, StoreError> {
    let mut contents = String::new();
    for document in documents {
        let line = to_line(document).map_err(|source| StoreError::Serialize {
            id: document.id.clone(),
            source,
        })?;
        contents.push_str(&line);
        contents.push('\n');
    }
    Ok(contents)
}

/// Write to a sibling temp file and rename it over the target
fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    std::fs::write(&temp, contents).map_err(io_error)?;
    std::fs::rename(&temp, path).map_err(io_error)?;
    info!("Saved collection to {:?}", path);
    Ok(())
}
