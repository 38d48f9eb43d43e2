//! External path data retrieval
//!
//! Path descriptions live outside the process (files, embedded assets, a
//! web service). The core only sees them through [`PathSource`]; caching
//! of parsed results is the loader's job, not the source's.

use crate::error::SourceError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Retrieves raw path-grammar strings by reference.
///
/// Implementations must be idempotent: the same reference always yields
/// the same data, so callers may cache results.
#[async_trait]
pub trait PathSource: Send + Sync {
    async fn fetch_path_data(&self, reference: &str) -> Result<String, SourceError>;
}

/// Reads path data from the file system.
///
/// A reference is a path relative to `root`. SVG documents contribute the
/// `d` attributes of their `<path>` elements; any other file is taken as
/// raw path data.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl PathSource for FileSource {
    async fn fetch_path_data(&self, reference: &str) -> Result<String, SourceError> {
        let path = self.root.join(reference);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    reference: reference.to_string(),
                }
            } else {
                SourceError::Read {
                    reference: reference.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if content.contains("<svg") {
            let data = extract_svg_path_data(&content);
            tracing::debug!(
                "Extracted {} <path> element(s) from {}",
                data.len(),
                path.display()
            );
            if data.is_empty() {
                return Err(SourceError::Read {
                    reference: reference.to_string(),
                    reason: "SVG document contains no <path> elements".to_string(),
                });
            }
            return Ok(data.join(" "));
        }

        Ok(content)
    }
}

/// Serves path data from memory. Useful for embedded assets and tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: RwLock<HashMap<String, String>>,
    fetches: RwLock<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, reference: impl Into<String>, data: impl Into<String>) -> Self {
        self.insert(reference, data);
        self
    }

    pub fn insert(&self, reference: impl Into<String>, data: impl Into<String>) {
        self.entries.write().insert(reference.into(), data.into());
    }

    /// Number of fetches served so far, successful or not.
    pub fn fetch_count(&self) -> usize {
        *self.fetches.read()
    }
}

#[async_trait]
impl PathSource for MemorySource {
    async fn fetch_path_data(&self, reference: &str) -> Result<String, SourceError> {
        *self.fetches.write() += 1;
        self.entries
            .read()
            .get(reference)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                reference: reference.to_string(),
            })
    }
}

/// Returns the `d` attribute of every `<path>` element in document order.
pub fn extract_svg_path_data(svg_content: &str) -> Vec<String> {
    let mut data = Vec::new();
    let mut search_pos = 0;

    while let Some(path_start) = svg_content[search_pos..].find("<path") {
        let abs_path_start = search_pos + path_start;
        let Some(path_end) = svg_content[abs_path_start..].find('>') else {
            break;
        };
        let tag = &svg_content[abs_path_start..abs_path_start + path_end];

        if let Some(d) = extract_attr_str(tag, "d") {
            let trimmed = d.trim();
            if !trimmed.is_empty() {
                data.push(trimmed.to_string());
            }
        }

        search_pos = abs_path_start + path_end + 1;
    }

    data
}

fn extract_attr_str<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(found) = tag[from..].find(attr) {
        let start = from + found;
        let after = start + attr.len();
        // Require whitespace before the name so `id="..."` does not match `d`.
        let separated = tag[..start]
            .chars()
            .last()
            .is_some_and(|c| c.is_whitespace());
        let rest = &tag[after..];

        if separated && rest.starts_with('=') {
            let quote = rest[1..].chars().next()?;
            if quote == '"' || quote == '\'' {
                let val_start = after + 2;
                let end = tag[val_start..].find(quote)?;
                return Some(&tag[val_start..val_start + end]);
            }
        }
        from = after;
    }
    None
}
