//! Cached loading of external path descriptions.

use crate::svg_path::{ParsedPath, PathParser};
use jetplot_core::{PathSource, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches path data through a [`PathSource`] and parses it once per
/// reference.
///
/// Only successful parses are cached; a failed fetch or parse is retried
/// on the next request.
pub struct PathLoader {
    source: Arc<dyn PathSource>,
    parser: PathParser,
    cache: RwLock<HashMap<String, Arc<ParsedPath>>>,
}

impl PathLoader {
    pub fn new(source: Arc<dyn PathSource>, parser: PathParser) -> Self {
        Self {
            source,
            parser,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn parser(&self) -> &PathParser {
        &self.parser
    }

    /// Returns the parsed path for `reference`, fetching it on first use.
    pub async fn load(&self, reference: &str) -> Result<Arc<ParsedPath>> {
        if let Some(parsed) = self.cached(reference) {
            tracing::debug!("Path cache hit: {}", reference);
            return Ok(parsed);
        }

        let data = self.source.fetch_path_data(reference).await?;
        let parsed = Arc::new(self.parser.parse(&data)?);
        tracing::debug!(
            "Loaded path '{}' ({} point(s))",
            reference,
            parsed.point_count()
        );

        self.cache
            .write()
            .insert(reference.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn cached(&self, reference: &str) -> Option<Arc<ParsedPath>> {
        self.cache.read().get(reference).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }
}

impl std::fmt::Debug for PathLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathLoader")
            .field("parser", &self.parser)
            .field("cached", &self.cache_len())
            .finish()
    }
}
