use std::sync::Arc;

use crate::models::GenreTaxonomy;

/// Session-lifetime holder of the genre taxonomy
///
/// Owned by whichever component last refreshed it. Readers take a snapshot so
/// projection never observes a half-applied replacement.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyCache {
    current: Arc<GenreTaxonomy>,
}

impl TaxonomyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly fetched taxonomy, discarding the previous one entirely
    pub fn replace(&mut self, taxonomy: GenreTaxonomy) {
        tracing::debug!(
            previous = self.current.len(),
            genres = taxonomy.len(),
            "Taxonomy cache replaced"
        );
        self.current = Arc::new(taxonomy);
    }

    pub fn snapshot(&self) -> Arc<GenreTaxonomy> {
        Arc::clone(&self.current)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
