use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod display;
pub mod request;
pub mod vibe;

pub use display::DisplayModel;
pub use request::{Endpoint, ListQuery, MovieList, PageRequest, SortOrder};
pub use vibe::{ResolvedRecommendation, VibeCandidate, VibeStage};

/// A movie record as returned by the catalog API
///
/// Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    /// Ordered genre ids, resolved against the taxonomy at projection time
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Opaque reference handed to the image loader
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

/// One page of a paginated catalog response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Genre id to genre name lookup table
///
/// Replaced wholesale on every successful fetch, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreTaxonomy {
    names: HashMap<u32, String>,
}

impl GenreTaxonomy {
    pub fn new(names: HashMap<u32, String>) -> Self {
        Self { names }
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for GenreTaxonomy {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Result of a successful catalog/taxonomy join
///
/// Transient: consumed into display models straight away.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPage {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub total_pages: u32,
}

impl From<Page<CatalogItem>> for AggregatedPage {
    fn from(page: Page<CatalogItem>) -> Self {
        Self {
            items: page.results,
            page: page.page,
            // An empty result set reports zero pages; the cursor never goes below one
            total_pages: page.total_pages.max(1),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenreList {
    pub genres: Vec<ApiGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenre {
    pub id: u32,
    pub name: String,
}

impl From<ApiGenreList> for GenreTaxonomy {
    fn from(list: ApiGenreList) -> Self {
        list.genres.into_iter().map(|g| (g.id, g.name)).collect()
    }
}
