/// Boundary collaborators consumed by the aggregation engine
///
/// Every component receives these as `Arc<dyn Trait>` at construction, so the
/// catalog API, the generative text service and the session source can be
/// swapped for fakes in tests.
use crate::{
    error::CatalogResult,
    models::{CatalogItem, GenreTaxonomy, Page, PageRequest},
};

pub mod gemini;
pub mod session;
pub mod tmdb;

pub use gemini::GeminiClient;
pub use session::StaticSession;
pub use tmdb::TmdbClient;

/// Remote movie catalog
///
/// Implementations are stateless with respect to callers and are safe to call
/// concurrently from several fan-out branches.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch one page of catalog items for the given endpoint
    async fn fetch_page(&self, request: &PageRequest) -> CatalogResult<Page<CatalogItem>>;

    /// Fetch the complete genre taxonomy
    async fn fetch_genres(&self) -> CatalogResult<GenreTaxonomy>;
}

/// Generative text service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw response text; callers parse it themselves
    async fn generate(&self, prompt: &str) -> CatalogResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// An authenticated user session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub account_id: String,
}

/// Supplies the session required by authenticated endpoints
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
}

/// Loads raw image bytes for an opaque poster reference
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, poster_path: &str) -> CatalogResult<Vec<u8>>;
}
