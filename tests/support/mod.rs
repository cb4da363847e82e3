#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use vibe_catalog::{
    error::{CatalogError, CatalogResult},
    models::{CatalogItem, Endpoint, GenreTaxonomy, Page, PageRequest},
    services::providers::{CatalogTransport, ImageLoader, TextGenerator},
};

pub fn movie(id: u64, title: &str, year: i32, genre_ids: Vec<u32>) -> CatalogItem {
    CatalogItem {
        id,
        title: title.to_string(),
        release_date: Some(format!("{}-06-01", year)),
        vote_average: 7.5,
        genre_ids,
        poster_path: Some(format!("/{}.jpg", id)),
        overview: None,
    }
}

struct SearchReply {
    delay: Duration,
    result: CatalogResult<Vec<CatalogItem>>,
}

/// In-memory catalog with per-title search latency
///
/// Records the order in which searches complete so tests can prove output
/// order is independent of completion order.
#[derive(Default)]
pub struct FakeCatalog {
    genres: Option<GenreTaxonomy>,
    list_pages: Vec<Vec<CatalogItem>>,
    rated: Option<Vec<CatalogItem>>,
    searches: HashMap<String, SearchReply>,
    completions: Mutex<Vec<String>>,
    page_requests: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genres(mut self, genres: &[(u32, &str)]) -> Self {
        self.genres = Some(
            genres
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_list_page(mut self, items: Vec<CatalogItem>) -> Self {
        self.list_pages.push(items);
        self
    }

    pub fn with_rated(mut self, items: Vec<CatalogItem>) -> Self {
        self.rated = Some(items);
        self
    }

    pub fn with_search(mut self, title: &str, delay_ms: u64, results: Vec<CatalogItem>) -> Self {
        self.searches.insert(
            title.to_string(),
            SearchReply {
                delay: Duration::from_millis(delay_ms),
                result: Ok(results),
            },
        );
        self
    }

    pub fn with_failing_search(mut self, title: &str, delay_ms: u64) -> Self {
        self.searches.insert(
            title.to_string(),
            SearchReply {
                delay: Duration::from_millis(delay_ms),
                result: Err(CatalogError::Transport(format!("search for {} failed", title))),
            },
        );
        self
    }

    pub fn completions(&self) -> Vec<String> {
        self.completions.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    fn page(results: Vec<CatalogItem>, page: u32, total_pages: u32) -> Page<CatalogItem> {
        Page {
            page,
            total_results: results.len() as u32,
            results,
            total_pages,
        }
    }
}

#[async_trait::async_trait]
impl CatalogTransport for FakeCatalog {
    async fn fetch_page(&self, request: &PageRequest) -> CatalogResult<Page<CatalogItem>> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        match &request.endpoint {
            Endpoint::Search { query, .. } => {
                let Some(reply) = self.searches.get(query) else {
                    return Ok(Self::page(Vec::new(), 1, 0));
                };

                tokio::time::sleep(reply.delay).await;
                self.completions.lock().unwrap().push(query.clone());
                reply
                    .result
                    .clone()
                    .map(|results| Self::page(results, 1, 1))
            }
            Endpoint::RatedMovies | Endpoint::Watchlist => match &self.rated {
                Some(items) => Ok(Self::page(items.clone(), 1, 1)),
                None => Err(CatalogError::Unauthorized("No active session".to_string())),
            },
            Endpoint::MovieList(_) | Endpoint::Discover { .. } => {
                let total_pages = self.list_pages.len() as u32;
                let index = request.page as usize - 1;
                let items = self.list_pages.get(index).cloned().unwrap_or_default();
                Ok(Self::page(items, request.page, total_pages))
            }
        }
    }

    async fn fetch_genres(&self) -> CatalogResult<GenreTaxonomy> {
        self.genres
            .clone()
            .ok_or_else(|| CatalogError::Status {
                status: 503,
                body: "genres unavailable".to_string(),
            })
    }
}

/// Generator that always replies with the same text and remembers the prompt
pub struct FakeGenerator {
    reply: CatalogResult<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CatalogError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> CatalogResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Poster store keyed by the opaque poster reference
#[derive(Default)]
pub struct FakePosters {
    images: HashMap<String, Vec<u8>>,
}

impl FakePosters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, poster_path: &str, bytes: &[u8]) -> Self {
        self.images.insert(poster_path.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait::async_trait]
impl ImageLoader for FakePosters {
    async fn load(&self, poster_path: &str) -> CatalogResult<Vec<u8>> {
        self.images
            .get(poster_path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| CatalogError::Status {
                status: 404,
                body: format!("No poster at {}", poster_path),
            })
    }
}
