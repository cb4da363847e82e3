/// TMDB v3 catalog provider
///
/// Serves paged movie lists, discover/search queries, the signed-in user's
/// rated titles and watchlist, and the genre taxonomy.
///
/// Authenticated endpoints (`/account/{id}/rated/movies`, `/account/{id}/watchlist/movies`)
/// need a session id. When the session provider has none the request fails with
/// `Unauthorized` before anything is sent.
use crate::{
    error::{CatalogError, CatalogResult},
    models::{ApiGenreList, CatalogItem, Endpoint, GenreTaxonomy, Page, PageRequest},
    services::providers::{CatalogTransport, ImageLoader, SessionProvider},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};

type QueryParams = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    session: Arc<dyn SessionProvider>,
}

impl TmdbClient {
    /// Creates a client whose requests all share the given timeout
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        timeout: Duration,
        session: Arc<dyn SessionProvider>,
    ) -> CatalogResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: image_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Resolves a page request into a URL and its query parameters
    fn build_request(&self, request: &PageRequest) -> CatalogResult<(String, QueryParams)> {
        if request.page == 0 {
            return Err(CatalogError::MalformedRequest(
                "Page numbers start at 1".to_string(),
            ));
        }

        let mut params: QueryParams = vec![("page", request.page.to_string())];

        let path = match &request.endpoint {
            Endpoint::MovieList(list) => format!("/movie/{}", list.path_segment()),
            Endpoint::Discover { sort, genre } => {
                params.push(("sort_by", sort.as_param().to_string()));
                if let Some(genre) = genre {
                    params.push(("with_genres", genre.to_string()));
                }
                "/discover/movie".to_string()
            }
            Endpoint::Search { query, year } => {
                if query.trim().is_empty() {
                    return Err(CatalogError::MalformedRequest(
                        "Search query cannot be empty".to_string(),
                    ));
                }
                params.push(("query", query.clone()));
                if let Some(year) = year {
                    params.push(("year", year.to_string()));
                }
                "/search/movie".to_string()
            }
            Endpoint::RatedMovies => self.account_path("rated", &mut params)?,
            Endpoint::Watchlist => self.account_path("watchlist", &mut params)?,
        };

        Ok((format!("{}{}", self.api_url, path), params))
    }

    /// Path of one of the signed-in user's collections; fails before any request without a session
    fn account_path(&self, collection: &str, params: &mut QueryParams) -> CatalogResult<String> {
        let session = self
            .session
            .current_session()
            .ok_or_else(|| CatalogError::Unauthorized("No active session".to_string()))?;
        params.push(("session_id", session.session_id));

        Ok(format!("/account/{}/{}/movies", session.account_id, collection))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &QueryParams) -> CatalogResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                url = %url,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(CatalogError::from_status(status.as_u16(), body));
        }

        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                "Failed to deserialize TMDB response"
            );
            CatalogError::Decode(format!("Failed to parse TMDB response: {}", e))
        })
    }

    fn image_request_url(&self, poster_path: &str) -> CatalogResult<String> {
        let poster_path = poster_path.trim();
        if poster_path.is_empty() {
            return Err(CatalogError::MalformedRequest(
                "Poster reference cannot be empty".to_string(),
            ));
        }

        if poster_path.starts_with('/') {
            Ok(format!("{}{}", self.image_url, poster_path))
        } else {
            Ok(format!("{}/{}", self.image_url, poster_path))
        }
    }
}

#[async_trait::async_trait]
impl CatalogTransport for TmdbClient {
    async fn fetch_page(&self, request: &PageRequest) -> CatalogResult<Page<CatalogItem>> {
        let (url, params) = self.build_request(request)?;
        let page: Page<CatalogItem> = self.get_json(&url, &params).await?;

        tracing::info!(
            endpoint = ?request.endpoint,
            page = page.page,
            total_pages = page.total_pages,
            results = page.results.len(),
            provider = "tmdb",
            "Catalog page fetched"
        );

        Ok(page)
    }

    async fn fetch_genres(&self) -> CatalogResult<GenreTaxonomy> {
        let url = format!("{}/genre/movie/list", self.api_url);
        let list: ApiGenreList = self.get_json(&url, &Vec::new()).await?;
        let taxonomy = GenreTaxonomy::from(list);

        tracing::info!(
            genres = taxonomy.len(),
            provider = "tmdb",
            "Genre taxonomy fetched"
        );

        Ok(taxonomy)
    }
}

#[async_trait::async_trait]
impl ImageLoader for TmdbClient {
    async fn load(&self, poster_path: &str) -> CatalogResult<Vec<u8>> {
        let url = self.image_request_url(poster_path)?;
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CatalogError::from_status(
                status.as_u16(),
                format!("Image request for {} failed", poster_path),
            ));
        }

        let bytes = response.bytes().await?;
        tracing::debug!(poster_path = %poster_path, size = bytes.len(), "Poster loaded");

        Ok(bytes.to_vec())
    }
}
