use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::CatalogResult,
    models::{DisplayModel, ListQuery, MovieList, PageRequest, SortOrder},
    services::project,
};

use super::AppState;

// Request/Response types

/// Query string for GET /api/v1/movies
///
/// `query` selects search, `sort`/`genre` select discover, otherwise `list`
/// (default popular) is browsed.
#[derive(Debug, Default, Deserialize)]
pub struct MoviesParams {
    pub list: Option<MovieList>,
    pub sort: Option<SortOrder>,
    pub genre: Option<u32>,
    pub query: Option<String>,
    pub page: Option<u32>,
}

impl MoviesParams {
    pub fn list_query(&self) -> ListQuery {
        if let Some(query) = &self.query {
            ListQuery::Search(query.clone())
        } else if self.sort.is_some() || self.genre.is_some() {
            ListQuery::Discover {
                sort: self.sort.unwrap_or_default(),
                genre: self.genre,
            }
        } else {
            ListQuery::Browse(self.list.unwrap_or(MovieList::Popular))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub page: u32,
    pub total_pages: u32,
    pub has_more: bool,
    pub results: Vec<DisplayModel>,
}

#[derive(Debug, Deserialize)]
pub struct VibeRequest {
    pub tags: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// One joined catalog page, projected for display
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<MoviesParams>,
) -> CatalogResult<Json<PageResponse>> {
    let request = params.list_query().page(params.page.unwrap_or(1));
    load_page(&state, request).await
}

pub async fn watchlist(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> CatalogResult<Json<PageResponse>> {
    load_page(&state, ListQuery::Watchlist.page(params.page.unwrap_or(1))).await
}

pub async fn rated(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> CatalogResult<Json<PageResponse>> {
    load_page(&state, ListQuery::Rated.page(params.page.unwrap_or(1))).await
}

/// Runs the vibe pipeline for the given mood tags
pub async fn recommend_vibes(
    State(state): State<AppState>,
    Json(request): Json<VibeRequest>,
) -> CatalogResult<Json<Vec<DisplayModel>>> {
    tracing::info!(tags = ?request.tags, "Processing vibe request");

    let models = state.vibe_pipeline().run(&request.tags).await?;
    Ok(Json(models))
}

/// Poster bytes for the reference found in a display model's `poster_path`
pub async fn poster(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> CatalogResult<Response> {
    let bytes = state.images.load(&path).await?;
    Ok(([(header::CONTENT_TYPE, image_content_type(&path))], bytes).into_response())
}

fn image_content_type(path: &str) -> &'static str {
    if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "image/jpeg"
    }
}

async fn load_page(state: &AppState, request: PageRequest) -> CatalogResult<Json<PageResponse>> {
    let joined = state.fetcher.fetch(&request).await?;
    let results = project(&joined.page.items, &joined.taxonomy);

    Ok(Json(PageResponse {
        page: joined.page.page,
        total_pages: joined.page.total_pages,
        has_more: joined.page.page < joined.page.total_pages,
        results,
    }))
}
