use std::sync::Arc;

use crate::{
    config::Config,
    error::CatalogResult,
    services::{
        providers::{
            CatalogTransport, GeminiClient, ImageLoader, StaticSession, TextGenerator, TmdbClient,
        },
        CatalogJoinFetcher, VibePipeline,
    },
};

/// Shared application state
///
/// Holds only stateless collaborators; paging state lives with the client.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: CatalogJoinFetcher,
    pub images: Arc<dyn ImageLoader>,
    catalog: Arc<dyn CatalogTransport>,
    generator: Arc<dyn TextGenerator>,
    candidate_count: usize,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogTransport>,
        images: Arc<dyn ImageLoader>,
        generator: Arc<dyn TextGenerator>,
        candidate_count: usize,
    ) -> Self {
        Self {
            fetcher: CatalogJoinFetcher::new(Arc::clone(&catalog)),
            images,
            catalog,
            generator,
            candidate_count,
        }
    }

    /// Wires the TMDB and Gemini clients from configuration
    pub fn from_config(config: &Config) -> CatalogResult<Self> {
        let session = Arc::new(StaticSession::new(
            config.session_id.clone(),
            config.account_id.clone(),
        ));

        let tmdb = Arc::new(TmdbClient::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            config.request_timeout(),
            session,
        )?);

        let generator = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            config.request_timeout(),
        )?;

        Ok(Self::new(
            tmdb.clone(),
            tmdb,
            Arc::new(generator),
            config.vibe_candidate_count,
        ))
    }

    /// A fresh pipeline per run, so stage tracking is never shared between requests
    pub fn vibe_pipeline(&self) -> VibePipeline {
        VibePipeline::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.generator),
            self.candidate_count,
        )
    }
}
