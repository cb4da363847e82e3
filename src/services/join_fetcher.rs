use std::sync::Arc;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{AggregatedPage, GenreTaxonomy, PageRequest},
    services::providers::CatalogTransport,
};

/// A catalog page and the taxonomy fetched alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPage {
    pub taxonomy: GenreTaxonomy,
    pub page: AggregatedPage,
}

/// Fetches one catalog page and the genre taxonomy concurrently and joins them
///
/// Both halves succeed together or the join fails as a whole; no partial result
/// is ever produced.
#[derive(Clone)]
pub struct CatalogJoinFetcher {
    transport: Arc<dyn CatalogTransport>,
}

impl CatalogJoinFetcher {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    pub async fn fetch(&self, request: &PageRequest) -> CatalogResult<JoinedPage> {
        let transport = Arc::clone(&self.transport);
        let taxonomy_task = tokio::spawn(async move { transport.fetch_genres().await });

        let transport = Arc::clone(&self.transport);
        let page_request = request.clone();
        let page_task = tokio::spawn(async move { transport.fetch_page(&page_request).await });

        // Barrier: both completions are awaited before anything is decided
        let taxonomy = taxonomy_task.await.map_err(CatalogError::from).and_then(|r| r);
        let page = page_task.await.map_err(CatalogError::from).and_then(|r| r);

        match (taxonomy, page) {
            (Ok(taxonomy), Ok(page)) => {
                let page = AggregatedPage::from(page);
                tracing::info!(
                    endpoint = ?request.endpoint,
                    page = page.page,
                    total_pages = page.total_pages,
                    items = page.items.len(),
                    genres = taxonomy.len(),
                    "Catalog join completed"
                );
                Ok(JoinedPage { taxonomy, page })
            }
            (Err(e), Ok(_)) => {
                tracing::error!(error = %e, "Taxonomy fetch failed, discarding catalog page");
                Err(e)
            }
            (Ok(_), Err(e)) => {
                tracing::error!(error = %e, "Catalog page fetch failed, discarding taxonomy");
                Err(e)
            }
            (Err(taxonomy_err), Err(page_err)) => {
                tracing::error!(
                    taxonomy_error = %taxonomy_err,
                    page_error = %page_err,
                    "Both sides of the catalog join failed"
                );
                Err(select_error(taxonomy_err, page_err))
            }
        }
    }
}

/// Picks the error to surface when both requests failed
///
/// Higher `precedence` wins; ties go to the catalog page error.
fn select_error(taxonomy_err: CatalogError, page_err: CatalogError) -> CatalogError {
    if taxonomy_err.precedence() > page_err.precedence() {
        taxonomy_err
    } else {
        page_err
    }
}
