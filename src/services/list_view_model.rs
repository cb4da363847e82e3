use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::{
    error::CatalogError,
    models::{DisplayModel, ListQuery},
    services::{
        cursor::{Completion, Cursor, FetchRejection},
        join_fetcher::CatalogJoinFetcher,
        projector::project,
        providers::CatalogTransport,
        taxonomy::TaxonomyCache,
    },
};

/// Notification delivered to the UI-consuming task
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// The full, rebuilt list after a page was applied
    Loaded {
        page: u32,
        total_pages: u32,
        items: Vec<DisplayModel>,
    },
    Failed(CatalogError),
}

/// Outcome of a `load_page` call as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Loaded,
    Failed,
    /// Another fetch is outstanding; nothing was requested
    AlreadyInFlight,
    NoMorePages,
    /// Parameters changed while the request was in flight; the response was dropped
    Stale,
    NotConfigured,
}

struct ListState {
    query: Option<ListQuery>,
    cursor: Cursor,
    taxonomy: TaxonomyCache,
    display: Vec<DisplayModel>,
}

/// Paginated list screen state
///
/// Owns its cursor, taxonomy cache and projected list exclusively. State is
/// only mutated after a join has completed, and never while a lock is held
/// across a suspension point.
pub struct CatalogListViewModel {
    fetcher: CatalogJoinFetcher,
    state: Mutex<ListState>,
    events: mpsc::UnboundedSender<ListEvent>,
}

impl CatalogListViewModel {
    pub fn new(transport: Arc<dyn CatalogTransport>, events: mpsc::UnboundedSender<ListEvent>) -> Self {
        Self {
            fetcher: CatalogJoinFetcher::new(transport),
            state: Mutex::new(ListState {
                query: None,
                cursor: Cursor::new(),
                taxonomy: TaxonomyCache::new(),
                display: Vec::new(),
            }),
            events,
        }
    }

    /// Creates a view-model together with the receiver its events go to
    pub fn with_channel(
        transport: Arc<dyn CatalogTransport>,
    ) -> (Self, mpsc::UnboundedReceiver<ListEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(transport, tx), rx)
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets new list parameters, resetting the cursor and clearing the list
    pub fn configure(&self, query: ListQuery) {
        let mut state = self.lock();
        tracing::info!(query = ?query, "List configured");
        state.query = Some(query);
        state.cursor.configure();
        state.display.clear();
    }

    /// Requests the page after the last loaded one
    pub async fn load_next_page(&self) -> FetchStatus {
        let next = self.lock().cursor.next_page();
        match next {
            Some(page) => self.load_page(page).await,
            None => FetchStatus::NoMorePages,
        }
    }

    /// Reloads from page 1, replacing the current list on success
    pub async fn refresh(&self) -> FetchStatus {
        self.load_page(1).await
    }

    pub async fn load_page(&self, page: u32) -> FetchStatus {
        let (ticket, request) = {
            let mut state = self.lock();
            let Some(query) = state.query.clone() else {
                return FetchStatus::NotConfigured;
            };

            match state.cursor.begin_fetch(page) {
                Ok(ticket) => (ticket, query.page(page)),
                Err(FetchRejection::AlreadyInFlight) => {
                    tracing::debug!(page, "Fetch rejected, another is in flight");
                    return FetchStatus::AlreadyInFlight;
                }
                Err(FetchRejection::PastLastPage) => return FetchStatus::NoMorePages,
            }
        };

        let outcome = self.fetcher.fetch(&request).await;

        let (status, event) = {
            let mut state = self.lock();
            let state = &mut *state;

            match outcome {
                Ok(joined) => {
                    if !state.cursor.is_current(&ticket) {
                        tracing::debug!(page, "Dropping response for outdated parameters");
                        return FetchStatus::Stale;
                    }

                    state.taxonomy.replace(joined.taxonomy);
                    match state.cursor.complete_fetch(ticket, Ok(joined.page)) {
                        Ok(Completion::Applied) => {}
                        Ok(Completion::Stale) => return FetchStatus::Stale,
                        Err(e) => return self.deliver_failure(e),
                    }

                    state.display = project(state.cursor.items(), &state.taxonomy.snapshot());

                    let event = ListEvent::Loaded {
                        page: state.cursor.current_page(),
                        total_pages: state.cursor.total_pages(),
                        items: state.display.clone(),
                    };
                    (FetchStatus::Loaded, event)
                }
                Err(e) => match state.cursor.complete_fetch(ticket, Err(e)) {
                    Ok(_) => return FetchStatus::Stale,
                    Err(e) => {
                        tracing::warn!(error = %e, page, "Page fetch failed, list left intact");
                        (FetchStatus::Failed, ListEvent::Failed(e))
                    }
                },
            }
        };

        self.notify(event);
        status
    }

    fn deliver_failure(&self, error: CatalogError) -> FetchStatus {
        self.notify(ListEvent::Failed(error));
        FetchStatus::Failed
    }

    fn notify(&self, event: ListEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("List listener dropped, event discarded");
        }
    }

    pub fn display_models(&self) -> Vec<DisplayModel> {
        self.lock().display.clone()
    }

    pub fn has_more_pages(&self) -> bool {
        self.lock().cursor.has_more_pages()
    }

    pub fn current_page(&self) -> u32 {
        self.lock().cursor.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.lock().cursor.total_pages()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().cursor.in_flight()
    }
}
