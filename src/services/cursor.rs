use crate::{
    error::{CatalogError, CatalogResult},
    models::{AggregatedPage, CatalogItem},
};

/// Proof that a fetch was admitted by the cursor
///
/// Carries the configuration generation it was issued under so completions that
/// arrive after a `configure` can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub page: u32,
    generation: u64,
}

/// Why `begin_fetch` refused to start a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FetchRejection {
    #[error("A fetch is already in flight")]
    AlreadyInFlight,
    #[error("Page is past the last known page")]
    PastLastPage,
}

/// What `complete_fetch` did with a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket predates the latest `configure`; nothing was changed
    Stale,
}

/// Pagination state machine with a single-flight guard
///
/// Owns the accumulated item list. Page 1 replaces the list, later pages append.
#[derive(Debug, Clone)]
pub struct Cursor {
    current_page: u32,
    total_pages: u32,
    in_flight: bool,
    loaded: bool,
    generation: u64,
    items: Vec<CatalogItem>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            in_flight: false,
            loaded: false,
            generation: 0,
            items: Vec::new(),
        }
    }

    /// Resets to (1, 1), clears items and the in-flight flag
    ///
    /// Must be called before the first fetch and whenever request parameters change.
    pub fn configure(&mut self) {
        self.current_page = 1;
        self.total_pages = 1;
        self.in_flight = false;
        self.loaded = false;
        self.generation += 1;
        self.items.clear();

        tracing::debug!(generation = self.generation, "Cursor configured");
    }

    /// Admits a fetch for `page` unless one is outstanding or the page does not exist
    ///
    /// Page 1 is always admissible, which bootstraps a cursor whose total is unseeded.
    pub fn begin_fetch(&mut self, page: u32) -> Result<FetchTicket, FetchRejection> {
        if self.in_flight {
            return Err(FetchRejection::AlreadyInFlight);
        }

        if page == 0 || (page > self.total_pages && page != 1) {
            return Err(FetchRejection::PastLastPage);
        }

        self.in_flight = true;
        Ok(FetchTicket {
            page,
            generation: self.generation,
        })
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies the outcome of an admitted fetch
    ///
    /// A failure clears the in-flight flag and leaves pages and items untouched,
    /// so the same page can be retried. The error is handed back to the caller.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: CatalogResult<AggregatedPage>,
    ) -> Result<Completion, CatalogError> {
        if !self.is_current(&ticket) {
            tracing::debug!(
                page = ticket.page,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "Discarding stale completion"
            );
            return Ok(Completion::Stale);
        }

        self.in_flight = false;
        let page = outcome?;

        self.total_pages = page.total_pages.max(ticket.page);
        self.current_page = ticket.page;
        self.loaded = true;

        if ticket.page == 1 {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }

        Ok(Completion::Applied)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page a "load more" should request, if any
    pub fn next_page(&self) -> Option<u32> {
        if !self.loaded {
            Some(1)
        } else if self.has_more_pages() {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }
}
