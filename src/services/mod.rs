pub mod cursor;
pub mod join_fetcher;
pub mod list_view_model;
pub mod projector;
pub mod prompt;
pub mod providers;
pub mod taxonomy;
pub mod vibe_pipeline;
pub mod vibe_view_model;

pub use cursor::{Completion, Cursor, FetchRejection, FetchTicket};
pub use join_fetcher::{CatalogJoinFetcher, JoinedPage};
pub use list_view_model::{CatalogListViewModel, FetchStatus, ListEvent};
pub use projector::project;
pub use taxonomy::TaxonomyCache;
pub use vibe_pipeline::VibePipeline;
pub use vibe_view_model::{VibeEvent, VibeViewModel};
