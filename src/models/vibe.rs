use serde::{Deserialize, Serialize};

use super::CatalogItem;

/// A title suggested by the generator, awaiting catalog resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeCandidate {
    pub title: String,
    #[serde(rename = "releaseYear")]
    pub release_year: i32,
}

/// A candidate paired with its first catalog match, if any
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecommendation {
    pub candidate: VibeCandidate,
    pub matched_item: Option<CatalogItem>,
}

/// Progress of a vibe resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VibeStage {
    #[default]
    Idle,
    FetchingHistory,
    GeneratingCandidates,
    ResolvingCandidates,
    Done,
    Failed,
}
