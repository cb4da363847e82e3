use std::{collections::HashSet, sync::Arc};

use tokio::{
    sync::watch,
    task::{JoinError, JoinHandle},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{
        CatalogItem, DisplayModel, Endpoint, PageRequest, ResolvedRecommendation, VibeCandidate,
        VibeStage,
    },
    services::{
        projector::project,
        prompt::{build_prompt, parse_candidates},
        providers::{CatalogTransport, TextGenerator},
    },
};

/// Turns free-text mood tags into a ranked list of catalog titles
///
/// Runs `FetchingHistory → GeneratingCandidates → ResolvingCandidates → Done | Failed`.
/// Nothing is retried; every call to `run` starts over from the history step.
pub struct VibePipeline {
    catalog: Arc<dyn CatalogTransport>,
    generator: Arc<dyn TextGenerator>,
    candidate_count: usize,
    stage: watch::Sender<VibeStage>,
}

impl VibePipeline {
    pub fn new(
        catalog: Arc<dyn CatalogTransport>,
        generator: Arc<dyn TextGenerator>,
        candidate_count: usize,
    ) -> Self {
        let (stage, _) = watch::channel(VibeStage::Idle);

        Self {
            catalog,
            generator,
            candidate_count,
            stage,
        }
    }

    /// Observe stage transitions of subsequent runs
    pub fn subscribe_stage(&self) -> watch::Receiver<VibeStage> {
        self.stage.subscribe()
    }

    pub fn stage(&self) -> VibeStage {
        *self.stage.borrow()
    }

    fn enter(&self, stage: VibeStage) {
        tracing::debug!(stage = ?stage, "Vibe pipeline stage");
        self.stage.send_replace(stage);
    }

    /// Runs the full pipeline and projects the resolved titles
    pub async fn run(&self, tags: &[String]) -> CatalogResult<Vec<DisplayModel>> {
        let span = tracing::info_span!("vibe_run", run_id = %Uuid::new_v4(), tags = tags.len());

        let result = self.run_stages(tags).instrument(span).await;
        match &result {
            Ok(_) => self.enter(VibeStage::Done),
            Err(e) => {
                tracing::error!(error = %e, "Vibe pipeline failed");
                self.enter(VibeStage::Failed);
            }
        }

        result
    }

    async fn run_stages(&self, tags: &[String]) -> CatalogResult<Vec<DisplayModel>> {
        let tags: Vec<String> = tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if tags.is_empty() {
            return Err(CatalogError::MalformedRequest(
                "At least one vibe tag is required".to_string(),
            ));
        }

        self.enter(VibeStage::FetchingHistory);
        let history = self.fetch_history().await;

        self.enter(VibeStage::GeneratingCandidates);
        let candidates = self.generate_candidates(&tags, &history).await?;

        self.enter(VibeStage::ResolvingCandidates);
        let catalog = Arc::clone(&self.catalog);
        let mut taxonomy_task =
            AbortOnDrop(tokio::spawn(async move { catalog.fetch_genres().await }));

        let resolved = self.resolve_candidates(candidates).await;
        let taxonomy = taxonomy_task.join().await.map_err(CatalogError::from).and_then(|r| r);
        let resolved = resolved?;
        let taxonomy = taxonomy?;

        let items = dedupe_matches(resolved, &history);
        let models = project(&items, &taxonomy);

        tracing::info!(results = models.len(), "Vibe recommendations ready");

        Ok(models)
    }

    /// Walks every page of the user's rated titles, one page at a time
    ///
    /// Best effort: a failed page truncates the history to what was gathered.
    pub async fn fetch_history(&self) -> Vec<String> {
        let mut titles = Vec::new();
        let mut page = 1;

        loop {
            let request = PageRequest::new(Endpoint::RatedMovies, page);
            match self.catalog.fetch_page(&request).await {
                Ok(response) => {
                    let total_pages = response.total_pages;
                    titles.extend(response.results.into_iter().map(|item| item.title));

                    if page >= total_pages {
                        break;
                    }
                    page += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        page = page,
                        gathered = titles.len(),
                        "Rated history truncated"
                    );
                    break;
                }
            }
        }

        tracing::info!(titles = titles.len(), "Rated history gathered");
        titles
    }

    async fn generate_candidates(
        &self,
        tags: &[String],
        history: &[String],
    ) -> CatalogResult<Vec<VibeCandidate>> {
        let prompt = build_prompt(tags, history, self.candidate_count);
        let text = self.generator.generate(&prompt).await?;
        let candidates = parse_candidates(&text)?;

        tracing::info!(
            candidates = candidates.len(),
            provider = self.generator.name(),
            "Vibe candidates generated"
        );

        Ok(candidates)
    }

    /// Searches the catalog for every candidate concurrently
    ///
    /// The output is in candidate order regardless of completion order. A failed
    /// search leaves its candidate unmatched; the call only fails when no
    /// candidate matched at all.
    pub async fn resolve_candidates(
        &self,
        candidates: Vec<VibeCandidate>,
    ) -> CatalogResult<Vec<ResolvedRecommendation>> {
        let mut tasks = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            let catalog = Arc::clone(&self.catalog);
            let request = PageRequest::new(
                Endpoint::Search {
                    query: candidate.title.clone(),
                    year: Some(candidate.release_year),
                },
                1,
            );
            let task = tokio::spawn(async move { catalog.fetch_page(&request).await });
            tasks.push(AbortOnDrop(task));
        }

        let attempted = candidates.len();
        let mut resolved = Vec::with_capacity(attempted);
        let mut failed = 0;

        // Searches still pending when this future is dropped are aborted with their guards
        for (candidate, mut task) in candidates.into_iter().zip(tasks) {
            let matched_item = match task.join().await {
                Ok(Ok(page)) => page.results.into_iter().next(),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, title = %candidate.title, "Candidate search failed");
                    failed += 1;
                    None
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    failed += 1;
                    None
                }
            };

            resolved.push(ResolvedRecommendation {
                candidate,
                matched_item,
            });
        }

        let matched = resolved.iter().filter(|r| r.matched_item.is_some()).count();

        if failed > 0 {
            tracing::warn!(
                success_count = attempted - failed,
                error_count = failed,
                "Partial candidate resolution failure"
            );
        }

        if matched == 0 {
            return Err(CatalogError::ZeroCandidatesResolved { attempted, failed });
        }

        tracing::info!(attempted, matched, "Candidates resolved");

        Ok(resolved)
    }
}

/// Keeps matched items in candidate order, first occurrence of each id wins
///
/// Matches whose title is in the rated history are dropped, in case the
/// generator ignored the exclusion list.
fn dedupe_matches(resolved: Vec<ResolvedRecommendation>, history: &[String]) -> Vec<CatalogItem> {
    let rated: HashSet<String> = history.iter().map(|title| title.to_lowercase()).collect();
    let mut seen = HashSet::new();

    resolved
        .into_iter()
        .filter_map(|r| r.matched_item)
        .filter(|item| !rated.contains(&item.title.to_lowercase()))
        .filter(|item| seen.insert(item.id))
        .collect()
}

/// Spawned task that is aborted if its handle is dropped before completion
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> AbortOnDrop<T> {
    async fn join(&mut self) -> Result<T, JoinError> {
        (&mut self.0).await
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
