use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use crate::{
    error::CatalogError,
    models::DisplayModel,
    services::{list_view_model::FetchStatus, vibe_pipeline::VibePipeline},
};

#[derive(Debug, Clone, PartialEq)]
pub enum VibeEvent {
    Resolved(Vec<DisplayModel>),
    Failed(CatalogError),
}

/// Vibe recommendation screen state
///
/// Allows one pipeline run at a time and forwards its outcome to the listener.
pub struct VibeViewModel {
    pipeline: Arc<VibePipeline>,
    running: AtomicBool,
    events: mpsc::UnboundedSender<VibeEvent>,
}

impl VibeViewModel {
    pub fn with_channel(pipeline: Arc<VibePipeline>) -> (Self, mpsc::UnboundedReceiver<VibeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let view_model = Self {
            pipeline,
            running: AtomicBool::new(false),
            events,
        };
        (view_model, rx)
    }

    pub async fn request(&self, tags: &[String]) -> FetchStatus {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Vibe run rejected, another is in flight");
            return FetchStatus::AlreadyInFlight;
        }

        let result = {
            let _running = RunningGuard(&self.running);
            self.pipeline.run(tags).await
        };

        let (status, event) = match result {
            Ok(models) => (FetchStatus::Loaded, VibeEvent::Resolved(models)),
            Err(e) => (FetchStatus::Failed, VibeEvent::Failed(e)),
        };

        if self.events.send(event).is_err() {
            tracing::debug!("Vibe listener dropped, event discarded");
        }

        status
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Clears the running flag however the run ends, including when the caller drops it
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, Endpoint, GenreTaxonomy, Page};
    use crate::error::CatalogResult;
    use crate::services::providers::{MockCatalogTransport, MockTextGenerator, TextGenerator};
    use std::time::Duration;

    /// Replies after a fixed delay, long enough for a caller to give up first
    struct SlowGenerator(Duration);

    #[async_trait::async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> CatalogResult<String> {
            tokio::time::sleep(self.0).await;
            Ok(r#"[{"title":"Star Wars","releaseYear":1977}]"#.to_string())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn catalog() -> MockCatalogTransport {
        let mut catalog = MockCatalogTransport::new();
        catalog.expect_fetch_page().returning(|request| {
            let results = match &request.endpoint {
                Endpoint::Search { query, .. } => vec![CatalogItem {
                    id: 11,
                    title: query.clone(),
                    release_date: Some("1977-05-25".to_string()),
                    vote_average: 8.2,
                    genre_ids: vec![878],
                    poster_path: None,
                    overview: None,
                }],
                _ => Vec::new(),
            };
            Ok(Page {
                page: 1,
                results,
                total_pages: 1,
                total_results: 1,
            })
        });
        catalog
            .expect_fetch_genres()
            .returning(|| Ok(GenreTaxonomy::from_iter([(878, "Science Fiction".to_string())])));
        catalog
    }

    fn pipeline() -> Arc<VibePipeline> {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(r#"[{"title":"Star Wars","releaseYear":1977}]"#.to_string()));
        generator.expect_name().return_const("mock");

        Arc::new(VibePipeline::new(Arc::new(catalog()), Arc::new(generator), 3))
    }

    #[tokio::test]
    async fn test_request_delivers_results() {
        let (vm, mut rx) = VibeViewModel::with_channel(pipeline());

        assert_eq!(vm.request(&["space opera".to_string()]).await, FetchStatus::Loaded);
        assert!(!vm.is_running());

        match rx.recv().await.unwrap() {
            VibeEvent::Resolved(models) => {
                assert_eq!(models.len(), 1);
                assert_eq!(models[0].genre_names, vec!["Science Fiction".to_string()]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_request_while_running_is_rejected() {
        let (vm, _rx) = VibeViewModel::with_channel(pipeline());
        let tags = vec!["space opera".to_string()];

        let (first, second) = tokio::join!(vm.request(&tags), vm.request(&tags));

        assert_eq!(first, FetchStatus::Loaded);
        assert_eq!(second, FetchStatus::AlreadyInFlight);
    }

    #[tokio::test]
    async fn test_failure_is_delivered() {
        let (vm, mut rx) = VibeViewModel::with_channel(pipeline());

        assert_eq!(vm.request(&[]).await, FetchStatus::Failed);
        assert!(matches!(
            rx.recv().await,
            Some(VibeEvent::Failed(CatalogError::MalformedRequest(_)))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_request_releases_guard() {
        let pipeline = Arc::new(VibePipeline::new(
            Arc::new(catalog()),
            Arc::new(SlowGenerator(Duration::from_millis(100))),
            3,
        ));
        let (vm, mut rx) = VibeViewModel::with_channel(pipeline);
        let tags = vec!["space opera".to_string()];

        let cancelled = tokio::time::timeout(Duration::from_millis(10), vm.request(&tags)).await;
        assert!(cancelled.is_err());
        assert!(!vm.is_running());
        assert!(rx.try_recv().is_err());

        assert_eq!(vm.request(&tags).await, FetchStatus::Loaded);
        assert!(matches!(rx.recv().await, Some(VibeEvent::Resolved(_))));
    }
}
