//! Image flow - workflow layer
//!
//! Defines what happens to one image:
//!
//! 1. read the bytes from disk
//! 2. hand them to the resolver
//! 3. report the outcome to the observer
//!
//! Read and resolve failures become an unresolved outcome. Only an observer
//! failure rejects the task.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{ImageFile, ResolutionOutcome};
use crate::services::{ImageResolver, ScrapeObserver};
use crate::utils::logging::truncate_text;
use crate::workflow::ItemCtx;

/// Per-image pipeline
///
/// Holds no per-image state, so one instance is cloned into every task.
#[derive(Clone)]
pub struct ImageFlow {
    resolver: Arc<dyn ImageResolver>,
    observer: Arc<dyn ScrapeObserver>,
}

impl ImageFlow {
    pub fn new(resolver: Arc<dyn ImageResolver>, observer: Arc<dyn ScrapeObserver>) -> Self {
        Self { resolver, observer }
    }

    pub async fn run(&self, ctx: ItemCtx, image: ImageFile) -> AppResult<ResolutionOutcome> {
        let outcome = self.resolve(&ctx, image).await;
        self.observer.on_item(&outcome).await?;
        Ok(outcome)
    }

    async fn resolve(&self, ctx: &ItemCtx, image: ImageFile) -> ResolutionOutcome {
        let bytes = match tokio::fs::read(image.path()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{} ⚠️ could not read image: {}", ctx, e);
                return ResolutionOutcome::unresolved(image, e);
            }
        };

        match self.resolver.resolve(bytes).await {
            Ok(name) => {
                info!("{} ✓ resolved as \"{}\"", ctx, truncate_text(&name, 80));
                ResolutionOutcome::resolved(image, name)
            }
            Err(e) => {
                warn!(
                    "{} ⚠️ {} could not resolve image: {}",
                    ctx,
                    self.resolver.provider(),
                    e
                );
                ResolutionOutcome::unresolved(image, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ResolveError};
    use crate::models::{Page, SettledRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedResolver;

    #[async_trait]
    impl ImageResolver for FixedResolver {
        fn provider(&self) -> &str {
            "fixed"
        }

        async fn resolve(&self, image: Vec<u8>) -> Result<String, ResolveError> {
            match image.as_slice() {
                b"known" => Ok("La Gioconda".to_string()),
                _ => Err(ResolveError::NoMatch),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        items: Mutex<Vec<ResolutionOutcome>>,
        fail: bool,
    }

    #[async_trait]
    impl ScrapeObserver for Recorder {
        async fn before_page(&self, _page: &Page) -> AppResult<()> {
            Ok(())
        }

        async fn on_item(&self, outcome: &ResolutionOutcome) -> AppResult<()> {
            if self.fail {
                return Err(AppError::directory_not_found("/nowhere"));
            }
            self.items.lock().unwrap().push(outcome.clone());
            Ok(())
        }

        async fn after_page(&self, _page: &Page, _results: &[SettledRecord]) -> AppResult<()> {
            Ok(())
        }
    }

    fn write_image(dir: &std::path::Path, name: &str, bytes: &[u8]) -> ImageFile {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        ImageFile::from_path(path).unwrap()
    }

    #[tokio::test]
    async fn test_outcomes_reach_the_observer() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let flow = ImageFlow::new(Arc::new(FixedResolver), recorder.clone());

        let known = write_image(dir.path(), "mona_1.jpg", b"known");
        let unknown = write_image(dir.path(), "mona_2.jpg", b"other");

        let first = flow.run(ItemCtx::new("mona", 1, 1, "mona_1.jpg"), known).await.unwrap();
        let second = flow
            .run(ItemCtx::new("mona", 1, 2, "mona_2.jpg"), unknown)
            .await
            .unwrap();

        assert_eq!(first.resolved_name.as_deref(), Some("La Gioconda"));
        assert!(!second.is_resolved());
        assert!(second.error.is_some());
        assert_eq!(recorder.items.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_image_is_unresolved() {
        let recorder = Arc::new(Recorder::default());
        let flow = ImageFlow::new(Arc::new(FixedResolver), recorder.clone());
        let missing = ImageFile::from_path("/definitely/not/here/mona_9.jpg").unwrap();

        let outcome = flow
            .run(ItemCtx::new("mona", 1, 1, "mona_9.jpg"), missing)
            .await
            .unwrap();

        assert!(!outcome.is_resolved());
        assert_eq!(recorder.items.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_observer_failure_rejects_the_item() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let flow = ImageFlow::new(Arc::new(FixedResolver), recorder);
        let image = write_image(dir.path(), "mona_1.jpg", b"known");

        let result = flow.run(ItemCtx::new("mona", 1, 1, "mona_1.jpg"), image).await;
        assert!(result.is_err());
    }
}
