//! Page processor - orchestration layer
//!
//! Runs the images of one page through the scheduler, framed by the
//! observer's before/after hooks.

use std::sync::Arc;

use tracing::error;

use crate::infrastructure::BoundedScheduler;
use crate::models::{Page, SettledRecord};
use crate::services::ScrapeObserver;
use crate::utils::logging::{log_page_complete, log_page_start};
use crate::workflow::{ImageFlow, ItemCtx};

/// Counts for one page
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageStats {
    pub images: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub rejected: usize,
}

/// Processes one page
///
/// # Arguments
/// - `flow`: per-image pipeline, cloned into every task
/// - `observer`: page hooks
/// - `scheduler`: bounds the in-flight images
/// - `page`: the page
/// - `page_index`: page position (1-based)
/// - `total_pages`: number of pages in the run
///
/// # Returns
/// Page counts; hook failures are logged, never returned
pub async fn process_page(
    flow: &ImageFlow,
    observer: &Arc<dyn ScrapeObserver>,
    scheduler: &BoundedScheduler,
    page: &Page,
    page_index: usize,
    total_pages: usize,
) -> PageStats {
    log_page_start(page_index, total_pages, &page.name, page.len());

    if let Err(e) = observer.before_page(page).await {
        error!("[page {}] ❌ before-page hook failed: {}", page.name, e);
    }

    let tasks: Vec<_> = page
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let flow = flow.clone();
            let ctx = ItemCtx::new(&page.name, page_index, index + 1, &image.file_name);
            let image = image.clone();
            async move { flow.run(ctx, image).await }
        })
        .collect();

    let settled = scheduler.run(tasks).await;

    let mut stats = PageStats {
        images: page.len(),
        ..Default::default()
    };
    for (index, outcome) in settled.iter().enumerate() {
        match outcome {
            Ok(outcome) if outcome.is_resolved() => stats.resolved += 1,
            Ok(_) => stats.unresolved += 1,
            Err(e) => {
                error!("[page {}] ❌ item #{} rejected: {}", page.name, index + 1, e);
                stats.rejected += 1;
            }
        }
    }

    let records: Vec<SettledRecord> = settled.iter().map(SettledRecord::from_settled).collect();
    if let Err(e) = observer.after_page(page, &records).await {
        error!("[page {}] ❌ after-page hook failed: {}", page.name, e);
    }

    log_page_complete(page_index, &page.name, stats.resolved, stats.images);
    stats
}
