//! Scraping processor - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Initialization**: builds the resolver, the artifact observer and the scheduler
//! 2. **Loading**: lists the images directory and groups it into pages
//! 3. **Ordering**: pages run strictly one after another
//! 4. **Statistics**: folds the page counts into the run summary
//!
//! Single pages are delegated to `page_processor`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::clients::LensClient;
use crate::config::{result_file_prefix, Config};
use crate::infrastructure::BoundedScheduler;
use crate::models::load_pages;
use crate::orchestrator::page_processor::{process_page, PageStats};
use crate::services::{ArtifactObserver, ArtifactWriter, ImageResolver, ScrapeObserver};
use crate::utils::logging::{
    log_output_file, log_pages_loaded, log_startup, print_scrape_stats,
};
use crate::workflow::ImageFlow;

/// Scraping run summary
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeStats {
    pub pages: usize,
    pub images: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub rejected: usize,
    /// Files that are not `<name>_<number>.jpg`
    pub skipped: usize,
}

impl ScrapeStats {
    fn absorb(&mut self, page: &PageStats) {
        self.pages += 1;
        self.images += page.images;
        self.resolved += page.resolved;
        self.unresolved += page.unresolved;
        self.rejected += page.rejected;
    }
}

/// Scraping application
pub struct ScrapeApp {
    config: Config,
    flow: ImageFlow,
    observer: Arc<dyn ScrapeObserver>,
    scheduler: BoundedScheduler,
}

impl ScrapeApp {
    /// Wires the reverse-image-search client and the timestamped artifacts
    pub async fn initialize(config: Config) -> Result<Self> {
        let resolver = LensClient::from_config(&config).context("failed to build lens client")?;

        let prefix = result_file_prefix();
        let items_path = config.artworks_file(&prefix);
        let report_path = config.scraping_report_file(&prefix);
        log_output_file("items", &items_path);
        log_output_file("report", &report_path);

        let observer = ArtifactObserver::new(
            ArtifactWriter::new(items_path),
            ArtifactWriter::new(report_path),
        );

        Ok(Self::with_parts(config, Arc::new(resolver), Arc::new(observer)))
    }

    pub fn with_parts(
        config: Config,
        resolver: Arc<dyn ImageResolver>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Self {
        let scheduler = BoundedScheduler::new(config.max_concurrent_tasks);
        let flow = ImageFlow::new(resolver, observer.clone());
        Self {
            config,
            flow,
            observer,
            scheduler,
        }
    }

    pub async fn run(&self) -> Result<ScrapeStats> {
        log_startup("scrape", self.scheduler.limit());

        info!("\n📁 scanning {}...", self.config.images_dir.display());
        let page_set = load_pages(&self.config.images_dir).await?;

        let mut stats = ScrapeStats {
            skipped: page_set.skipped.len(),
            ..Default::default()
        };

        if page_set.pages.is_empty() {
            warn!("⚠️ no images to scrape, nothing to do");
            return Ok(stats);
        }

        let total_pages = page_set.pages.len();
        log_pages_loaded(total_pages, page_set.image_count(), stats.skipped);

        for (index, page) in page_set.pages.iter().enumerate() {
            let page_stats = process_page(
                &self.flow,
                &self.observer,
                &self.scheduler,
                page,
                index + 1,
                total_pages,
            )
            .await;
            stats.absorb(&page_stats);
        }

        print_scrape_stats(stats.pages, stats.resolved, stats.unresolved, stats.rejected);
        Ok(stats)
    }
}
