//! Benchmark case flow - workflow layer
//!
//! One ground-truth case: read the query image, ask the catalog for the
//! most similar artworks, and find where the expected artwork ranked.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::clients::CatalogClient;
use crate::error::{AppError, AppResult};
use crate::models::{rank_of, BenchmarkCase, BenchmarkOutcome, LatencyMode};

/// Per-case pipeline
#[derive(Clone)]
pub struct CaseFlow {
    catalog: Arc<CatalogClient>,
    data_root: PathBuf,
    limit: u32,
    latency: LatencyMode,
}

impl CaseFlow {
    pub fn new(
        catalog: Arc<CatalogClient>,
        data_root: impl Into<PathBuf>,
        limit: u32,
        latency: LatencyMode,
    ) -> Self {
        Self {
            catalog,
            data_root: data_root.into(),
            limit,
            latency,
        }
    }

    /// Runs one case
    ///
    /// # Arguments
    /// - `index`: case position (1-based, logs only)
    /// - `case`: the ground-truth row
    ///
    /// # Returns
    /// The outcome; an unreadable image or an exhausted HTTP call is an error
    pub async fn run(&self, index: usize, case: BenchmarkCase) -> AppResult<BenchmarkOutcome> {
        let image_path = resolve_query_path(&self.data_root, &case.query_image_path);
        let image = tokio::fs::read(&image_path)
            .await
            .map_err(|e| AppError::file_read_failed(&image_path, e))?;

        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());

        let start = Instant::now();
        let results = match self
            .catalog
            .similar_to_image(image, &file_name, self.limit)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(
                    "[case {}] similarity query for artwork {} gave up after {} attempt(s)",
                    index,
                    case.artwork_id,
                    e.attempts().unwrap_or(1)
                );
                return Err(e.into());
            }
        };
        let milliseconds = self.latency.measure(start.elapsed());

        let position = rank_of(&results, &case.artwork_id);
        match position {
            Some(rank) => info!(
                "[case {}] ✓ artwork {} ranked #{} ({} ms)",
                index, case.artwork_id, rank, milliseconds
            ),
            None => debug!(
                "[case {}] artwork {} not in the top {} ({} ms)",
                index, case.artwork_id, self.limit, milliseconds
            ),
        }

        Ok(BenchmarkOutcome {
            artwork_id: case.artwork_id,
            title: case.title,
            position,
            milliseconds,
        })
    }
}

/// Joins a rooted table path like `/static/test/1.jpg` onto the data root
pub fn resolve_query_path(data_root: &Path, query_image_path: &str) -> PathBuf {
    data_root.join(query_image_path.trim_start_matches(['/', '\\']))
}
