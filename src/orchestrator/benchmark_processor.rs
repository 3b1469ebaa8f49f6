//! Benchmark processor - orchestration layer
//!
//! Loads the ground-truth table, waits for the catalog, runs every case
//! through the scheduler and persists the aggregate report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::clients::CatalogClient;
use crate::config::{result_file_prefix, Config};
use crate::error::{AppError, AppResult};
use crate::infrastructure::BoundedScheduler;
use crate::models::{load_benchmark_cases, AggregateReport, BenchmarkCase};
use crate::utils::logging::{log_startup, print_benchmark_stats};
use crate::workflow::CaseFlow;

/// Finished benchmark
#[derive(Debug)]
pub struct BenchmarkRun {
    pub report: AggregateReport,
    pub report_path: PathBuf,
}

/// Benchmark application
pub struct BenchmarkApp {
    config: Config,
    catalog: Arc<CatalogClient>,
    scheduler: BoundedScheduler,
}

impl BenchmarkApp {
    pub fn initialize(config: Config) -> Result<Self> {
        let catalog = CatalogClient::from_config(&config).context("failed to build catalog client")?;
        Ok(Self::new(config, catalog))
    }

    pub fn new(config: Config, catalog: CatalogClient) -> Self {
        let scheduler = BoundedScheduler::new(config.max_concurrent_tasks);
        Self {
            config,
            catalog: Arc::new(catalog),
            scheduler,
        }
    }

    /// Blocks until the catalog reports ready
    ///
    /// # Returns
    /// The number of checks it took
    pub async fn wait_for_catalog(&self) -> AppResult<u32> {
        info!("⏳ waiting for the catalog API at {}...", self.catalog.base_url());
        let checks = self
            .catalog
            .wait_until_ready(
                self.config.readiness_poll_interval(),
                self.config.readiness_max_attempts,
            )
            .await?;
        Ok(checks)
    }

    pub async fn run(&self) -> Result<BenchmarkRun> {
        log_startup("benchmark", self.scheduler.limit());

        let table = self.config.ground_truth_path();
        let cases = load_cases(&table)
            .await
            .with_context(|| format!("failed to load ground truth from {}", table.display()))?;
        info!("✓ loaded {} case(s) from {}", cases.len(), table.display());

        self.wait_for_catalog().await?;

        let flow = CaseFlow::new(
            self.catalog.clone(),
            self.config.data_root.clone(),
            self.config.similar_limit,
            self.config.latency_mode(),
        );
        let tasks: Vec<_> = cases
            .into_iter()
            .enumerate()
            .map(|(index, case)| {
                let flow = flow.clone();
                async move { flow.run(index + 1, case).await }
            })
            .collect();

        let settled = self.scheduler.run(tasks).await;
        for (index, outcome) in settled.iter().enumerate() {
            if let Err(e) = outcome {
                warn!("[case {}] ❌ rejected: {}", index + 1, e);
            }
        }

        let report = AggregateReport::from_settled(&settled);
        let report_path = self.config.test_report_file(&result_file_prefix());
        write_report(&report_path, &report).await?;

        print_benchmark_stats(&report, &report_path);
        Ok(BenchmarkRun {
            report,
            report_path,
        })
    }
}

async fn load_cases(table: &Path) -> AppResult<Vec<BenchmarkCase>> {
    Ok(load_benchmark_cases(table).await?)
}

/// Writes `value` as tab-indented JSON, creating the parent directory
pub async fn write_report<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let json = to_tab_indented_json(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent, e))?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path, e))
}

fn to_tab_indented_json<T: Serialize>(value: &T) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
