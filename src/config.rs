use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};
use crate::infrastructure::RetryPolicy;
use crate::models::LatencyMode;

/// Program configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog API base URL
    pub api_base_url: String,
    /// Directory holding the images to scrape
    pub images_dir: PathBuf,
    /// Directory holding the benchmark query images and the ground-truth table
    pub test_images_dir: PathBuf,
    /// Ground-truth table, defaults to `<test_images_dir>/artworks.csv`
    pub ground_truth_path: Option<PathBuf>,
    /// Root that the rooted image paths in the ground-truth table are joined onto
    pub data_root: PathBuf,
    /// Benchmark report directory
    pub test_results_dir: PathBuf,
    /// Scraping artifacts directory
    pub scraping_results_dir: PathBuf,
    /// Maximum number of tasks in flight at once
    pub max_concurrent_tasks: usize,
    /// Total attempts per outbound call
    pub retry_attempts: u32,
    /// Backoff unit; attempt n waits (n - 1) units
    pub retry_base_delay_ms: u64,
    /// Interval between readiness checks
    pub readiness_poll_ms: u64,
    /// Checks before giving up, 0 waits forever
    ///
    /// Each check is a single request outside the retry budget, so the wait is
    /// bounded by roughly `readiness_max_attempts * readiness_poll_ms`.
    pub readiness_max_attempts: u32,
    /// Reverse-image-search provider host
    pub lens_base_url: String,
    /// Ranked results requested per similarity query
    pub similar_limit: u32,
    /// Record latency as milliseconds within the second instead of elapsed time
    pub legacy_latency_modulo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8085".to_string(),
            images_dir: PathBuf::from("../static/images/"),
            test_images_dir: PathBuf::from("../static/test/"),
            ground_truth_path: None,
            data_root: PathBuf::from(".."),
            test_results_dir: PathBuf::from("./results/test"),
            scraping_results_dir: PathBuf::from("./results/scraping"),
            max_concurrent_tasks: 50,
            retry_attempts: 5,
            retry_base_delay_ms: 2000,
            readiness_poll_ms: 2000,
            readiness_max_attempts: 150,
            lens_base_url: crate::clients::lens_client::DEFAULT_LENS_BASE_URL.to_string(),
            similar_limit: 5,
            legacy_latency_modulo: false,
        }
    }
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// TOML file, then environment variables on top
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            })?;
        config.with_env_overrides()
    }

    /// `path` when given, environment variables alone otherwise
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        Ok(config)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: env_string("API_BASEURL").unwrap_or(self.api_base_url),
            images_dir: env_path("IMAGES_DIRECTORY_PATH").unwrap_or(self.images_dir),
            test_images_dir: env_path("TEST_IMAGES_DIRECTORY_PATH").unwrap_or(self.test_images_dir),
            ground_truth_path: env_path("GROUND_TRUTH_PATH").or(self.ground_truth_path),
            data_root: env_path("DATA_ROOT").unwrap_or(self.data_root),
            test_results_dir: env_path("TEST_RESULTS_DIRECTORY_PATH")
                .unwrap_or(self.test_results_dir),
            scraping_results_dir: env_path("SCRAPING_RESULTS_DIRECTORY_PATH")
                .unwrap_or(self.scraping_results_dir),
            max_concurrent_tasks: env_parse("MAX_CONCURRENT_TASKS", "usize")?
                .unwrap_or(self.max_concurrent_tasks),
            retry_attempts: env_parse("RETRY_ATTEMPTS", "u32")?.unwrap_or(self.retry_attempts),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS", "u64")?
                .unwrap_or(self.retry_base_delay_ms),
            readiness_poll_ms: env_parse("READINESS_POLL_MS", "u64")?
                .unwrap_or(self.readiness_poll_ms),
            readiness_max_attempts: env_parse("READINESS_MAX_ATTEMPTS", "u32")?
                .unwrap_or(self.readiness_max_attempts),
            lens_base_url: env_string("LENS_BASE_URL").unwrap_or(self.lens_base_url),
            similar_limit: env_parse("SIMILAR_LIMIT", "u32")?.unwrap_or(self.similar_limit),
            legacy_latency_modulo: env_parse("LEGACY_LATENCY_MODULO", "bool")?
                .unwrap_or(self.legacy_latency_modulo),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn readiness_poll_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_poll_ms)
    }

    pub fn latency_mode(&self) -> LatencyMode {
        if self.legacy_latency_modulo {
            LatencyMode::SubSecond
        } else {
            LatencyMode::Elapsed
        }
    }

    pub fn ground_truth_path(&self) -> PathBuf {
        self.ground_truth_path
            .clone()
            .unwrap_or_else(|| self.test_images_dir.join("artworks.csv"))
    }

    /// SQL statements generated by a scraping run
    pub fn artworks_file(&self, prefix: &str) -> PathBuf {
        self.scraping_results_dir
            .join(format!("{}_artworks.sql", prefix))
    }

    /// Per-page settled results of a scraping run
    pub fn scraping_report_file(&self, prefix: &str) -> PathBuf {
        self.scraping_results_dir
            .join(format!("{}_report.log", prefix))
    }

    /// Aggregate benchmark report
    pub fn test_report_file(&self, prefix: &str) -> PathBuf {
        self.test_results_dir.join(format!("{}_report.json", prefix))
    }
}

/// Timestamp prefix shared by the result files of one run
pub fn result_file_prefix() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty())
}

fn env_path(var_name: &str) -> Option<PathBuf> {
    env_string(var_name).map(PathBuf::from)
}

fn env_parse<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match env_string(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
