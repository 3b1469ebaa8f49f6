//! # artwork_scout
//!
//! Scraping and benchmarking harness for an artwork recognition catalog
//!
//! ## Architecture
//!
//! Four layers, each depending only on the ones below it:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - owns the scarce resources and exposes capabilities
//! - `RetryingHttpClient` - every outbound call, fixed budget with linear backoff
//! - `BoundedScheduler` - at most K tasks in flight, outcomes in submission order
//!
//! ### ② Services and clients
//! - `clients/` - `LensClient` (reverse image search) and `CatalogClient`
//! - `services/` - `ImageResolver` and `ScrapeObserver` seams, `ArtifactWriter`
//!
//! ### ③ Workflow
//! - `workflow/` - what happens to one image (`ImageFlow`) or one case (`CaseFlow`)
//!
//! ### ④ Orchestration
//! - `orchestrator/scrape_processor` - pages in order, images concurrently
//! - `orchestrator/benchmark_processor` - ground truth against the similarity endpoint
//!
//! ## Modules

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use clients::{CatalogClient, LensClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{BoundedScheduler, RetryPolicy, RetryingHttpClient};
pub use models::{AggregateReport, ImageFile, Page, ResolutionOutcome};
pub use orchestrator::{BenchmarkApp, ScrapeApp};
pub use services::{ImageResolver, ScrapeObserver};
