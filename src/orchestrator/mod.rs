//! Orchestration layer
//!
//! ```text
//! scrape_processor / benchmark_processor   (whole run, strictly ordered pages)
//!     ↓
//! page_processor                           (one page through the scheduler)
//!     ↓
//! workflow::ImageFlow / workflow::CaseFlow (one image, one case)
//!     ↓
//! services / clients                       (resolver, observer, catalog)
//!     ↓
//! infrastructure                           (retrying HTTP, scheduler)
//! ```
//!
//! Only schedules and counts; no per-item decisions live here.

pub mod benchmark_processor;
pub mod page_processor;
pub mod scrape_processor;

pub use benchmark_processor::{write_report, BenchmarkApp, BenchmarkRun};
pub use page_processor::{process_page, PageStats};
pub use scrape_processor::{ScrapeApp, ScrapeStats};
