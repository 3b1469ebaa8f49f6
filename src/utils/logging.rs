//! Logging helpers
//!
//! Subscriber setup plus the banner lines printed around a run

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::AggregateReport;

/// Installs the global subscriber
///
/// Honours `RUST_LOG`, defaults to `info`. Calling it twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Logs the start-of-run banner
///
/// # Arguments
/// - `mode`: `scrape` or `benchmark`
/// - `max_concurrent`: scheduler limit
pub fn log_startup(mode: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 artwork_scout starting - {} mode", mode);
    info!("📊 max concurrent tasks: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

pub fn log_pages_loaded(pages: usize, images: usize, skipped: usize) {
    info!("✓ found {} image(s) in {} page(s)", images, pages);
    if skipped > 0 {
        info!("⚠️ {} file(s) skipped, not named <name>_<number>.jpg", skipped);
    }
    info!("💡 pages run one after another, images inside a page run concurrently\n");
}

/// Logs the page header
///
/// # Arguments
/// - `index`: page position (1-based)
/// - `total`: number of pages
/// - `name`: group name
/// - `images`: images in the page
pub fn log_page_start(index: usize, total: usize, name: &str, images: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 page {}/{}: {}", index, total, name);
    info!("📄 {} image(s)", images);
    info!("{}", "=".repeat(60));
}

pub fn log_page_complete(index: usize, name: &str, resolved: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ page {} ({}) settled: resolved {}/{}", index, name, resolved, total);
    info!("{}", "─".repeat(60));
}

/// Prints the scraping summary
pub fn print_scrape_stats(pages: usize, resolved: usize, unresolved: usize, rejected: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 scraping finished");
    info!(
        "finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📦 pages: {}", pages);
    info!("📄 items: {}", resolved + unresolved + rejected);
    info!("✅ resolved: {}", resolved);
    info!("❔ unresolved: {}", unresolved);
    info!("❌ rejected: {}", rejected);
    info!("{}", "=".repeat(60));
}

/// Logs where an artifact goes
pub fn log_output_file(label: &str, path: &Path) {
    info!("📝 {} → {}", label, path.display());
}

/// Prints the benchmark summary
pub fn print_benchmark_stats(report: &AggregateReport, report_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 benchmark finished");
    info!(
        "finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🎯 first:     {}/{} ({:.2}%)", report.first, report.total, report.firsts_percentage);
    info!("🥇 top 5:     {}/{} ({:.2}%)", report.firsts5, report.total, report.firsts5_percentage);
    info!("✅ found:     {}/{} ({:.2}%)", report.found, report.total, report.found_percentage);
    info!(
        "❔ not found: {}/{} ({:.2}%)",
        report.not_found, report.total, report.not_found_percentage
    );
    info!("❌ failed:    {} ({:.2}%)", report.failed, report.failed_percentage);
    info!("⏱️ average latency: {:.2} ms", report.milliseconds_average);
    info!("{}", "=".repeat(60));
    info!("report written to: {}", report_path.display());
}

/// Truncates long text for log output
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
