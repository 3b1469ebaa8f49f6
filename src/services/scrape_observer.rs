//! Scrape observer - service layer
//!
//! Hooks the scraping orchestrator calls around each page. The default
//! implementation writes two artifacts:
//!
//! - **items**: one SQL statement per image, grouped under a page header,
//!   ready to be loaded into the catalog database
//! - **report**: one line per page with the settled results as JSON

use std::path::Path;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Page, ResolutionOutcome, SettledRecord};
use crate::services::ArtifactWriter;

/// Page lifecycle hooks
///
/// For a given page, `before_page` runs before any `on_item`, and
/// `after_page` runs once every item has settled.
#[async_trait]
pub trait ScrapeObserver: Send + Sync {
    async fn before_page(&self, page: &Page) -> AppResult<()>;

    /// Called from inside the item's task, concurrently with its siblings
    async fn on_item(&self, outcome: &ResolutionOutcome) -> AppResult<()>;

    async fn after_page(&self, page: &Page, results: &[SettledRecord]) -> AppResult<()>;
}

/// Writes the items and report artifacts
pub struct ArtifactObserver {
    items: ArtifactWriter,
    report: ArtifactWriter,
}

impl ArtifactObserver {
    pub fn new(items: ArtifactWriter, report: ArtifactWriter) -> Self {
        Self { items, report }
    }

    pub fn items_path(&self) -> &Path {
        self.items.path()
    }

    pub fn report_path(&self) -> &Path {
        self.report.path()
    }
}

#[async_trait]
impl ScrapeObserver for ArtifactObserver {
    async fn before_page(&self, page: &Page) -> AppResult<()> {
        self.items.append_line(&format_page_header(&page.name)).await
    }

    async fn on_item(&self, outcome: &ResolutionOutcome) -> AppResult<()> {
        self.items.append_line(&format_item_statement(outcome)).await
    }

    async fn after_page(&self, page: &Page, results: &[SettledRecord]) -> AppResult<()> {
        let json = serde_json::to_string(results)?;
        self.report
            .append_line(&format!("Results for page {}: {}", page.name, json))
            .await
    }
}

/// `-- Items for artist <page>:`
pub fn format_page_header(page_name: &str) -> String {
    format!("-- Items for artist {}:", page_name)
}

/// Insert statement for one image; `artistId` is left for the loader to bind
pub fn format_item_statement(outcome: &ResolutionOutcome) -> String {
    let title = outcome
        .resolved_name
        .as_deref()
        .map(sql_quote)
        .unwrap_or_else(|| "null".to_string());
    let file_name = sql_quote(&outcome.image.file_name);

    format!(
        "INSERT INTO artwork (title, artist_id, filename) VALUES ({}, artistId, {});",
        title, file_name
    )
}

fn sql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageFile;

    fn image(name: &str) -> ImageFile {
        ImageFile::from_path(name).unwrap()
    }

    #[test]
    fn test_statement_for_resolved_image() {
        let outcome = ResolutionOutcome::resolved(image("berni_1.jpg"), "Juanito's kite");
        assert_eq!(
            format_item_statement(&outcome),
            "INSERT INTO artwork (title, artist_id, filename) VALUES ('Juanito''s kite', artistId, 'berni_1.jpg');"
        );
    }

    #[test]
    fn test_statement_for_unresolved_image() {
        let outcome = ResolutionOutcome::unresolved(image("berni_2.jpg"), "no match");
        assert_eq!(
            format_item_statement(&outcome),
            "INSERT INTO artwork (title, artist_id, filename) VALUES (null, artistId, 'berni_2.jpg');"
        );
    }

    #[test]
    fn test_page_header() {
        assert_eq!(format_page_header("berni"), "-- Items for artist berni:");
    }

    #[tokio::test]
    async fn test_artifact_observer_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let observer = ArtifactObserver::new(
            ArtifactWriter::new(dir.path().join("items.sql")),
            ArtifactWriter::new(dir.path().join("report.log")),
        );
        let page = Page {
            name: "mona".to_string(),
            images: vec![image("mona_1.jpg")],
        };
        let outcome = ResolutionOutcome::resolved(image("mona_1.jpg"), "Mona Lisa");

        observer.before_page(&page).await.unwrap();
        observer.on_item(&outcome).await.unwrap();
        observer
            .after_page(
                &page,
                &[SettledRecord::Fulfilled {
                    value: outcome.clone(),
                }],
            )
            .await
            .unwrap();

        let items = std::fs::read_to_string(observer.items_path()).unwrap();
        assert_eq!(
            items,
            "-- Items for artist mona:\n\
             INSERT INTO artwork (title, artist_id, filename) VALUES ('Mona Lisa', artistId, 'mona_1.jpg');\n"
        );

        let report = std::fs::read_to_string(observer.report_path()).unwrap();
        assert!(report.starts_with("Results for page mona: [{\"status\":\"fulfilled\""));
        assert!(report.ends_with("\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_report_keeps_results_for_non_utf8_directories() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join(OsStr::from_bytes(b"imgs\xff"));
        let mona = ImageFile::from_path(images.join("mona_1.jpg")).unwrap();
        let observer = ArtifactObserver::new(
            ArtifactWriter::new(dir.path().join("items.sql")),
            ArtifactWriter::new(dir.path().join("report.log")),
        );
        let page = Page {
            name: "mona".to_string(),
            images: vec![mona.clone()],
        };

        observer
            .after_page(
                &page,
                &[SettledRecord::Fulfilled {
                    value: ResolutionOutcome::resolved(mona, "Mona Lisa"),
                }],
            )
            .await
            .unwrap();

        let report = std::fs::read_to_string(observer.report_path()).unwrap();
        assert!(report.contains("\"resolvedName\":\"Mona Lisa\""));
        assert!(report.contains("imgs\u{FFFD}"));
    }
}
