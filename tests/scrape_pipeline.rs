use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{body_bytes, header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use artwork_scout::error::{AppResult, ResolveError};
use artwork_scout::infrastructure::{RetryPolicy, RetryingHttpClient};
use artwork_scout::models::SettledRecord;
use artwork_scout::services::{ArtifactObserver, ArtifactWriter};
use artwork_scout::{
    Config, ImageResolver, LensClient, Page, ResolutionOutcome, ScrapeApp, ScrapeObserver,
};

/// Resolves an image to its own bytes read as text
struct TextResolver;

#[async_trait]
impl ImageResolver for TextResolver {
    fn provider(&self) -> &str {
        "text"
    }

    async fn resolve(&self, image: Vec<u8>) -> Result<String, ResolveError> {
        match String::from_utf8(image) {
            Ok(name) if !name.is_empty() => Ok(name),
            _ => Err(ResolveError::NoMatch),
        }
    }
}

#[derive(Default)]
struct Journal {
    events: Mutex<Vec<String>>,
}

impl Journal {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScrapeObserver for Journal {
    async fn before_page(&self, page: &Page) -> AppResult<()> {
        self.events.lock().unwrap().push(format!("start {}", page.name));
        Ok(())
    }

    async fn on_item(&self, outcome: &ResolutionOutcome) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("item {}", outcome.image.file_name));
        Ok(())
    }

    async fn after_page(&self, page: &Page, results: &[SettledRecord]) -> AppResult<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("settled {} {}", page.name, results.len()));
        Ok(())
    }
}

fn write_images(dir: &Path, images: &[(&str, &str)]) {
    for (name, content) in images {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

fn config_for(images_dir: &Path) -> Config {
    Config {
        images_dir: images_dir.to_path_buf(),
        max_concurrent_tasks: 2,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_pages_run_in_order_with_framed_items() {
    let dir = tempfile::tempdir().unwrap();
    write_images(
        dir.path(),
        &[
            ("vinci_10.jpg", "Virgin of the Rocks"),
            ("mona_2.jpg", "Mona Lisa II"),
            ("vinci_1.jpg", "Last Supper"),
            ("mona_1.jpg", "Mona Lisa"),
            ("notes.txt", "not an image"),
        ],
    );

    let journal = Arc::new(Journal::default());
    let app = ScrapeApp::with_parts(config_for(dir.path()), Arc::new(TextResolver), journal.clone());

    let stats = app.run().await.unwrap();

    assert_eq!(stats.pages, 2);
    assert_eq!(stats.images, 4);
    assert_eq!(stats.resolved, 4);
    assert_eq!(stats.skipped, 1);

    let events = journal.events();
    assert_eq!(events.len(), 8);
    assert_eq!(events[0], "start mona");
    let mut mona_items = events[1..3].to_vec();
    mona_items.sort();
    assert_eq!(mona_items, vec!["item mona_1.jpg", "item mona_2.jpg"]);
    assert_eq!(events[3], "settled mona 2");
    assert_eq!(events[4], "start vinci");
    let mut vinci_items = events[5..7].to_vec();
    vinci_items.sort();
    assert_eq!(vinci_items, vec!["item vinci_1.jpg", "item vinci_10.jpg"]);
    assert_eq!(events[7], "settled vinci 2");
}

#[tokio::test]
async fn test_artifacts_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    write_images(
        &images,
        &[("berni_1.jpg", "Juanito's kite"), ("berni_2.jpg", "")],
    );

    let items_path = dir.path().join("out/run_artworks.sql");
    let report_path = dir.path().join("out/run_report.log");
    let observer = Arc::new(ArtifactObserver::new(
        ArtifactWriter::new(&items_path),
        ArtifactWriter::new(&report_path),
    ));

    let app = ScrapeApp::with_parts(config_for(&images), Arc::new(TextResolver), observer);
    let stats = app.run().await.unwrap();
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.unresolved, 1);

    let items = std::fs::read_to_string(&items_path).unwrap();
    let lines: Vec<&str> = items.lines().collect();
    assert_eq!(lines[0], "-- Items for artist berni:");
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(
        &"INSERT INTO artwork (title, artist_id, filename) VALUES ('Juanito''s kite', artistId, 'berni_1.jpg');"
    ));
    assert!(lines.contains(
        &"INSERT INTO artwork (title, artist_id, filename) VALUES (null, artistId, 'berni_2.jpg');"
    ));

    let report = std::fs::read_to_string(&report_path).unwrap();
    let json = report
        .trim_end()
        .strip_prefix("Results for page berni: ")
        .unwrap();
    let records: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 2);
    assert_eq!(records[0]["status"], "fulfilled");
    assert_eq!(records[0]["value"]["resolvedName"], "Juanito's kite");
    assert_eq!(records[1]["value"]["resolvedName"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_scrape_through_lens_protocol() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_/upload/"))
        .and(header("x-goog-upload-command", "start"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-guploader-uploadid", "tok"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_/upload/"))
        .and(headers("x-goog-upload-command", vec!["upload", "finalize"]))
        .and(body_bytes(b"good".to_vec()))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(")]}'{\"url\":\"/search?p=1\"}"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_/upload/"))
        .and(headers("x-goog-upload-command", vec!["upload", "finalize"]))
        .and(body_bytes(b"bad".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_string(")]}'not json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<a>\"Buscar La Noche Estrellada con imágenes\"</a>"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_images(dir.path(), &[("gogh_1.jpg", "good"), ("gogh_2.jpg", "bad")]);

    let lens = LensClient::new(
        RetryingHttpClient::new(server.uri(), RetryPolicy::new(1, Duration::ZERO)).unwrap(),
    );
    let journal = Arc::new(Journal::default());
    let app = ScrapeApp::with_parts(config_for(dir.path()), Arc::new(lens), journal.clone());

    let stats = app.run().await.unwrap();
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.unresolved, 1);
    assert_eq!(stats.rejected, 0);
}

#[tokio::test]
async fn test_missing_images_directory_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let app = ScrapeApp::with_parts(
        config_for(&dir.path().join("missing")),
        Arc::new(TextResolver),
        Arc::new(Journal::default()),
    );

    assert!(app.run().await.is_err());
}
