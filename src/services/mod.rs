pub mod artifact_writer;
pub mod image_resolver;
pub mod scrape_observer;

pub use artifact_writer::ArtifactWriter;
pub use image_resolver::ImageResolver;
pub use scrape_observer::{ArtifactObserver, ScrapeObserver};
