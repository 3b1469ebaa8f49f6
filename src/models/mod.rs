pub mod benchmark;
pub mod catalog;
pub mod image_file;
pub mod loaders;
pub mod page;
pub mod resolution;

pub use benchmark::{AggregateReport, BenchmarkCase, BenchmarkOutcome, LatencyMode};
pub use catalog::{rank_of, Artist, Artwork, NewArtwork, SimilarArtwork};
pub use image_file::{parse_file_name, ImageFile};
pub use loaders::{list_image_files, load_benchmark_cases, load_pages};
pub use page::{build_pages, group_images, Page, PageSet};
pub use resolution::{ResolutionOutcome, SettledRecord};
