pub mod ground_truth_loader;
pub mod image_loader;

pub use ground_truth_loader::load_benchmark_cases;
pub use image_loader::{list_image_files, load_pages};
