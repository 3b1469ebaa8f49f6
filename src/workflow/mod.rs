pub mod benchmark_flow;
pub mod image_flow;
pub mod item_ctx;

pub use benchmark_flow::CaseFlow;
pub use image_flow::ImageFlow;
pub use item_ctx::ItemCtx;
