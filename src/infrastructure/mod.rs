//! Infrastructure layer
//!
//! Owns the scarce resources (HTTP connection pools, concurrency slots) and
//! only exposes capabilities. Nothing here knows about images or artworks.

pub mod http_client;
pub mod retry;
pub mod scheduler;

pub use http_client::RetryingHttpClient;
pub use retry::RetryPolicy;
pub use scheduler::{BoundedScheduler, Settled, TaskFailure};
