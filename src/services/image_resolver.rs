//! Image resolution capability - service layer
//!
//! Only answers "what is this image called". The orchestrator depends on this
//! trait, never on a concrete provider.

use async_trait::async_trait;

use crate::error::ResolveError;

/// Identifies an image by name
#[async_trait]
pub trait ImageResolver: Send + Sync {
    /// Provider name, used in logs
    fn provider(&self) -> &str;

    /// Resolves raw image bytes to a display name
    async fn resolve(&self, image: Vec<u8>) -> Result<String, ResolveError>;
}
