/// Catalog API client
///
/// Wraps every catalog endpoint; all calls go through the retrying HTTP client.
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CatalogError, HttpError};
use crate::infrastructure::http_client::{decode_json, read_text};
use crate::infrastructure::{RetryPolicy, RetryingHttpClient};
use crate::models::{Artist, Artwork, NewArtwork, SimilarArtwork};

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: RetryingHttpClient,
}

impl CatalogClient {
    pub fn new(http: RetryingHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config) -> Result<Self, HttpError> {
        Ok(Self::new(RetryingHttpClient::new(
            config.api_base_url.clone(),
            config.retry_policy(),
        )?))
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Readiness check: `GET /` answers `{"status": <truthy>}` once the database is up
    ///
    /// One request per check, the polling loop is the retry. Any failure reads
    /// as "not ready".
    pub async fn is_ready(&self) -> bool {
        let once = self.http.with_policy(RetryPolicy::new(1, Duration::ZERO));
        match once.get_json::<Value>("/").await {
            Ok(body) => body.get("status").map(is_truthy).unwrap_or(false),
            Err(e) => {
                debug!("readiness check failed: {}", e);
                false
            }
        }
    }

    /// Polls the readiness check until it succeeds
    ///
    /// # Arguments
    /// - `poll_interval`: pause between checks
    /// - `max_attempts`: checks before giving up, 0 polls forever
    ///
    /// # Returns
    /// The number of checks it took
    pub async fn wait_until_ready(
        &self,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<u32, CatalogError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            if self.is_ready().await {
                info!("✓ catalog API ready after {} check(s)", attempt);
                return Ok(attempt);
            }

            if max_attempts != 0 && attempt >= max_attempts {
                return Err(CatalogError::NotReady { attempts: attempt });
            }

            warn!(
                "catalog API not ready (check {}), waiting {:?}...",
                attempt, poll_interval
            );
            sleep(poll_interval).await;
        }
    }

    pub async fn all_artworks(&self) -> Result<Vec<Artwork>, HttpError> {
        self.http.get_json("/artworks").await
    }

    pub async fn random_artworks(&self, limit: Option<u32>) -> Result<Vec<Artwork>, HttpError> {
        let endpoint = match limit {
            Some(limit) => format!("/artworks/random?limit={}", limit),
            None => "/artworks/random".to_string(),
        };
        self.http.get_json(&endpoint).await
    }

    pub async fn artwork(&self, artwork_id: &str) -> Result<Artwork, HttpError> {
        self.http
            .get_json(&format!("/artworks/{}", artwork_id))
            .await
    }

    /// Artworks ranked by similarity to a catalog artwork
    pub async fn similar_to_artwork(
        &self,
        artwork_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<SimilarArtwork>, HttpError> {
        let mut endpoint = format!("/artworks/similar/{}", artwork_id);
        if let Some(limit) = limit {
            endpoint.push_str(&format!("?limit={}", limit));
        }
        self.http.get_json(&endpoint).await
    }

    /// Artworks ranked by similarity to an uploaded image
    pub async fn similar_to_image(
        &self,
        image: Vec<u8>,
        file_name: &str,
        limit: u32,
    ) -> Result<Vec<SimilarArtwork>, HttpError> {
        let endpoint = "/artworks/similar";
        let response = self
            .http
            .send(endpoint, |client, url| {
                let part = Part::bytes(image.clone()).file_name(file_name.to_string());
                client
                    .post(url)
                    .query(&[("limit", limit)])
                    .multipart(Form::new().part("image", part))
            })
            .await?;

        let body = read_text(endpoint, response).await?;
        decode_json(endpoint, &body)
    }

    pub async fn add_artwork(&self, artwork: &NewArtwork) -> Result<Artwork, HttpError> {
        let endpoint = "/artworks";
        let response = self
            .http
            .send(endpoint, |client, url| {
                let part =
                    Part::bytes(artwork.image.clone()).file_name(artwork.file_name.clone());
                let form = Form::new()
                    .text("title", artwork.title.clone())
                    .text("artist_id", artwork.artist_id.clone())
                    .part("image", part);
                client.post(url).multipart(form)
            })
            .await?;

        let body = read_text(endpoint, response).await?;
        decode_json(endpoint, &body)
    }

    pub async fn artists(&self) -> Result<Vec<Artist>, HttpError> {
        self.http.get_json("/artists").await
    }

    pub async fn artist(&self, artist_id: &str) -> Result<Artist, HttpError> {
        self.http.get_json(&format!("/artists/{}", artist_id)).await
    }
}

/// Loose truthiness of a JSON status flag
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
