//! Reverse-image-search client
//!
//! Implements the provider's three-step protocol:
//!
//! 1. **initiate** a resumable upload; the session token comes back in the
//!    `x-guploader-uploadid` header
//! 2. **upload** the whole image in one request (`upload, finalize`, offset 0);
//!    the body is JSON behind a 4-byte framing prefix and holds the result URL
//! 3. **fetch** the result page and pull the matched label out of the localized
//!    "Buscar ... con imágenes" banner

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{HttpError, ResolveError};
use crate::infrastructure::http_client::read_text;
use crate::infrastructure::RetryingHttpClient;
use crate::services::ImageResolver;

pub const DEFAULT_LENS_BASE_URL: &str = "https://lens.google.com";

const UPLOAD_ENDPOINT: &str = "/_/upload/?hl=es-AR";
const SESSION_HEADER: &str = "x-guploader-uploadid";
const ENVELOPE_PREFIX_LEN: usize = 4;
const RESULT_BANNER_PATTERN: &str = r#""Buscar (?P<name>[^"]+) con imágenes""#;

fn result_banner_regex() -> Result<&'static Regex, ResolveError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(RESULT_BANNER_PATTERN))
        .as_ref()
        .map_err(|e| ResolveError::Pattern(e.clone()))
}

/// Single-use upload session
#[derive(Debug, PartialEq, Eq)]
pub struct UploadSession {
    token: String,
}

impl UploadSession {
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    url: String,
}

/// Reverse-image-search client
#[derive(Debug, Clone)]
pub struct LensClient {
    http: RetryingHttpClient,
}

impl LensClient {
    pub fn new(http: RetryingHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config) -> Result<Self, HttpError> {
        Ok(Self::new(RetryingHttpClient::new(
            config.lens_base_url.clone(),
            config.retry_policy(),
        )?))
    }

    /// Step 1: opens a resumable upload session
    pub async fn initiate(&self) -> Result<UploadSession, ResolveError> {
        let response = self
            .http
            .send(UPLOAD_ENDPOINT, |client, url| {
                client
                    .post(url)
                    .header("sec-fetch-dest", "empty")
                    .header("sec-fetch-mode", "cors")
                    .header("sec-fetch-site", "same-origin")
                    .header("x-client-side-image-upload", "true")
                    .header("x-goog-upload-command", "start")
                    .header("x-goog-upload-protocol", "resumable")
            })
            .await?;

        let token = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ResolveError::Upload {
                reason: format!("initiate response has no {} header", SESSION_HEADER),
            })?;

        debug!("upload session opened");
        Ok(UploadSession {
            token: token.to_string(),
        })
    }

    /// Step 2: uploads the image in one shot and returns the result URL
    pub async fn upload(
        &self,
        session: UploadSession,
        image: Vec<u8>,
    ) -> Result<String, ResolveError> {
        let endpoint = format!(
            "{}&upload_id={}&upload_protocol=resumable",
            UPLOAD_ENDPOINT,
            session.token()
        );

        let response = self
            .http
            .send(&endpoint, |client, url| {
                client
                    .post(url)
                    .header(
                        "content-type",
                        "application/x-www-form-urlencoded;charset=utf-8",
                    )
                    .header("sec-fetch-dest", "empty")
                    .header("sec-fetch-mode", "cors")
                    .header("sec-fetch-site", "same-origin")
                    .header("x-client-side-image-upload", "true")
                    .header("x-goog-upload-command", "upload, finalize")
                    .header("x-goog-upload-offset", "0")
                    .body(image.clone())
            })
            .await?;

        let body = read_text(&endpoint, response).await?;
        parse_upload_envelope(&body)
    }

    /// Step 3: fetches the result page and extracts the matched name
    pub async fn fetch_result(&self, result_url: &str) -> Result<String, ResolveError> {
        let html = self.http.get_text(result_url).await?;
        extract_match(&html)
    }
}

#[async_trait]
impl ImageResolver for LensClient {
    fn provider(&self) -> &str {
        self.http.base_url()
    }

    async fn resolve(&self, image: Vec<u8>) -> Result<String, ResolveError> {
        let session = self.initiate().await?;
        let result_url = self.upload(session, image).await?;
        self.fetch_result(&result_url).await
    }
}

/// Strips the framing prefix and reads the result URL
pub fn parse_upload_envelope(body: &str) -> Result<String, ResolveError> {
    let json = body
        .get(ENVELOPE_PREFIX_LEN..)
        .ok_or_else(|| ResolveError::Parse {
            reason: format!("body shorter than the {}-byte prefix", ENVELOPE_PREFIX_LEN),
        })?;

    let envelope: UploadEnvelope =
        serde_json::from_str(json).map_err(|e| ResolveError::Parse {
            reason: e.to_string(),
        })?;

    Ok(envelope.url)
}

/// Pulls the quoted label out of the result banner
pub fn extract_match(html: &str) -> Result<String, ResolveError> {
    result_banner_regex()?
        .captures(html)
        .and_then(|captures| captures.name("name"))
        .map(|name| name.as_str().to_string())
        .ok_or(ResolveError::NoMatch)
}
