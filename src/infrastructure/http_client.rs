//! Retrying HTTP client - infrastructure layer
//!
//! Holds the connection pool of one collaborator and exposes a single
//! capability: send a request under the retry policy. Anything other than
//! `200 OK` counts as a failure and is retried.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::HttpError;
use crate::infrastructure::retry::RetryPolicy;

/// Retrying HTTP client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RetryingHttpClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl RetryingHttpClient {
    pub fn new(base_url: impl Into<String>, policy: RetryPolicy) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(concat!("artwork_scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| HttpError::ClientBuild { source })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Same connection pool under another retry policy
    pub fn with_policy(&self, policy: RetryPolicy) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            policy,
        }
    }

    /// Absolute URLs pass through, paths are joined onto the base URL
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Sends a request under the retry policy
    ///
    /// `build` is called once per attempt, so bodies that cannot be cloned
    /// (multipart forms) are rebuilt each time.
    ///
    /// # Returns
    /// The first `200 OK` response, or the failure of the final attempt
    pub async fn send<F>(&self, endpoint: &str, build: F) -> Result<Response, HttpError>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let url = self.url(endpoint);

        self.policy
            .run(&url, |attempt| {
                let request = build(&self.client, &url);
                let url = url.clone();
                async move {
                    debug!("{} (attempt {})", url, attempt);
                    let response =
                        request
                            .send()
                            .await
                            .map_err(|source| HttpError::Transport {
                                endpoint: url.clone(),
                                attempts: attempt,
                                source,
                            })?;

                    if response.status() != StatusCode::OK {
                        return Err(HttpError::Status {
                            endpoint: url,
                            status: response.status().as_u16(),
                            attempts: attempt,
                        });
                    }

                    Ok(response)
                }
            })
            .await
    }

    /// `GET` returning the body as text
    pub async fn get_text(&self, endpoint: &str) -> Result<String, HttpError> {
        let response = self
            .send(endpoint, |client, url| client.get(url))
            .await?;
        read_text(endpoint, response).await
    }

    /// `GET` returning the body decoded as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, HttpError> {
        let body = self.get_text(endpoint).await?;
        decode_json(endpoint, &body)
    }
}

/// Reads a response body as text
pub async fn read_text(endpoint: &str, response: Response) -> Result<String, HttpError> {
    response.text().await.map_err(|source| HttpError::Body {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Decodes a JSON body
pub fn decode_json<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, HttpError> {
    serde_json::from_str(body).map_err(|source| HttpError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
