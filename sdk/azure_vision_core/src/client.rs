//! HTTP client for the Azure Computer Vision API.
//!
//! This module provides [`VisionClient`], the main entry point for talking to a
//! Computer Vision resource. The client handles authentication, HTTP transport,
//! endpoint management, and error mapping.
//!
//! # Examples
//!
//! ## From the environment
//! ```rust,no_run
//! use azure_vision_core::client::VisionClient;
//! use azure_vision_core::config::VisionConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VisionConfig::from_env()?;
//! let client = VisionClient::from_config(&config)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Explicit region and key
//! ```rust,no_run
//! use azure_vision_core::client::VisionClient;
//! use azure_vision_core::auth::VisionCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VisionClient::builder()
//!     .region("westus")
//!     .credential(VisionCredential::subscription_key("your-key"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::VisionCredential;
use crate::config::{regional_endpoint, VisionConfig, ENDPOINT_ENV, REGION_ENV};
use crate::error::{VisionError, VisionResult};
use crate::models::ImageSource;
use bytes::Bytes;
use reqwest::Client as HttpClient;
use url::Url;

use std::time::Duration;

/// Default API version, used as the path segment after `/vision/`.
pub const DEFAULT_API_VERSION: &str = "v2.0";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Markers after which a credential may appear in an error body.
const SECRET_MARKERS: &[&str] = &[
    "Bearer ",
    "Ocp-Apim-Subscription-Key: ",
    "Ocp-Apim-Subscription-Key=",
    "subscription-key=",
];

const REDACTED: &str = "[REDACTED]";

/// The base client for interacting with the Computer Vision API.
///
/// Used by `azure_vision_analysis` to make API calls. The client is cheaply
/// cloneable and holds no per-request state, so one handle can serve every
/// call a program makes.
#[derive(Debug, Clone)]
pub struct VisionClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) credential: VisionCredential,
    pub(crate) api_version: String,
}

/// Builder for constructing a [`VisionClient`].
///
/// Use [`VisionClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct VisionClientBuilder {
    endpoint: Option<String>,
    region: Option<String>,
    credential: Option<VisionCredential>,
    api_version: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl VisionClient {
    /// Create a new builder for configuring a `VisionClient`.
    pub fn builder() -> VisionClientBuilder {
        VisionClientBuilder::default()
    }

    /// Build a client from a validated [`VisionConfig`].
    pub fn from_config(config: &VisionConfig) -> VisionResult<Self> {
        Self::builder()
            .endpoint(config.endpoint())
            .credential(config.credential())
            .build()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the API version being used.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the versioned path for a Computer Vision resource.
    ///
    /// `resource` may carry a query string, e.g. `analyze?visualFeatures=Tags`.
    pub fn vision_path(&self, resource: &str) -> String {
        format!(
            "/vision/{}/{}",
            self.api_version,
            resource.trim_start_matches('/')
        )
    }

    /// Build a full URL for an API path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> VisionResult<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| VisionError::invalid_endpoint_with_source("failed to construct URL", e))
    }

    /// Send a GET request to the API.
    ///
    /// Adds the authentication header and maps non-success responses to errors.
    pub async fn get(&self, path: &str) -> VisionResult<reqwest::Response> {
        let url = self.url(path)?;
        let request = self.credential.authorize(self.http.get(url))?;
        Self::send(request).await
    }

    /// Send a POST request with a JSON body to the API.
    pub async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> VisionResult<reqwest::Response> {
        let url = self.url(path)?;
        let request = self.credential.authorize(self.http.post(url).json(body))?;
        Self::send(request).await
    }

    /// Send a POST request with a raw `application/octet-stream` body.
    pub async fn post_bytes(&self, path: &str, data: Bytes) -> VisionResult<reqwest::Response> {
        let url = self.url(path)?;
        let request = self.credential.authorize(
            self.http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(data),
        )?;
        Self::send(request).await
    }

    /// Send a POST request carrying an image, either by URL or by content.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Builder`] for an empty URL or empty image data,
    /// in addition to the transport and service errors of [`Self::post_json`].
    pub async fn post_image(
        &self,
        path: &str,
        source: &ImageSource,
    ) -> VisionResult<reqwest::Response> {
        source.validate()?;
        match source {
            ImageSource::Url(url) => {
                self.post_json(path, &serde_json::json!({ "url": url }))
                    .await
            }
            ImageSource::Bytes(data) => self.post_bytes(path, data.clone()).await,
        }
    }

    async fn send(request: reqwest::RequestBuilder) -> VisionResult<reqwest::Response> {
        let response = request.send().await?;
        tracing::trace!(
            status = response.status().as_u16(),
            url = %response.url(),
            "received response"
        );
        Self::check_response(response).await
    }

    /// Maximum length for error messages to prevent sensitive data leaks.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Redact credentials (bearer tokens, subscription keys) from a message.
    pub(crate) fn sanitize_error_message(msg: &str) -> String {
        let mut result = msg.to_string();

        for marker in SECRET_MARKERS {
            let mut search_start = 0;
            while let Some(relative_pos) = result[search_start..].find(marker) {
                let token_start = search_start + relative_pos + marker.len();

                if result[token_start..].starts_with(REDACTED) {
                    search_start = token_start + REDACTED.len();
                    continue;
                }

                let token_end = result[token_start..]
                    .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '&' | ';'))
                    .map(|pos| token_start + pos)
                    .unwrap_or(result.len());

                if token_end > token_start {
                    result.replace_range(token_start..token_end, REDACTED);
                    search_start = token_start + REDACTED.len();
                } else {
                    search_start = token_start;
                }
            }
        }

        result
    }

    /// Sanitize, then truncate a message that exceeds the maximum length.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let sanitized = Self::sanitize_error_message(msg);

        if sanitized.len() > Self::MAX_ERROR_MESSAGE_LEN {
            let mut end = Self::MAX_ERROR_MESSAGE_LEN;
            while !sanitized.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &sanitized[..end])
        } else {
            sanitized
        }
    }

    /// Check the response status and return an error if not successful.
    ///
    /// The service reports errors either as `{"code", "message"}` at the top
    /// level or nested under `"error"`; both map to [`VisionError::Api`].
    async fn check_response(response: reqwest::Response) -> VisionResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            let err_obj = value.get("error").unwrap_or(&value);
            if let Some(code) = err_obj.get("code").and_then(json_code) {
                let message = err_obj
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or(&body);
                return Err(VisionError::Api {
                    code,
                    message: Self::truncate_message(message),
                });
            }
        }

        Err(VisionError::http(status, Self::truncate_message(&body)))
    }
}

fn json_code(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl VisionClientBuilder {
    /// Set the Computer Vision endpoint URL.
    ///
    /// Takes precedence over [`region`](Self::region). If neither is set, the
    /// builder checks `COMPUTERVISION_ENDPOINT` and then `COMPUTERVISION_REGION`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the Azure region; the endpoint becomes
    /// `https://{region}.api.cognitive.microsoft.com`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder uses [`VisionCredential::from_env()`].
    pub fn credential(mut self, credential: VisionCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the API version path segment.
    ///
    /// Defaults to [`DEFAULT_API_VERSION`] (`v2.0`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** If you provide a custom HTTP client, the timeout settings on
    /// this builder are ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout, covering the whole request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the `VisionClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No endpoint or region is provided by the builder or the environment
    /// - The endpoint URL is invalid
    /// - No credential is provided and `COMPUTERVISION_API_KEY` is not set
    /// - The underlying HTTP client cannot be constructed
    pub fn build(self) -> VisionResult<VisionClient> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT))
                .build()?,
        };

        let endpoint_str = self
            .endpoint
            .or_else(|| self.region.as_deref().map(regional_endpoint))
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|e| !e.is_empty()))
            .or_else(|| {
                std::env::var(REGION_ENV)
                    .ok()
                    .filter(|r| !r.is_empty())
                    .map(|r| regional_endpoint(&r))
            })
            .ok_or_else(|| {
                VisionError::MissingConfig(format!(
                    "endpoint is required. Set it via builder, {ENDPOINT_ENV} or {REGION_ENV}."
                ))
            })?;

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| VisionError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        let credential = match self.credential {
            Some(credential) => credential,
            None => VisionCredential::from_env()?,
        };

        Ok(VisionClient {
            http,
            endpoint,
            credential,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}
