//! Process configuration for Computer Vision clients.
//!
//! [`VisionConfig`] is read once at startup, validated eagerly, and handed by
//! reference to [`VisionClient::from_config`](crate::client::VisionClient::from_config).
//!
//! ```rust,no_run
//! use azure_vision_core::config::VisionConfig;
//! use azure_vision_core::client::VisionClient;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VisionConfig::from_env()?;
//! let client = VisionClient::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

use secrecy::{ExposeSecret, SecretString};

use crate::auth::VisionCredential;
use crate::error::{VisionError, VisionResult};

/// Environment variable holding the subscription key.
pub const API_KEY_ENV: &str = "COMPUTERVISION_API_KEY";

/// Environment variable holding the Azure region (e.g. `westus`).
pub const REGION_ENV: &str = "COMPUTERVISION_REGION";

/// Optional environment variable overriding the region-derived endpoint.
pub const ENDPOINT_ENV: &str = "COMPUTERVISION_ENDPOINT";

/// Build the regional Cognitive Services endpoint for `region`.
pub fn regional_endpoint(region: &str) -> String {
    format!("https://{region}.api.cognitive.microsoft.com")
}

/// Validated settings needed to talk to a Computer Vision resource.
#[derive(Clone)]
pub struct VisionConfig {
    api_key: SecretString,
    region: String,
    endpoint: Option<String>,
}

impl VisionConfig {
    /// Create a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::MissingConfig`] if either value is empty, and
    /// [`VisionError::InvalidEndpoint`] if the region contains characters
    /// that cannot appear in a host name.
    pub fn new(api_key: impl Into<String>, region: impl Into<String>) -> VisionResult<Self> {
        let api_key = api_key.into();
        let region = region.into().trim().to_string();

        if api_key.is_empty() {
            return Err(VisionError::MissingConfig(format!(
                "{API_KEY_ENV} must not be empty"
            )));
        }
        if region.is_empty() {
            return Err(VisionError::MissingConfig(format!(
                "{REGION_ENV} must not be empty"
            )));
        }
        if !region.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(VisionError::invalid_endpoint(format!(
                "region {region:?} is not a valid host label"
            )));
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            region,
            endpoint: None,
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// Requires `COMPUTERVISION_API_KEY` and `COMPUTERVISION_REGION`.
    /// `COMPUTERVISION_ENDPOINT`, when set, replaces the region-derived host.
    pub fn from_env() -> VisionResult<Self> {
        let api_key = required_env(API_KEY_ENV)?;
        let region = required_env(REGION_ENV)?;
        let mut config = Self::new(api_key, region)?;

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                config = config.with_endpoint(endpoint);
            }
        }

        Ok(config)
    }

    /// Override the endpoint derived from the region.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The configured Azure region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| regional_endpoint(&self.region))
    }

    /// The credential derived from the subscription key.
    pub fn credential(&self) -> VisionCredential {
        VisionCredential::subscription_key(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &"****")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn required_env(name: &str) -> VisionResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(VisionError::MissingConfig(format!("{name} is not set"))),
    }
}
