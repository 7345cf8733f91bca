use crate::config::API_KEY_ENV;
use crate::error::{VisionError, VisionResult};
use secrecy::{ExposeSecret, SecretString};

/// Header carrying a Cognitive Services subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Credential types accepted by the Computer Vision API.
#[derive(Clone)]
pub enum VisionCredential {
    /// Cognitive Services subscription key, sent as `Ocp-Apim-Subscription-Key`.
    SubscriptionKey(SecretString),

    /// A pre-acquired Microsoft Entra ID access token, sent as `Authorization: Bearer`.
    BearerToken(SecretString),
}

impl VisionCredential {
    /// Create a credential from the `COMPUTERVISION_API_KEY` environment variable.
    pub fn from_env() -> VisionResult<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(Self::SubscriptionKey(SecretString::from(key))),
            _ => Err(VisionError::MissingConfig(format!(
                "{API_KEY_ENV} is not set"
            ))),
        }
    }

    /// Create a subscription key credential.
    pub fn subscription_key(key: impl Into<String>) -> Self {
        Self::SubscriptionKey(SecretString::from(key.into()))
    }

    /// Create a bearer token credential.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(SecretString::from(token.into()))
    }

    /// Resolve the credential to the header name and value to send.
    pub(crate) fn header(&self) -> VisionResult<(&'static str, String)> {
        match self {
            Self::SubscriptionKey(key) => {
                let key = key.expose_secret();
                if key.is_empty() {
                    return Err(VisionError::Auth("subscription key is empty".into()));
                }
                Ok((SUBSCRIPTION_KEY_HEADER, key.to_string()))
            }
            Self::BearerToken(token) => {
                let token = token.expose_secret();
                if token.is_empty() {
                    return Err(VisionError::Auth("bearer token is empty".into()));
                }
                Ok(("Authorization", format!("Bearer {token}")))
            }
        }
    }

    /// Attach the credential to an outgoing request.
    pub(crate) fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> VisionResult<reqwest::RequestBuilder> {
        let (name, value) = self.header()?;
        Ok(request.header(name, value))
    }
}

impl std::fmt::Debug for VisionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubscriptionKey(_) => write!(f, "VisionCredential::SubscriptionKey(****)"),
            Self::BearerToken(_) => write!(f, "VisionCredential::BearerToken(****)"),
        }
    }
}
