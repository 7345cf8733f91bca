#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

/// Helpers for testing crates built on [`client::VisionClient`] against a
/// `wiremock` fake of the service.
#[cfg(feature = "test-support")]
pub mod test_support {
    use crate::auth::VisionCredential;
    use crate::client::VisionClient;
    use wiremock::MockServer;

    /// Test subscription key (not a real key).
    pub const TEST_API_KEY: &str = "test-api-key";

    /// Create a client pointed at a mock server.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI cannot be parsed, which wiremock never produces.
    pub async fn setup_mock_client(server: &MockServer) -> VisionClient {
        VisionClient::builder()
            .endpoint(server.uri())
            .credential(VisionCredential::subscription_key(TEST_API_KEY))
            .build()
            .expect("should build client")
    }
}

pub use error::VisionError;
