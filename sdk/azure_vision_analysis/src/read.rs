//! Asynchronous batch text recognition ("Read").
//!
//! Reading text is a long-running operation:
//!
//! 1. [`batch_read`] submits the image and returns a [`ReadOperation`] whose
//!    id is taken from the `Operation-Location` response header.
//! 2. [`get_read_result`] fetches the current [`OperationStatus`].
//! 3. [`poll_until_complete`] repeats step 2 at a fixed interval until the
//!    status is terminal, giving up after [`PollOptions::max_attempts`].
//!
//! [`read_text`] runs all three and turns a non-success terminal status into
//! [`VisionError::OperationFailed`]. The `_or_cancelled` variants additionally
//! take a [`CancellationToken`]; once it is cancelled, the submission or the
//! wait is abandoned with [`VisionError::Cancelled`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_vision_core::client::VisionClient;
//! use azure_vision_core::models::ImageSource;
//! use azure_vision_analysis::read::{self, PollOptions, TextRecognitionMode};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(client: &VisionClient) -> azure_vision_core::error::VisionResult<()> {
//! let cancel = CancellationToken::new();
//! let on_ctrl_c = cancel.clone();
//! tokio::spawn(async move {
//!     if tokio::signal::ctrl_c().await.is_ok() {
//!         on_ctrl_c.cancel();
//!     }
//! });
//!
//! let source = ImageSource::from_file("resources/handwritten_text.jpg").await?;
//! let pages = read::read_text_or_cancelled(
//!     client,
//!     &source,
//!     TextRecognitionMode::Handwritten,
//!     &PollOptions::default(),
//!     &cancel,
//! )
//! .await?;
//!
//! for line in pages.iter().flat_map(|p| &p.lines) {
//!     println!("{}", line.text);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use azure_vision_core::client::VisionClient;
use azure_vision_core::error::{VisionError, VisionResult};
use azure_vision_core::models::ImageSource;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Number of trailing characters of `Operation-Location` that form the id.
pub const OPERATION_ID_LEN: usize = 36;

/// Default delay between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of status queries before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// The kind of text to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRecognitionMode {
    Handwritten,
    Printed,
}

impl TextRecognitionMode {
    /// Returns the API string representation of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handwritten => "Handwritten",
            Self::Printed => "Printed",
        }
    }
}

/// How to wait for an operation to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between status queries.
    pub interval: Duration,
    /// Maximum number of status queries. `0` disables the limit.
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollOptions {
    /// Poll at the default interval with no attempt limit.
    ///
    /// Pair this with a cancellation future or an external timeout.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Sets the delay between status queries.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the maximum number of status queries (`0` for no limit).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A submitted read operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOperation {
    /// The full URL returned in `Operation-Location`.
    pub operation_location: String,
    /// The trailing job identifier of `operation_location`.
    pub operation_id: String,
}

/// The status of a read operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OperationStatus {
    #[serde(alias = "notStarted")]
    NotStarted,
    #[serde(alias = "running")]
    Running,
    #[serde(alias = "failed")]
    Failed,
    #[serde(alias = "succeeded")]
    Succeeded,
    /// A status this client does not know; treated as terminal.
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    /// Returns `true` once the status can no longer change.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::NotStarted | Self::Running)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A recognized word.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Eight numbers: the four corners clockwise from top-left.
    pub bounding_box: Vec<f64>,
    pub text: String,
    /// `Low` when the service is unsure of the word.
    pub confidence: Option<String>,
}

/// A recognized line of text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Eight numbers: the four corners clockwise from top-left.
    pub bounding_box: Vec<f64>,
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Text recognized on one page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecognitionResult {
    pub page: Option<u32>,
    pub clockwise_orientation: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// `pixel` for images, `inch` for PDFs.
    pub unit: Option<String>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

/// The state of a read operation as reported by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: OperationStatus,
    /// Present only once the status is `Succeeded`.
    pub recognition_results: Option<Vec<TextRecognitionResult>>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Extract the job identifier from an `Operation-Location` value.
///
/// The service puts the 36-character id at the end of the URL.
///
/// ```rust
/// use azure_vision_analysis::read::operation_id_from_location;
///
/// let id = operation_id_from_location(
///     "https://westus.api.cognitive.microsoft.com/vision/v2.0/read/operations/abcdef0123456789abcdef0123456789abcd",
/// )
/// .unwrap();
/// assert_eq!(id, "abcdef0123456789abcdef0123456789abcd");
/// ```
///
/// # Errors
///
/// Returns [`VisionError::Api`] with code `InvalidOperationLocation` if the
/// value is shorter than [`OPERATION_ID_LEN`].
pub fn operation_id_from_location(location: &str) -> VisionResult<String> {
    let location = location.trim_end();
    location
        .len()
        .checked_sub(OPERATION_ID_LEN)
        .and_then(|start| location.get(start..))
        .map(str::to_string)
        .ok_or_else(|| VisionError::Api {
            code: "InvalidOperationLocation".into(),
            message: format!(
                "Operation-Location {location:?} is too short to hold a {OPERATION_ID_LEN}-character operation id"
            ),
        })
}

/// Submit an image for text recognition.
///
/// The service answers `202 Accepted` with an `Operation-Location` header.
///
/// # Tracing
///
/// Emits a span named `vision::read::batch_read` with field `mode`.
#[tracing::instrument(
    name = "vision::read::batch_read",
    skip(client, source),
    fields(mode = mode.as_str(), source = %source.describe())
)]
pub async fn batch_read(
    client: &VisionClient,
    source: &ImageSource,
    mode: TextRecognitionMode,
) -> VisionResult<ReadOperation> {
    tracing::debug!("submitting image for text recognition");

    let path = client.vision_path(&format!("read/core/asyncBatchAnalyze?mode={}", mode.as_str()));
    let response = client.post_image(&path, source).await?;

    let operation_location = response
        .headers()
        .get("Operation-Location")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| VisionError::Api {
            code: "MissingHeader".into(),
            message: "Operation-Location header missing from response".into(),
        })?;
    let operation_id = operation_id_from_location(&operation_location)?;

    tracing::debug!(operation_id = %operation_id, "text recognition submitted");

    Ok(ReadOperation {
        operation_location,
        operation_id,
    })
}

/// Fetch the current state of a read operation.
#[tracing::instrument(
    name = "vision::read::get_read_result",
    skip(client),
    fields(operation_id = %operation_id)
)]
pub async fn get_read_result(
    client: &VisionClient,
    operation_id: &str,
) -> VisionResult<ReadOperationResult> {
    let path = client.vision_path(&format!("read/operations/{operation_id}"));
    let response = client.get(&path).await?;
    let result = response.json::<ReadOperationResult>().await?;

    tracing::debug!(status = %result.status, "read result fetched");
    Ok(result)
}

/// Poll a read operation until it reaches a terminal status.
///
/// Returns the final [`ReadOperationResult`] for any terminal status,
/// including `Failed`; the caller decides what a failure means.
///
/// # Errors
///
/// Returns [`VisionError::PollTimeout`] if `options.max_attempts` status
/// queries all report a non-terminal status.
///
/// # Tracing
///
/// Emits a span named `vision::read::poll_until_complete`.
#[tracing::instrument(
    name = "vision::read::poll_until_complete",
    skip(client, options),
    fields(
        operation_id = %operation_id,
        max_attempts = options.max_attempts,
    )
)]
pub async fn poll_until_complete(
    client: &VisionClient,
    operation_id: &str,
    options: &PollOptions,
) -> VisionResult<ReadOperationResult> {
    tracing::debug!("starting to poll for completion");

    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);

        let result = get_read_result(client, operation_id).await?;

        if result.status.is_terminal() {
            tracing::debug!(status = %result.status, attempts, "operation reached terminal status");
            return Ok(result);
        }

        if options.max_attempts > 0 && attempts >= options.max_attempts {
            tracing::warn!(attempts, "operation did not finish in time");
            return Err(VisionError::PollTimeout {
                operation_id: operation_id.to_string(),
                attempts,
            });
        }

        tracing::trace!(
            status = %result.status,
            attempt = attempts,
            "operation still in progress, waiting",
        );
        tokio::time::sleep(options.interval).await;
    }
}

/// Like [`poll_until_complete`], but abandons the wait once `cancel` is
/// cancelled.
///
/// # Errors
///
/// Returns [`VisionError::Cancelled`] if `cancel` fires first, including when
/// it was already cancelled before the first query.
pub async fn poll_until_complete_or_cancelled(
    client: &VisionClient,
    operation_id: &str,
    options: &PollOptions,
    cancel: &CancellationToken,
) -> VisionResult<ReadOperationResult> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::info!(operation_id, "polling cancelled");
            Err(VisionError::Cancelled {
                operation_id: Some(operation_id.to_string()),
            })
        }
        result = poll_until_complete(client, operation_id, options) => result,
    }
}

/// Submit an image, wait for recognition, and return the recognized pages.
///
/// # Errors
///
/// Returns [`VisionError::OperationFailed`] if the operation finishes with
/// any status other than `Succeeded`, and [`VisionError::PollTimeout`] if it
/// does not finish within `options.max_attempts` queries.
pub async fn read_text(
    client: &VisionClient,
    source: &ImageSource,
    mode: TextRecognitionMode,
    options: &PollOptions,
) -> VisionResult<Vec<TextRecognitionResult>> {
    let operation = batch_read(client, source, mode).await?;
    let result = poll_until_complete(client, &operation.operation_id, options).await?;
    recognized_pages(operation, result)
}

/// Like [`read_text`], but abandons the submission or the wait once `cancel`
/// is cancelled.
///
/// # Errors
///
/// Returns [`VisionError::Cancelled`] without an operation id if `cancel`
/// fires before the service accepts the image, and with one afterwards.
pub async fn read_text_or_cancelled(
    client: &VisionClient,
    source: &ImageSource,
    mode: TextRecognitionMode,
    options: &PollOptions,
    cancel: &CancellationToken,
) -> VisionResult<Vec<TextRecognitionResult>> {
    let operation = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::info!(mode = mode.as_str(), "submission cancelled");
            return Err(VisionError::Cancelled { operation_id: None });
        }
        operation = batch_read(client, source, mode) => operation?,
    };
    let result =
        poll_until_complete_or_cancelled(client, &operation.operation_id, options, cancel).await?;
    recognized_pages(operation, result)
}

fn recognized_pages(
    operation: ReadOperation,
    result: ReadOperationResult,
) -> VisionResult<Vec<TextRecognitionResult>> {
    match result.status {
        OperationStatus::Succeeded => Ok(result.recognition_results.unwrap_or_default()),
        status => Err(VisionError::OperationFailed {
            operation_id: operation.operation_id,
            status: status.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_mock_client;
    use wiremock::matchers::{header, method, path as match_path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OP_ID: &str = "abcdef0123456789abcdef0123456789abcd";

    fn op_path() -> String {
        format!("/vision/v2.0/read/operations/{OP_ID}")
    }

    fn fast() -> PollOptions {
        PollOptions::default().with_interval(Duration::from_millis(5))
    }

    fn succeeded_body() -> serde_json::Value {
        serde_json::json!({
            "status": "Succeeded",
            "recognitionResults": [{
                "page": 1,
                "clockwiseOrientation": 349.59,
                "width": 3200,
                "height": 3200,
                "unit": "pixel",
                "lines": [
                    {"boundingBox": [202, 618, 2047, 643, 2046, 840, 200, 813],
                     "text": "Hello",
                     "words": [{"boundingBox": [204, 627, 481, 628, 481, 830, 204, 829], "text": "Hello"}]},
                    {"boundingBox": [206, 1000, 1300, 1010, 1300, 1200, 206, 1190],
                     "text": "World",
                     "words": [{"boundingBox": [206, 1000, 1300, 1010, 1300, 1200, 206, 1190],
                                "text": "World", "confidence": "Low"}]}
                ]
            }]
        })
    }

    async fn mount_status(server: &MockServer, status: &str, times: Option<u64>, expect: Option<u64>) {
        let mut mock = Mock::given(method("GET"))
            .and(match_path(op_path()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": status})),
            );
        if let Some(n) = times {
            mock = mock.up_to_n_times(n);
        }
        if let Some(n) = expect {
            mock = mock.expect(n);
        }
        mock.mount(server).await;
    }

    // -----------------------------------------------------------------------
    // Operation id extraction
    // -----------------------------------------------------------------------

    #[test]
    fn test_operation_id_is_trailing_36_chars() {
        let location = format!("https://westus.api.cognitive.microsoft.com/vision/v2.0/read/operations/{OP_ID}");
        assert_eq!(operation_id_from_location(&location).unwrap(), OP_ID);
        assert_eq!(operation_id_from_location(&format!(".../{OP_ID}")).unwrap(), OP_ID);
        assert_eq!(operation_id_from_location(OP_ID).unwrap(), OP_ID);
    }

    #[test]
    fn test_operation_id_ignores_trailing_whitespace() {
        let location = format!("https://host/read/operations/{OP_ID}\r\n");
        assert_eq!(operation_id_from_location(&location).unwrap(), OP_ID);
    }

    #[test]
    fn test_operation_id_too_short() {
        let err = operation_id_from_location("https://x/abc").expect_err("too short");
        assert!(
            matches!(&err, VisionError::Api { code, .. } if code == "InvalidOperationLocation"),
            "{err:?}"
        );
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    #[test]
    fn test_status_deserialization_and_terminality() {
        let cases = [
            ("\"NotStarted\"", OperationStatus::NotStarted, false),
            ("\"Running\"", OperationStatus::Running, false),
            ("\"running\"", OperationStatus::Running, false),
            ("\"Failed\"", OperationStatus::Failed, true),
            ("\"Succeeded\"", OperationStatus::Succeeded, true),
            ("\"PartiallyCompleted\"", OperationStatus::Unknown, true),
        ];
        for (json, expected, terminal) in cases {
            let status: OperationStatus = serde_json::from_str(json).expect(json);
            assert_eq!(status, expected, "{json}");
            assert_eq!(status.is_terminal(), terminal, "{json}");
        }
    }

    #[test]
    fn test_poll_options_defaults() {
        let options = PollOptions::default();
        assert_eq!(options.interval, Duration::from_secs(1));
        assert_eq!(options.max_attempts, 60);
        assert_eq!(PollOptions::unbounded().max_attempts, 0);
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_batch_read_extracts_operation_id() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let location = format!("{}{}", server.uri(), op_path());

        Mock::given(method("POST"))
            .and(match_path("/vision/v2.0/read/core/asyncBatchAnalyze"))
            .and(query_param("mode", "Handwritten"))
            .and(header("content-type", "application/octet-stream"))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Operation-Location", location.as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let operation = batch_read(
            &client,
            &ImageSource::bytes(vec![0xFFu8, 0xD8]),
            TextRecognitionMode::Handwritten,
        )
        .await
        .expect("should submit");

        assert_eq!(operation.operation_location, location);
        assert_eq!(operation.operation_id, OP_ID);
    }

    #[tokio::test]
    async fn test_batch_read_missing_header() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("POST"))
            .and(match_path("/vision/v2.0/read/core/asyncBatchAnalyze"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let err = batch_read(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
        )
        .await
        .expect_err("should fail without header");

        assert!(
            matches!(&err, VisionError::Api { code, .. } if code == "MissingHeader"),
            "{err:?}"
        );
    }

    // -----------------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_poll_running_n_times_then_succeeded() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let n = 3;

        mount_status(&server, "NotStarted", Some(1), Some(1)).await;
        mount_status(&server, "Running", Some(n - 1), Some(n - 1)).await;
        Mock::given(method("GET"))
            .and(match_path(op_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = poll_until_complete(&client, OP_ID, &fast())
            .await
            .expect("should succeed");

        assert_eq!(result.status, OperationStatus::Succeeded);
        let pages = result.recognition_results.expect("results");
        assert_eq!(pages[0].lines.len(), 2);
        assert_eq!(pages[0].lines[1].words[0].confidence.as_deref(), Some("Low"));

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len() as u64, n + 1);
    }

    #[tokio::test]
    async fn test_poll_failed_returns_after_one_query() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_status(&server, "Failed", None, Some(1)).await;

        let result = poll_until_complete(&client, OP_ID, &fast())
            .await
            .expect("failed status is returned as data");

        assert_eq!(result.status, OperationStatus::Failed);
        assert!(result.recognition_results.is_none());
    }

    #[tokio::test]
    async fn test_poll_exceeds_max_attempts() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_status(&server, "Running", None, Some(3)).await;

        let err = poll_until_complete(&client, OP_ID, &fast().with_max_attempts(3))
            .await
            .expect_err("should time out");

        match err {
            VisionError::PollTimeout {
                operation_id,
                attempts,
            } => {
                assert_eq!(operation_id, OP_ID);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unbounded_poll_does_not_return_on_its_own() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_status(&server, "Running", None, None).await;

        let options = PollOptions::unbounded().with_interval(Duration::from_millis(5));
        let outcome = tokio::time::timeout(
            Duration::from_millis(300),
            poll_until_complete(&client, OP_ID, &options),
        )
        .await;

        assert!(outcome.is_err(), "unbounded poll returned: {outcome:?}");
        let requests = server.received_requests().await.expect("recording enabled");
        assert!(requests.len() > 1, "should have kept polling");
    }

    #[tokio::test]
    async fn test_poll_cancelled() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_status(&server, "Running", None, None).await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = poll_until_complete_or_cancelled(
            &client,
            OP_ID,
            &PollOptions::unbounded().with_interval(Duration::from_millis(5)),
            &cancel,
        )
        .await
        .expect_err("should be cancelled");

        assert!(
            matches!(&err, VisionError::Cancelled { operation_id: Some(id) } if id == OP_ID),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_poll_propagates_service_error() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        Mock::given(method("GET"))
            .and(match_path(op_path()))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "NotFound", "message": "Operation not found."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = poll_until_complete(&client, OP_ID, &fast())
            .await
            .expect_err("should fail");
        assert!(matches!(&err, VisionError::Api { code, .. } if code == "NotFound"));
    }

    // -----------------------------------------------------------------------
    // read_text
    // -----------------------------------------------------------------------

    async fn mount_submit(server: &MockServer) {
        let location = format!("{}{}", server.uri(), op_path());
        Mock::given(method("POST"))
            .and(match_path("/vision/v2.0/read/core/asyncBatchAnalyze"))
            .respond_with(
                ResponseTemplate::new(202).insert_header("Operation-Location", location.as_str()),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_read_text_returns_lines_in_order() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_submit(&server).await;
        mount_status(&server, "Running", Some(1), Some(1)).await;
        Mock::given(method("GET"))
            .and(match_path(op_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(succeeded_body()))
            .mount(&server)
            .await;

        let pages = read_text(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
            &fast(),
        )
        .await
        .expect("should read");

        let texts: Vec<_> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "World"]);
        assert_eq!(pages[0].lines[0].bounding_box.len(), 8);
    }

    #[tokio::test]
    async fn test_read_text_failed_is_error() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_submit(&server).await;
        mount_status(&server, "Failed", None, Some(1)).await;

        let err = read_text(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
            &fast(),
        )
        .await
        .expect_err("failed operation should be an error");

        match err {
            VisionError::OperationFailed {
                operation_id,
                status,
            } => {
                assert_eq!(operation_id, OP_ID);
                assert_eq!(status, "Failed");
            }
            other => panic!("expected OperationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_text_unknown_status_is_error() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_submit(&server).await;
        mount_status(&server, "PartiallyCompleted", None, Some(1)).await;

        let err = read_text(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
            &fast(),
        )
        .await
        .expect_err("unknown terminal status should be an error");

        assert!(
            matches!(&err, VisionError::OperationFailed { status, .. } if status == "Unknown"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_read_text_succeeded_without_results_is_empty() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_submit(&server).await;
        mount_status(&server, "Succeeded", None, Some(1)).await;

        let pages = read_text(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
            &fast(),
        )
        .await
        .expect("should read");

        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn test_read_text_cancelled_during_slow_submission() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let location = format!("{}{}", server.uri(), op_path());

        Mock::given(method("POST"))
            .and(match_path("/vision/v2.0/read/core/asyncBatchAnalyze"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Operation-Location", location.as_str())
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&server)
            .await;
        mount_status(&server, "Succeeded", None, Some(0)).await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let started = std::time::Instant::now();
        let err = read_text_or_cancelled(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
            &PollOptions::unbounded(),
            &cancel,
        )
        .await
        .expect_err("should be cancelled");

        assert!(
            started.elapsed() < Duration::from_millis(200),
            "took {:?}",
            started.elapsed()
        );
        assert!(
            matches!(err, VisionError::Cancelled { operation_id: None }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_read_text_cancelled_while_polling_keeps_operation_id() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_submit(&server).await;
        mount_status(&server, "Running", None, None).await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = read_text_or_cancelled(
            &client,
            &ImageSource::url("https://example.com/printed_text.jpg"),
            TextRecognitionMode::Printed,
            &PollOptions::unbounded().with_interval(Duration::from_millis(5)),
            &cancel,
        )
        .await
        .expect_err("should be cancelled");

        assert!(
            matches!(&err, VisionError::Cancelled { operation_id: Some(id) } if id == OP_ID),
            "{err:?}"
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_poll_emits_spans() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        mount_status(&server, "Succeeded", None, None).await;

        let _ = poll_until_complete(&client, OP_ID, &fast()).await;

        assert!(logs_contain("vision::read::poll_until_complete"));
        assert!(logs_contain("vision::read::get_read_result"));
        assert!(logs_contain(OP_ID));
    }
}
