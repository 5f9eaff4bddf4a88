use crate::core::config::ConfigError;
use crate::core::errors::{BoxError, KycError};
use crate::core::kernel::assembler::OutboundRequest;
use crate::core::kernel::retry::RetryConfig;
use crate::core::types::Operation;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_retry::RetryIf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Raw HTTP response, buffered in full
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failure to obtain any HTTP response
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("transport error: {0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    /// Connection and timeout failures may succeed on another attempt
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Box::new(err))
        } else if err.is_connect() || err.is_request() {
            Self::Connect(Box::new(err))
        } else {
            Self::Other(Box::new(err))
        }
    }
}

/// Single-attempt HTTP transport
///
/// Implementations perform exactly one round trip and report every HTTP
/// status as a response; retry and status classification happen in
/// [`RestClient`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request).await
    }
}

/// `HttpTransport` backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, KycError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Reuse an existing reqwest client and its connection pool
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

/// Per-call cancellation and deadline
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the whole call, retries and backoff included
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Per-attempt request timeout in seconds
    pub timeout_seconds: u64,
    pub retry: RetryConfig,
    /// Log request and response bodies at debug level
    pub debug: bool,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry: RetryConfig::default(),
            debug: false,
        }
    }
}

impl RestClientConfig {
    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Outcome of one attempt that did not produce a usable response
#[derive(Debug)]
enum AttemptError {
    Transport(TransportError),
    Status { status: u16, body: String },
    Cancelled,
}

impl AttemptError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_transient(),
            Self::Status { status, .. } => *status >= 500,
            Self::Cancelled => false,
        }
    }

    fn into_kyc_error(self, operation: Operation, attempts: u32) -> KycError {
        match self {
            Self::Transport(err) => KycError::HttpFailure {
                operation,
                attempts,
                source: Box::new(err),
            },
            Self::Status { status, body } if status >= 500 => KycError::HttpFailure {
                operation,
                attempts,
                source: Box::new(KycError::UnexpectedStatus {
                    operation,
                    status,
                    body,
                }),
            },
            Self::Status { status, body } => KycError::UnexpectedStatus {
                operation,
                status,
                body,
            },
            Self::Cancelled => KycError::Cancelled { operation },
        }
    }
}

/// Executes signed requests with retry and status classification
#[derive(Clone)]
pub struct RestClient<T: HttpTransport> {
    transport: T,
    config: RestClientConfig,
}

impl<T: HttpTransport> std::fmt::Debug for RestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RestClient<ReqwestTransport> {
    /// Build a client over a fresh pooled reqwest transport
    pub fn with_reqwest(config: RestClientConfig) -> Result<Self, KycError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> RestClient<T> {
    pub fn new(transport: T, config: RestClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Dispatch `request` and return the body of the first response below 400
    ///
    /// Connection failures, timeouts and 5xx responses are retried up to
    /// `retry.max_retries` times; 4xx responses are returned immediately as
    /// [`KycError::UnexpectedStatus`].
    #[instrument(skip(self, ctx, request), fields(operation = %request.operation, url = %request.url))]
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: OutboundRequest,
    ) -> Result<Vec<u8>, KycError> {
        let operation = request.operation;

        if self.config.debug {
            debug!(url = %request.url, "http request");
            debug!(body = %String::from_utf8_lossy(&request.body), "http request body");
        }

        let attempts = AtomicU32::new(0);
        let retrying = RetryIf::start(
            self.config.retry.delays(),
            || self.attempt(ctx, &request, &attempts),
            AttemptError::is_transient,
        );

        let bounded = async {
            match ctx.deadline() {
                Some(deadline) => tokio::time::timeout_at(deadline, retrying)
                    .await
                    .unwrap_or_else(|_| {
                        Err(AttemptError::Transport(TransportError::DeadlineExceeded))
                    }),
                None => retrying.await,
            }
        };

        let outcome = tokio::select! {
            () = ctx.cancellation().cancelled() => Err(AttemptError::Cancelled),
            result = bounded => result,
        };

        let attempts = attempts.load(Ordering::Relaxed);
        match outcome {
            Ok(response) => Ok(response.body),
            Err(err) => {
                warn!(attempts, error = ?err, "request failed");
                Err(err.into_kyc_error(operation, attempts))
            }
        }
    }

    async fn attempt(
        &self,
        ctx: &RequestContext,
        request: &OutboundRequest,
        attempts: &AtomicU32,
    ) -> Result<RawResponse, AttemptError> {
        if ctx.is_cancelled() {
            return Err(AttemptError::Cancelled);
        }

        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        if attempt > 1 {
            debug!(attempt, max = self.config.retry.max_retries + 1, "retrying request");
        }

        let response = self
            .transport
            .send(request)
            .await
            .map_err(AttemptError::Transport)?;

        if self.config.debug {
            debug!(status = response.status, "http response");
            debug!(body = %String::from_utf8_lossy(&response.body), "http response body");
        }

        if response.status >= 400 {
            return Err(AttemptError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response)
    }
}
