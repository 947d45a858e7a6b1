//! The transport contract and its hyper-based default implementation.
//!
//! The pipeline never talks to the network itself; it hands a
//! [`TransportRequest`] to a [`Transport`] and waits for the raw outcome.
//! [`HyperTransport`] is the default engine: hyper-util with connection
//! pooling and rustls TLS, wrapped in a tower retry stack driven by the
//! [`RetryPolicy`] carried on each request.

use std::collections::HashMap;
use std::future::{self, Future};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use derive_more::Display;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::ServiceExt;
use tower::retry::{Policy, Retry};
use tower_service::Service;
use url::Url;

use talon_core::{Method, RawResponse};

// ============================================================================
// Transport Contract
// ============================================================================

/// Future resolved by a transport dispatch.
pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send>>;

/// A network-level transport failure.
///
/// Some transports surface certain responses as errors; such an error still
/// carries the embedded [`RawResponse`], which the pipeline treats as the
/// raw outcome rather than as a failure.
#[derive(Debug, Display)]
#[display("transport error: {message}")]
pub struct TransportError {
    message: String,
    response: Option<RawResponse>,
}

impl std::error::Error for TransportError {}

impl TransportError {
    /// A transport error without a response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// A transport error that carries the response it observed.
    #[must_use]
    pub fn with_response(message: impl Into<String>, response: RawResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The embedded response, if the transport observed one.
    #[must_use]
    pub const fn response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }

    /// Consume into the embedded response.
    #[must_use]
    pub fn into_response(self) -> Option<RawResponse> {
        self.response
    }
}

/// A fully assembled request ready for the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Bytes,
    retry: RetryPolicy,
}

impl TransportRequest {
    /// Create a transport request.
    #[must_use]
    pub fn new(
        method: Method,
        url: Url,
        headers: HashMap<String, String>,
        body: Bytes,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
            retry,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Request body; empty when the call carries no body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// The retry policy governing this request at the socket level.
    #[must_use]
    pub const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

/// Contract for the engine that performs the actual HTTP exchange.
///
/// Implementations must be internally thread-safe; one instance is shared
/// across all clients and all in-flight calls.
pub trait Transport: Send + Sync {
    /// Dispatch a request and resolve to the raw response or a transport
    /// failure.
    fn dispatch(&self, request: TransportRequest) -> TransportFuture;
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Socket-level retry policy for a single dispatched request.
///
/// Retries connection-level errors, 5xx responses, and 429 responses up to
/// the configured count. The default performs no retries.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    remaining: u32,
}

impl RetryPolicy {
    /// Create a policy with the given maximum number of retries.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            remaining: max_retries,
        }
    }

    fn should_retry_response(response: &RawResponse) -> bool {
        let status = response.status();
        status >= 500 || status == 429
    }

    fn should_retry_error(error: &TransportError) -> bool {
        // An error carrying a response is a completed exchange, not a
        // connection failure.
        error.response().is_none()
    }
}

impl Policy<TransportRequest, RawResponse, TransportError> for RetryPolicy {
    type Future = future::Ready<()>;

    fn retry(
        &mut self,
        _request: &mut TransportRequest,
        result: &mut Result<RawResponse, TransportError>,
    ) -> Option<Self::Future> {
        if self.remaining == 0 {
            return None;
        }

        let should_retry = match result {
            Ok(response) => Self::should_retry_response(response),
            Err(error) => Self::should_retry_error(error),
        };

        if should_retry {
            self.remaining -= 1;
            Some(future::ready(()))
        } else {
            None
        }
    }

    fn clone_request(&mut self, request: &TransportRequest) -> Option<TransportRequest> {
        Some(request.clone())
    }
}

// ============================================================================
// Hyper Transport
// ============================================================================

/// Default transport engine: hyper-util client with connection pooling and
/// rustls TLS.
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with a fresh connection pool.
    ///
    /// Serves both `http` and `https` URLs over HTTP/1.1 or HTTP/2; TLS is
    /// verified against the Mozilla root certificates.
    #[must_use]
    pub fn new() -> Self {
        let roots: rustls::RootCertStore =
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
        let tls = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let inner = Client::builder(TokioExecutor::new()).build(connector);
        Self { inner }
    }

    fn build_http_request(request: &TransportRequest) -> Result<http::Request<Full<Bytes>>, TransportError> {
        let method = match request.method() {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
        };

        let mut builder = http::Request::builder()
            .method(method)
            .uri(request.url().as_str());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Full::new(request.body().clone()))
            .map_err(|e| TransportError::new(e.to_string()))
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let http_request = Self::build_http_request(&request)?;

        let response = self
            .inner
            .request(http_request)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?
            .to_bytes();

        Ok(RawResponse::new(status, headers, body))
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<TransportRequest> for HyperTransport {
    type Response = RawResponse;
    type Error = TransportError;
    type Future = TransportFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: TransportRequest) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.send(request).await })
    }
}

impl Transport for HyperTransport {
    fn dispatch(&self, request: TransportRequest) -> TransportFuture {
        // The retry policy travels with the request, so the retry stack is
        // assembled per dispatch around the shared pool.
        let retry = Retry::new(request.retry().clone(), self.clone());
        Box::pin(retry.oneshot(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> RawResponse {
        RawResponse::new(status, HashMap::new(), Bytes::new())
    }

    #[test]
    fn retry_policy_default_never_retries() {
        let mut policy = RetryPolicy::default();
        let mut request = sample_request();
        let mut result = Err(TransportError::new("connection refused"));
        assert!(policy.retry(&mut request, &mut result).is_none());
    }

    #[test]
    fn retries_connection_errors_up_to_the_limit() {
        let mut policy = RetryPolicy::new(2);
        let mut request = sample_request();
        let mut result: Result<RawResponse, _> = Err(TransportError::new("connection refused"));

        assert!(policy.retry(&mut request, &mut result).is_some());
        assert!(policy.retry(&mut request, &mut result).is_some());
        assert!(policy.retry(&mut request, &mut result).is_none());
    }

    #[test]
    fn retries_5xx_and_429_responses() {
        let mut policy = RetryPolicy::new(3);
        let mut request = sample_request();

        let mut result = Ok(response(500));
        assert!(policy.retry(&mut request, &mut result).is_some());

        let mut result = Ok(response(429));
        assert!(policy.retry(&mut request, &mut result).is_some());
    }

    #[test]
    fn does_not_retry_4xx_or_2xx_responses() {
        let mut policy = RetryPolicy::new(3);
        let mut request = sample_request();

        let mut result = Ok(response(404));
        assert!(policy.retry(&mut request, &mut result).is_none());

        let mut result = Ok(response(200));
        assert!(policy.retry(&mut request, &mut result).is_none());
    }

    #[test]
    fn does_not_retry_errors_carrying_a_response() {
        let mut policy = RetryPolicy::new(3);
        let mut request = sample_request();

        let mut result: Result<RawResponse, _> =
            Err(TransportError::with_response("rejected", response(503)));
        assert!(policy.retry(&mut request, &mut result).is_none());
    }

    #[test]
    fn hyper_transport_builds_with_tls_roots() {
        let _transport = HyperTransport::new();
    }

    #[test]
    fn transport_error_accessors() {
        let err = TransportError::new("boom");
        assert_eq!(err.message(), "boom");
        assert!(err.response().is_none());

        let err = TransportError::with_response("rejected", response(400));
        assert_eq!(err.response().map(RawResponse::status), Some(400));
        assert_eq!(err.into_response().map(|r| r.status()), Some(400));
    }

    fn sample_request() -> TransportRequest {
        TransportRequest::new(
            Method::Get,
            Url::parse("http://example.org/api").expect("url"),
            HashMap::new(),
            Bytes::new(),
            RetryPolicy::default(),
        )
    }
}
