//! The REST client and its request pipeline.
//!
//! [`RestClient`] is a thin, cloneable handle over one configuration
//! snapshot, one endpoint path, and one authentication strategy. Every
//! call runs the same pipeline: augment with auth, assemble the URI,
//! resolve the body, dispatch over the transport with a bounded wait,
//! and classify the raw response into a typed [`RestResult`].

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use talon_core::query::encode_query;
use talon_core::{
    classify, path, FailureCode, Method, Payload, RequestProperties, RestResult, ServiceResult,
};
use tracing::{debug, warn};

use crate::auth::AuthStrategy;
use crate::config::ConfigSnapshot;
use crate::dispatch::WaitOutcome;
use crate::transport::TransportRequest;

/// Accept header advertised on every request.
const ACCEPT_TYPE_HEADER: &str = "Accept-Type";
/// Content type set when a JSON body is present.
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// The outcome of one REST call: either a classified [`RestResult`] or a
/// pipeline failure.
pub type CallResult<S, E> =
    ServiceResult<RestResult<<S as Payload>::Value, <E as Payload>::Value>>;

/// A client bound to one endpoint of a remote API.
///
/// Cheap to clone; clones share the configuration snapshot, transport,
/// and scheduler.
#[derive(Debug, Clone)]
pub struct RestClient {
    snapshot: Arc<ConfigSnapshot>,
    endpoint_path: String,
    auth: AuthStrategy,
}

impl RestClient {
    pub(crate) fn new(
        snapshot: Arc<ConfigSnapshot>,
        endpoint_path: impl Into<String>,
        auth: AuthStrategy,
    ) -> Self {
        Self {
            snapshot,
            endpoint_path: endpoint_path.into(),
            auth,
        }
    }

    /// The endpoint path this client was built for.
    #[must_use]
    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    pub(crate) fn snapshot(&self) -> &Arc<ConfigSnapshot> {
        &self.snapshot
    }

    /// Execute a GET request, blocking until a response or a failure.
    pub fn get<S: Payload, E: Payload>(
        &self,
        properties: &RequestProperties<S, E>,
    ) -> CallResult<S, E> {
        self.execute(Method::Get, properties)
    }

    /// Execute a POST request, blocking until a response or a failure.
    pub fn post<S: Payload, E: Payload>(
        &self,
        properties: &RequestProperties<S, E>,
    ) -> CallResult<S, E> {
        self.execute(Method::Post, properties)
    }

    /// Execute a PUT request, blocking until a response or a failure.
    pub fn put<S: Payload, E: Payload>(
        &self,
        properties: &RequestProperties<S, E>,
    ) -> CallResult<S, E> {
        self.execute(Method::Put, properties)
    }

    /// Execute a PATCH request, blocking until a response or a failure.
    pub fn patch<S: Payload, E: Payload>(
        &self,
        properties: &RequestProperties<S, E>,
    ) -> CallResult<S, E> {
        self.execute(Method::Patch, properties)
    }

    /// Execute a GET request off-thread, delivering the outcome to
    /// `on_complete`.
    pub fn get_async<S, E, C>(&self, properties: RequestProperties<S, E>, on_complete: C)
    where
        S: Payload + Send + 'static,
        E: Payload + Send + 'static,
        C: FnOnce(CallResult<S, E>) + Send + 'static,
    {
        self.execute_async(Method::Get, properties, on_complete);
    }

    /// Execute a POST request off-thread, delivering the outcome to
    /// `on_complete`.
    pub fn post_async<S, E, C>(&self, properties: RequestProperties<S, E>, on_complete: C)
    where
        S: Payload + Send + 'static,
        E: Payload + Send + 'static,
        C: FnOnce(CallResult<S, E>) + Send + 'static,
    {
        self.execute_async(Method::Post, properties, on_complete);
    }

    /// Execute a PUT request off-thread, delivering the outcome to
    /// `on_complete`.
    pub fn put_async<S, E, C>(&self, properties: RequestProperties<S, E>, on_complete: C)
    where
        S: Payload + Send + 'static,
        E: Payload + Send + 'static,
        C: FnOnce(CallResult<S, E>) + Send + 'static,
    {
        self.execute_async(Method::Put, properties, on_complete);
    }

    /// Execute a PATCH request off-thread, delivering the outcome to
    /// `on_complete`.
    pub fn patch_async<S, E, C>(&self, properties: RequestProperties<S, E>, on_complete: C)
    where
        S: Payload + Send + 'static,
        E: Payload + Send + 'static,
        C: FnOnce(CallResult<S, E>) + Send + 'static,
    {
        self.execute_async(Method::Patch, properties, on_complete);
    }

    fn execute_async<S, E, C>(
        &self,
        method: Method,
        properties: RequestProperties<S, E>,
        on_complete: C,
    ) where
        S: Payload + Send + 'static,
        E: Payload + Send + 'static,
        C: FnOnce(CallResult<S, E>) + Send + 'static,
    {
        let client = self.clone();
        self.snapshot
            .dispatcher()
            .submit(move || client.execute(method, &properties), on_complete);
    }

    /// Run the full pipeline for one call.
    ///
    /// Must not be called from within an async runtime context; use the
    /// `*_async` variants there.
    pub fn execute<S: Payload, E: Payload>(
        &self,
        method: Method,
        properties: &RequestProperties<S, E>,
    ) -> CallResult<S, E> {
        let (headers, query_params) = self.auth.augment(
            properties.headers().clone(),
            properties.query_params().to_vec(),
        );

        let assembled = path::assemble_path(
            self.snapshot.api_base_path(),
            &self.endpoint_path,
            properties.sub_path(),
            properties.sub_path_params(),
        );
        let assembled = match assembled {
            Ok(assembled) => assembled,
            Err(code) => return fail(method, code),
        };

        let query = encode_query(&query_params);
        let url = match path::build_uri(
            self.snapshot.scheme(),
            self.snapshot.host(),
            self.snapshot.port(),
            &assembled,
            &query,
        ) {
            Ok(url) => url,
            Err(code) => return fail(method, code),
        };

        let body = match properties.body() {
            None => Bytes::new(),
            Some(Ok(bytes)) => bytes.clone(),
            Some(Err(err)) => {
                warn!(%method, %url, error = %err, "request body serialization failed");
                return ServiceResult::Failed(FailureCode::CannotCreateJsonStringFromObject);
            }
        };

        let headers = with_default_headers(headers, properties.body().is_some());

        debug!(%method, %url, "dispatching request");

        let request = TransportRequest::new(
            method,
            url.clone(),
            headers,
            body,
            self.snapshot.retry().clone(),
        );

        let transport = Arc::clone(self.snapshot.transport());
        let outcome = self
            .snapshot
            .dispatcher()
            .wait(self.snapshot.timeout(), async move {
                transport.dispatch(request).await
            });

        let raw = match outcome {
            WaitOutcome::Completed(Ok(raw)) => raw,
            WaitOutcome::Completed(Err(err)) => match err.into_response() {
                // The transport reported an error but saw a response;
                // classification decides what it means.
                Some(raw) => raw,
                None => return fail(method, FailureCode::RequestFailed),
            },
            WaitOutcome::Interrupted => return fail(method, FailureCode::RequestInterrupted),
            WaitOutcome::TimedOut => return fail(method, FailureCode::RequestTimedOut),
        };

        debug!(%method, %url, status = raw.status(), "response received");

        classify::<S, E>(raw.status(), raw.body(), properties.success_status_codes())
    }
}

fn fail<T>(method: Method, code: FailureCode) -> ServiceResult<T> {
    warn!(%method, %code, "request pipeline failed");
    ServiceResult::Failed(code)
}

/// Merge the default headers under the caller's: a caller-supplied value
/// for the same name wins.
fn with_default_headers(
    mut headers: HashMap<String, String>,
    has_body: bool,
) -> HashMap<String, String> {
    if !headers.contains_key(ACCEPT_TYPE_HEADER) {
        headers.insert(ACCEPT_TYPE_HEADER.to_string(), JSON_UTF8.to_string());
    }
    if has_body && !headers.contains_key(CONTENT_TYPE_HEADER) {
        headers.insert(CONTENT_TYPE_HEADER.to_string(), JSON_UTF8.to_string());
    }
    headers
}
