//! The per-call request descriptor.
//!
//! [`RequestProperties`] carries everything one call needs: the sub-path
//! template with its positional parameters, ordered query parameters,
//! headers, the optional explicit success-status-code set, and the optional
//! JSON body. It is built once per call and consumed by the pipeline.
//!
//! # Example
//!
//! ```
//! use talon_core::{Json, NoData, RequestProperties};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct User { id: u64 }
//!
//! let properties: RequestProperties<Json<User>, NoData> = RequestProperties::builder()
//!     .sub_path("{}")
//!     .sub_path_param("42")
//!     .query("expand", "profile")
//!     .header("X-Trace", "abc")
//!     .build();
//! # let _ = properties;
//! ```

use std::collections::HashMap;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::Serialize;

use crate::NoData;

/// Descriptor for one REST call, typed over its success and error payload
/// markers.
///
/// The body, when set, is serialized through serde_json at build time; a
/// serialization failure is retained and surfaced by the pipeline as
/// [`crate::FailureCode::CannotCreateJsonStringFromObject`] when the call
/// executes, so construction itself never fails.
#[derive(Debug)]
pub struct RequestProperties<S = NoData, E = NoData> {
    sub_path: String,
    sub_path_params: Vec<String>,
    query_params: Vec<(String, String)>,
    headers: HashMap<String, String>,
    success_status_codes: Option<Vec<u16>>,
    body: Option<serde_json::Result<Bytes>>,
    _marker: PhantomData<fn() -> (S, E)>,
}

impl<S, E> RequestProperties<S, E> {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> RequestPropertiesBuilder<S, E> {
        RequestPropertiesBuilder::new()
    }

    /// The sub-path template, possibly containing `{}` placeholders.
    #[must_use]
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// Positional parameters for the sub-path template.
    #[must_use]
    pub fn sub_path_params(&self) -> &[String] {
        &self.sub_path_params
    }

    /// Ordered query parameters; duplicate keys are allowed.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The explicit success-status-code set, when supplied.
    #[must_use]
    pub fn success_status_codes(&self) -> Option<&[u16]> {
        self.success_status_codes.as_deref()
    }

    /// The serialized body: absent, serialized bytes, or the retained
    /// serialization error.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Result<Bytes>> {
        self.body.as_ref()
    }
}

impl<S, E> Default for RequestProperties<S, E> {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`RequestProperties`].
#[derive(Debug)]
pub struct RequestPropertiesBuilder<S = NoData, E = NoData> {
    sub_path: String,
    sub_path_params: Vec<String>,
    query_params: Vec<(String, String)>,
    headers: HashMap<String, String>,
    success_status_codes: Option<Vec<u16>>,
    body: Option<serde_json::Result<Bytes>>,
    _marker: PhantomData<fn() -> (S, E)>,
}

impl<S, E> RequestPropertiesBuilder<S, E> {
    fn new() -> Self {
        Self {
            sub_path: String::new(),
            sub_path_params: Vec::new(),
            query_params: Vec::new(),
            headers: HashMap::new(),
            success_status_codes: None,
            body: None,
            _marker: PhantomData,
        }
    }

    /// Set the sub-path template.
    #[must_use]
    pub fn sub_path(mut self, sub_path: impl Into<String>) -> Self {
        self.sub_path = sub_path.into();
        self
    }

    /// Append one positional sub-path parameter.
    #[must_use]
    pub fn sub_path_param(mut self, param: impl Into<String>) -> Self {
        self.sub_path_params.push(param.into());
        self
    }

    /// Append one query parameter; order and duplicates are preserved.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Set a header; keys are unique, later values overwrite earlier ones.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Supply the explicit set of status codes treated as success,
    /// replacing the default 200-299 range.
    #[must_use]
    pub fn success_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.success_status_codes = Some(codes.into_iter().collect());
        self
    }

    /// Set the JSON request body.
    #[must_use]
    pub fn body<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).map(Bytes::from));
        self
    }

    /// Build the properties.
    #[must_use]
    pub fn build(self) -> RequestProperties<S, E> {
        RequestProperties {
            sub_path: self.sub_path,
            sub_path_params: self.sub_path_params,
            query_params: self.query_params,
            headers: self.headers,
            success_status_codes: self.success_status_codes,
            body: self.body,
            _marker: PhantomData,
        }
    }
}

impl<S, E> Default for RequestPropertiesBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoData;

    type Props = RequestProperties<NoData, NoData>;

    #[test]
    fn builder_defaults() {
        let properties = Props::builder().build();
        assert_eq!(properties.sub_path(), "");
        assert!(properties.sub_path_params().is_empty());
        assert!(properties.query_params().is_empty());
        assert!(properties.headers().is_empty());
        assert!(properties.success_status_codes().is_none());
        assert!(properties.body().is_none());
    }

    #[test]
    fn builder_preserves_query_order_and_duplicates() {
        let properties = Props::builder()
            .query("tag", "a")
            .query("q", "1")
            .query("tag", "b")
            .build();
        assert_eq!(
            properties.query_params(),
            &[
                ("tag".to_string(), "a".to_string()),
                ("q".to_string(), "1".to_string()),
                ("tag".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn builder_headers_are_unique() {
        let properties = Props::builder()
            .header("X-One", "first")
            .header("X-One", "second")
            .build();
        assert_eq!(
            properties.headers().get("X-One"),
            Some(&"second".to_string())
        );
    }

    #[test]
    fn body_serializes_at_build_time() {
        #[derive(serde::Serialize)]
        struct Payload {
            name: String,
        }

        let properties = Props::builder()
            .body(&Payload {
                name: "talon".to_string(),
            })
            .build();

        let body = properties.body().expect("body set");
        let bytes = body.as_ref().expect("serializable");
        assert_eq!(bytes.as_ref(), br#"{"name":"talon"}"#);
    }

    #[test]
    fn unserializable_body_is_retained_as_error() {
        // A map with non-string keys cannot serialize to JSON
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], "value");

        let properties = Props::builder().body(&bad).build();
        assert!(properties.body().expect("body set").is_err());
    }

    #[test]
    fn success_status_codes_override() {
        let properties = Props::builder().success_status_codes([201, 202]).build();
        assert_eq!(properties.success_status_codes(), Some(&[201, 202][..]));
    }
}
