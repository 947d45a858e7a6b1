//! Authentication strategies.
//!
//! One strategy augments the outgoing headers and query parameters before
//! the request reaches the transport; the caller never sees the
//! authentication material. All HTTP verbs funnel through the single
//! [`AuthStrategy::augment`] operation, so new verbs never touch the
//! variants.

use std::collections::HashMap;

use base64::Engine;

/// Interchangeable authentication variant for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// No authentication; headers and query parameters pass through
    /// unchanged.
    None,
    /// Basic authentication via a precomputed `Authorization` header.
    Basic {
        /// The full header value, `Basic <base64(username:password)>`.
        header_value: String,
    },
    /// API-key authentication via a query parameter prepended to the
    /// caller's parameters.
    Key {
        /// Name of the key query parameter.
        parameter_name: String,
        /// The API key itself.
        key: String,
    },
}

impl AuthStrategy {
    /// Basic authentication; the header value is computed once, here.
    #[must_use]
    pub fn basic(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self::Basic {
            header_value: format!("Basic {encoded}"),
        }
    }

    /// API-key authentication with the given parameter name.
    #[must_use]
    pub fn key(parameter_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Key {
            parameter_name: parameter_name.into(),
            key: key.into(),
        }
    }

    /// Augment one call's headers and query parameters.
    ///
    /// The injected material is merged first and the caller's values are
    /// applied on top: a caller-supplied `Authorization` header, or a query
    /// parameter with the key's name, wins over the configured material.
    /// This precedence is deliberate and kept.
    #[must_use]
    pub fn augment(
        &self,
        headers: HashMap<String, String>,
        query_params: Vec<(String, String)>,
    ) -> (HashMap<String, String>, Vec<(String, String)>) {
        match self {
            Self::None => (headers, query_params),
            Self::Basic { header_value } => {
                let mut merged = HashMap::with_capacity(headers.len() + 1);
                merged.insert("Authorization".to_string(), header_value.clone());
                merged.extend(headers);
                (merged, query_params)
            }
            Self::Key {
                parameter_name,
                key,
            } => {
                let mut merged = Vec::with_capacity(query_params.len() + 1);
                merged.push((parameter_name.clone(), key.clone()));
                merged.extend(query_params);
                (headers, merged)
            }
        }
    }
}
