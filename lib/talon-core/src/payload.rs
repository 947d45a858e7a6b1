//! Typed response payload decoding.
//!
//! A [`Payload`] marker decides what happens to one side of a
//! [`crate::RestResult`]: [`Json<T>`] decodes the body into `T`, [`NoData`]
//! skips decoding entirely and the payload stays absent. The markers replace
//! runtime type descriptors with compile-time type selection; a call site
//! picks its types once and stays fully typed from there on.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

/// What went wrong while decoding a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The body is valid JSON but does not fit the requested type.
    Mismatch,
    /// The body is not valid JSON at all.
    NotJson,
    /// Any other decode failure (I/O from the reader, etc.).
    Other,
}

/// A failed decode attempt, with the kind driving failure-code selection
/// and a message for logging.
#[derive(Debug, Clone)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    message: String,
}

impl DecodeError {
    /// The failure kind.
    #[must_use]
    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Human-readable description, including the JSON path for mismatches.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Marker trait selecting the decode behavior for one side of a result.
pub trait Payload {
    /// The decoded value type.
    type Value: fmt::Debug + Send + 'static;

    /// Decode the raw body.
    ///
    /// Returns `Ok(None)` when this marker requests no payload; decoding is
    /// then skipped even for bodies that are not valid JSON.
    fn decode(body: &[u8]) -> Result<Option<Self::Value>, DecodeError>;
}

/// Marker for call sites that do not expect a payload on this side.
///
/// The body is left untouched and the corresponding payload stays `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl Payload for NoData {
    type Value = NoData;

    fn decode(_body: &[u8]) -> Result<Option<Self::Value>, DecodeError> {
        Ok(None)
    }
}

/// Marker for call sites expecting a JSON payload of type `T`.
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T> Payload for Json<T>
where
    T: DeserializeOwned + fmt::Debug + Send + 'static,
{
    type Value = T;

    fn decode(body: &[u8]) -> Result<Option<Self::Value>, DecodeError> {
        let mut deserializer = serde_json::Deserializer::from_slice(body);
        match serde_path_to_error::deserialize(&mut deserializer) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                let kind = match err.inner().classify() {
                    serde_json::error::Category::Data => DecodeErrorKind::Mismatch,
                    serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                        DecodeErrorKind::NotJson
                    }
                    serde_json::error::Category::Io => DecodeErrorKind::Other,
                };
                let message = match kind {
                    DecodeErrorKind::Mismatch => {
                        format!("at '{}': {}", err.path(), err.inner())
                    }
                    _ => err.inner().to_string(),
                };
                Err(DecodeError { kind, message })
            }
        }
    }
}
