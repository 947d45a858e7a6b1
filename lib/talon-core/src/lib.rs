//! Core types and pure logic for the talon typed REST client.
//!
//! This crate holds everything that does not touch the network:
//! - [`Method`] and [`Scheme`] - HTTP method and URI scheme enums
//! - [`FailureCode`] and [`ServiceResult`] - the closed failure taxonomy
//! - [`RestResult`] - the decoded outcome of one HTTP exchange
//! - [`RequestProperties`] - the per-call descriptor
//! - [`Payload`], [`Json`] and [`NoData`] - typed response decoding
//! - [`path`] and [`query`] - URI assembly helpers
//! - [`classify`] - raw response to typed outcome classification
//! - [`RawResponse`] - the transport-facing response tuple

mod classify;
mod error;
mod method;
pub mod path;
mod payload;
pub mod prelude;
mod properties;
pub mod query;
mod response;
mod result;
mod scheme;

pub use classify::classify;
pub use error::{FailureCode, ServiceResult};
pub use method::Method;
pub use payload::{DecodeError, DecodeErrorKind, Json, NoData, Payload};
pub use properties::{RequestProperties, RequestPropertiesBuilder};
pub use response::RawResponse;
pub use result::RestResult;
pub use scheme::Scheme;
