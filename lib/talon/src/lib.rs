//! Typed, blocking REST client over an async transport.
//!
//! Build a [`ClientFactory`] from a [`Config`], ask it for a client bound
//! to an endpoint, and execute calls described by
//! [`RequestProperties`]. Responses are classified into a typed
//! [`RestResult`] wrapped in a [`ServiceResult`]; no pipeline failure
//! aborts the calling program.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use talon::prelude::*;
//!
//! #[derive(Debug, serde::Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # fn main() -> talon::Result<()> {
//! let config = Config::new(
//!     Scheme::Https,
//!     "api.example.com",
//!     443,
//!     "v1",
//!     Duration::from_secs(10),
//! );
//! let factory = ClientFactory::new(config)?;
//! let client = factory.simple_client("users");
//!
//! let properties = RequestProperties::<Json<User>, NoData>::builder()
//!     .sub_path("{}")
//!     .sub_path_param("42")
//!     .build();
//! match client.get(&properties) {
//!     ServiceResult::Completed(result) if result.is_success() => {
//!         println!("{:?}", result.success_data());
//!     }
//!     ServiceResult::Completed(result) => {
//!         eprintln!("HTTP {}", result.status_code());
//!     }
//!     ServiceResult::Failed(code) => eprintln!("{code}"),
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod dispatch;
mod error;
mod factory;
pub mod prelude;
mod transport;

pub use auth::AuthStrategy;
pub use client::{CallResult, RestClient};
pub use config::{BasicCredentials, Config, ConfigSnapshot, ConfigStore, KeyCredentials};
pub use dispatch::{Dispatcher, WaitOutcome};
pub use error::{Error, Result};
pub use factory::ClientFactory;
pub use transport::{
    HyperTransport, RetryPolicy, Transport, TransportError, TransportFuture, TransportRequest,
};

// Re-export core types
pub use talon_core::{
    classify, DecodeError, DecodeErrorKind, FailureCode, Json, Method, NoData, Payload,
    RawResponse, RequestProperties, RequestPropertiesBuilder, RestResult, Scheme, ServiceResult,
};
