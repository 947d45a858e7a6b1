//! Construction-time errors.
//!
//! Per-call failures are data ([`talon_core::FailureCode`]); this error
//! covers what can go wrong before any call is made.

use derive_more::{Display, Error, From};

/// Error raised while building clients or loading configuration.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The configuration lacks the credentials an auth variant requires.
    #[display("missing {_0} credentials in configuration")]
    #[from(skip)]
    MissingCredentials(#[error(not(source))] &'static str),

    /// The background scheduler could not be started.
    #[display("cannot start the background scheduler: {_0}")]
    Scheduler(std::io::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;
