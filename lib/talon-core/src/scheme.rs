//! URI scheme types.

use derive_more::Display;

/// URI scheme for the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Scheme {
    /// Plain HTTP.
    #[display("http")]
    Http,
    /// HTTP over TLS.
    #[display("https")]
    Https,
}

impl Scheme {
    /// The default port for this scheme.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}
