//! Client construction over a hot-reloadable configuration.

use talon_core::path::strip_separators;

use crate::auth::AuthStrategy;
use crate::client::RestClient;
use crate::config::{Config, ConfigStore};
use crate::error::{Error, Result};

/// Builds [`RestClient`] instances from the live configuration.
///
/// Each built client is bound to the configuration snapshot that was
/// current at construction; a [`ClientFactory::reload`] only affects
/// clients built afterwards.
#[derive(Debug)]
pub struct ClientFactory {
    store: ConfigStore,
}

impl ClientFactory {
    /// Create a factory from an initial configuration.
    ///
    /// # Errors
    ///
    /// Fails when no scheduler was supplied and a default one cannot be
    /// constructed.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            store: ConfigStore::new(config)?,
        })
    }

    /// Atomically replace the configuration.
    ///
    /// A config without a transport or scheduler retains the previously
    /// configured instance.
    ///
    /// # Errors
    ///
    /// Fails when a default scheduler must be built and cannot be.
    pub fn reload(&self, config: Config) -> Result<()> {
        self.store.reload(config)
    }

    /// An unauthenticated client for the given endpoint path.
    #[must_use]
    pub fn simple_client(&self, endpoint_path: &str) -> RestClient {
        RestClient::new(
            self.store.snapshot(),
            strip_separators(endpoint_path),
            AuthStrategy::None,
        )
    }

    /// A basic-auth client for the given endpoint path.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingCredentials`] when the current
    /// configuration carries no basic-auth credentials.
    pub fn basic_auth_client(&self, endpoint_path: &str) -> Result<RestClient> {
        let snapshot = self.store.snapshot();
        let credentials = snapshot
            .basic_credentials()
            .ok_or(Error::MissingCredentials("basic auth"))?;
        let auth = AuthStrategy::basic(&credentials.username, &credentials.password);
        Ok(RestClient::new(
            snapshot,
            strip_separators(endpoint_path),
            auth,
        ))
    }

    /// A key-auth client for the given endpoint path.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingCredentials`] when the current
    /// configuration carries no key-auth credentials.
    pub fn key_auth_client(&self, endpoint_path: &str) -> Result<RestClient> {
        let snapshot = self.store.snapshot();
        let credentials = snapshot
            .key_credentials()
            .ok_or(Error::MissingCredentials("key auth"))?;
        let auth = AuthStrategy::key(
            credentials.parameter_name.clone(),
            credentials.key.clone(),
        );
        Ok(RestClient::new(
            snapshot,
            strip_separators(endpoint_path),
            auth,
        ))
    }
}
