//! Connection configuration and the hot-reloadable store.
//!
//! [`Config`] is the external surface filled in by whatever loads
//! configuration; [`ConfigStore`] resolves it into an immutable
//! [`ConfigSnapshot`] behind one lock, supporting atomic hot-reload.
//! Every client holds the snapshot that was current when it was built.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use talon_core::Scheme;

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::transport::{HyperTransport, RetryPolicy, Transport};

/// Username and password for basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Parameter name and key for API-key authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCredentials {
    /// Name of the query parameter carrying the key.
    pub parameter_name: String,
    /// The API key.
    pub key: String,
}

/// Connection configuration as supplied by the application.
///
/// The transport and dispatcher are optional: when absent, a previously
/// configured instance is retained across a reload, and a default is
/// constructed on first load. Everything else is replaced wholesale.
#[derive(Clone)]
pub struct Config {
    /// URI scheme of the remote API.
    pub scheme: Scheme,
    /// Remote host.
    pub host: String,
    /// Remote port.
    pub port: u16,
    /// Base path of the API, prepended to every endpoint path.
    pub api_base_path: String,
    /// Bounded wait applied to every dispatched request.
    pub timeout: Duration,
    /// Socket-level retry policy handed to the transport.
    pub retry: RetryPolicy,
    /// Transport engine instance, shared across clients when supplied.
    pub transport: Option<Arc<dyn Transport>>,
    /// Scheduler instance, shared across clients when supplied.
    pub dispatcher: Option<Arc<Dispatcher>>,
    /// Credentials for basic-auth clients.
    pub basic_credentials: Option<BasicCredentials>,
    /// Credentials for key-auth clients.
    pub key_credentials: Option<KeyCredentials>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_base_path", &self.api_base_path)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Create a configuration with the required connection fields and no
    /// optional collaborators.
    #[must_use]
    pub fn new(
        scheme: Scheme,
        host: impl Into<String>,
        port: u16,
        api_base_path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
            api_base_path: api_base_path.into(),
            timeout,
            retry: RetryPolicy::default(),
            transport: None,
            dispatcher: None,
            basic_credentials: None,
            key_credentials: None,
        }
    }

    /// Set the socket-level retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Supply an existing transport engine instance.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Supply an existing scheduler instance.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Set basic-auth credentials.
    #[must_use]
    pub fn with_basic_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_credentials = Some(BasicCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set key-auth credentials.
    #[must_use]
    pub fn with_key_credentials(
        mut self,
        parameter_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.key_credentials = Some(KeyCredentials {
            parameter_name: parameter_name.into(),
            key: key.into(),
        });
        self
    }
}

/// A fully resolved, immutable view of the configuration.
///
/// Snapshots are shared via `Arc`; a reload installs a new snapshot and
/// never mutates an existing one, so clients built before the reload keep
/// the view they were created with.
#[derive(Clone)]
pub struct ConfigSnapshot {
    scheme: Scheme,
    host: String,
    port: u16,
    api_base_path: String,
    timeout: Duration,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    dispatcher: Arc<Dispatcher>,
    basic_credentials: Option<BasicCredentials>,
    key_credentials: Option<KeyCredentials>,
}

impl std::fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_base_path", &self.api_base_path)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ConfigSnapshot {
    /// URI scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Remote host, stripped of path separators.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Remote port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// API base path.
    #[must_use]
    pub fn api_base_path(&self) -> &str {
        &self.api_base_path
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Socket-level retry policy.
    #[must_use]
    pub const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The transport engine.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The scheduler.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Basic-auth credentials, when configured.
    #[must_use]
    pub const fn basic_credentials(&self) -> Option<&BasicCredentials> {
        self.basic_credentials.as_ref()
    }

    /// Key-auth credentials, when configured.
    #[must_use]
    pub const fn key_credentials(&self) -> Option<&KeyCredentials> {
        self.key_credentials.as_ref()
    }
}

/// Owns the live configuration snapshot behind one lock.
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<Arc<ConfigSnapshot>>,
}

impl ConfigStore {
    /// Resolve the initial configuration, constructing default transport
    /// and dispatcher instances where none were supplied.
    pub fn new(config: Config) -> Result<Self> {
        let snapshot = Self::resolve(config, None)?;
        Ok(Self {
            inner: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Atomically replace the configuration.
    ///
    /// An incoming config without a transport or dispatcher keeps the
    /// previously configured instance. The write lock is held for the
    /// whole swap, so a concurrent [`ConfigStore::snapshot`] sees either
    /// the old or the new view, never a mix.
    pub fn reload(&self, config: Config) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let snapshot = Self::resolve(config, Some(&guard))?;
        *guard = Arc::new(snapshot);
        Ok(())
    }

    /// A consistent view of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn resolve(
        config: Config,
        previous: Option<&ConfigSnapshot>,
    ) -> Result<ConfigSnapshot> {
        let transport = match config.transport {
            Some(transport) => transport,
            None => previous.map_or_else(
                || Arc::new(HyperTransport::new()) as Arc<dyn Transport>,
                |prev| Arc::clone(&prev.transport),
            ),
        };

        let dispatcher = match config.dispatcher {
            Some(dispatcher) => dispatcher,
            None => match previous {
                Some(prev) => Arc::clone(&prev.dispatcher),
                None => Arc::new(Dispatcher::new()?),
            },
        };

        Ok(ConfigSnapshot {
            scheme: config.scheme,
            host: talon_core::path::strip_separators(&config.host).to_string(),
            port: config.port,
            api_base_path: config.api_base_path,
            timeout: config.timeout,
            retry: config.retry,
            transport,
            dispatcher,
            basic_credentials: config.basic_credentials,
            key_credentials: config.key_credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn config(host: &str, port: u16) -> Config {
        Config::new(Scheme::Http, host, port, "api", Duration::from_secs(5))
    }

    #[test]
    fn snapshot_reflects_initial_config() {
        let store = ConfigStore::new(config("example.org", 8080)).expect("store");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.scheme(), Scheme::Http);
        assert_eq!(snapshot.host(), "example.org");
        assert_eq!(snapshot.port(), 8080);
        assert_eq!(snapshot.api_base_path(), "api");
        assert_eq!(snapshot.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn host_is_stripped_of_separators() {
        let store = ConfigStore::new(config("/example.org/", 80)).expect("store");
        assert_eq!(store.snapshot().host(), "example.org");
    }

    #[test]
    fn reload_replaces_connection_fields() {
        let store = ConfigStore::new(config("old.example.org", 80)).expect("store");
        store
            .reload(config("new.example.org", 8443))
            .expect("reload");

        let snapshot = store.snapshot();
        assert_eq!(snapshot.host(), "new.example.org");
        assert_eq!(snapshot.port(), 8443);
    }

    #[test]
    fn reload_retains_collaborators_when_absent() {
        let store = ConfigStore::new(config("example.org", 80)).expect("store");
        let before = store.snapshot();

        store.reload(config("example.org", 81)).expect("reload");
        let after = store.snapshot();

        assert!(Arc::ptr_eq(before.transport(), after.transport()));
        assert!(Arc::ptr_eq(before.dispatcher(), after.dispatcher()));
    }

    #[test]
    fn reload_installs_supplied_collaborators() {
        let store = ConfigStore::new(config("example.org", 80)).expect("store");
        let before = store.snapshot();

        let transport = Arc::new(HyperTransport::new());
        store
            .reload(config("example.org", 80).with_transport(transport.clone()))
            .expect("reload");
        let after = store.snapshot();

        assert!(!Arc::ptr_eq(before.transport(), after.transport()));
        // Dispatcher was not supplied, so it is retained
        assert!(Arc::ptr_eq(before.dispatcher(), after.dispatcher()));
    }

    #[test]
    fn clients_keep_their_snapshot_across_reloads() {
        let store = ConfigStore::new(config("old.example.org", 80)).expect("store");
        let held = store.snapshot();

        store.reload(config("new.example.org", 81)).expect("reload");

        assert_eq!(held.host(), "old.example.org");
        assert_eq!(held.port(), 80);
    }

    #[test]
    fn concurrent_readers_never_observe_a_mixed_snapshot() {
        // Host and port are flipped together; a torn read would pair the
        // host of one config with the port of the other.
        let store = Arc::new(ConfigStore::new(config("a.example.org", 1000)).expect("store"));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200 {
                    let (host, port) = if i % 2 == 0 {
                        ("b.example.org", 2000)
                    } else {
                        ("a.example.org", 1000)
                    };
                    store.reload(config(host, port)).expect("reload");
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = store.snapshot();
                        let consistent = matches!(
                            (snapshot.host(), snapshot.port()),
                            ("a.example.org", 1000) | ("b.example.org", 2000)
                        );
                        assert!(consistent, "torn snapshot observed");
                    }
                })
            })
            .collect();

        writer.join().expect("writer");
        for reader in readers {
            reader.join().expect("reader");
        }
    }
}
