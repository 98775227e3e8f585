//! Configuration for the Frogans client.

use std::time::Duration;

use crate::selection::SelectionStrategy;

/// Seed hosts contacted to bootstrap the naming-server list.
pub const DEFAULT_SEED_HOSTS: &[&str] = &[
    "http://fpb.p2205.test.lab.op3ft.org",
    "http://fpb.p2305.test.lab.op3ft.org",
];

/// Path of the bootstrap directory document on a seed host.
pub const DEFAULT_BOOTSTRAP_PATH: &str = "/architecture-1/fpbl1.0/data.fpbl";

/// Path prefix of naming-service lookups.
pub const DEFAULT_PROTOCOL_PREFIX: &str = "architecture-1/fnsl5.0";

/// File extension of naming-service lookups.
pub const DEFAULT_LOOKUP_EXTENSION: &str = "fnsl";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Frogans client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Seed hosts, one of which is contacted during bootstrap.
    ///
    /// No fallback to another seed is attempted.
    pub seed_hosts: Vec<String>,

    /// Path appended to the chosen seed host.
    pub bootstrap_path: String,

    /// Path prefix for network and site lookups on a naming server.
    pub protocol_prefix: String,

    /// Extension of network and site lookup documents.
    pub lookup_extension: String,

    /// Policy for choosing seed hosts, naming servers and content servers.
    pub selection: SelectionStrategy,

    /// Lifetime of cached networks and sites.
    ///
    /// `None` keeps entries for the lifetime of the client.
    pub cache_ttl: Option<Duration>,

    /// Maximum number of distinct content servers tried per resource fetch.
    pub resource_attempts: usize,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed_hosts: DEFAULT_SEED_HOSTS.iter().map(|s| s.to_string()).collect(),
            bootstrap_path: DEFAULT_BOOTSTRAP_PATH.to_string(),
            protocol_prefix: DEFAULT_PROTOCOL_PREFIX.to_string(),
            lookup_extension: DEFAULT_LOOKUP_EXTENSION.to_string(),
            selection: SelectionStrategy::Random,
            cache_ttl: None,
            resource_attempts: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the compiled-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the seed host list.
    pub fn with_seed_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the bootstrap document path.
    pub fn with_bootstrap_path(mut self, path: impl Into<String>) -> Self {
        self.bootstrap_path = path.into();
        self
    }

    /// Set the naming-service path prefix.
    pub fn with_protocol_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.protocol_prefix = prefix.into();
        self
    }

    /// Set the naming-service document extension.
    pub fn with_lookup_extension(mut self, extension: impl Into<String>) -> Self {
        self.lookup_extension = extension.into();
        self
    }

    /// Set the server selection policy.
    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }

    /// Expire cached networks and sites after `ttl`.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set how many content servers a resource fetch may try.
    ///
    /// Values below 1 are treated as 1.
    pub fn with_resource_attempts(mut self, attempts: usize) -> Self {
        self.resource_attempts = attempts.max(1);
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the bootstrap document on `seed_host`.
    pub fn bootstrap_url(&self, seed_host: &str) -> String {
        format!("{}{}", seed_host, self.bootstrap_path)
    }
}
